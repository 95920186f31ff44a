//! Reference form of the scorer contract used by in-memory candidate sources.
//!
//! The ranking path never calls into this module; it only orders the scores it is handed.

use super::domain::TransportMode;
use super::weights::ScoreWeights;

/// Emission level treated as the top of the normalized carbon scale.
pub const CARBON_NORMALIZATION_CEILING_KG: f64 = 500.0;

pub fn normalized_carbon(carbon_emission_kg: f64) -> f64 {
    (carbon_emission_kg / CARBON_NORMALIZATION_CEILING_KG).clamp(0.0, 1.0)
}

/// `alpha * flood_risk + beta * normalized_carbon`; lower is better.
pub fn weighted_score(weights: &ScoreWeights, flood_risk: f64, carbon_emission_kg: f64) -> f64 {
    weights.alpha() * flood_risk + weights.beta() * normalized_carbon(carbon_emission_kg)
}

pub fn route_emission_kg(distance_km: f64, mode: TransportMode) -> f64 {
    distance_km * mode.emission_factor()
}

/// Route risk is governed by the riskier endpoint.
pub fn route_flood_risk(provider_risk: f64, hospital_risk: f64) -> f64 {
    provider_risk.max(hospital_risk).clamp(0.0, 1.0)
}
