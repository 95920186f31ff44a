use super::domain::{Candidate, SavingsEstimate};
use super::error::ResupplyError;
use super::ranking::RankedList;

/// Fixed delivery speed used to turn a distance delta into minutes.
pub const ASSUMED_SPEED_KMH: f64 = 60.0;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Savings of `selected` relative to the worst (last) candidate of `ranked`.
///
/// Figures come from the ranked member rather than the caller's copy of the candidate, and are
/// clamped at zero.
pub fn calculate_savings(
    ranked: &RankedList,
    selected: &Candidate,
) -> Result<SavingsEstimate, ResupplyError> {
    let (member, worst) = ranked
        .find(selected)
        .zip(ranked.worst())
        .ok_or_else(|| ResupplyError::SelectionNotRanked {
            provider_id: selected.provider_id.clone(),
        })?;

    let carbon_saved = worst.carbon_emission_kg - member.carbon_emission_kg;
    let distance_saved = worst.distance_km - member.distance_km;
    let time_saved = distance_saved * MINUTES_PER_HOUR / ASSUMED_SPEED_KMH;

    Ok(SavingsEstimate::new(carbon_saved, time_saved))
}
