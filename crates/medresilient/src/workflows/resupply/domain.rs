use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for supply providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for hospitals receiving resupply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HospitalId(pub String);

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Freight mode used by a provider for the delivery route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Truck,
    Van,
    Air,
    Rail,
    Ship,
}

impl TransportMode {
    /// Emission factor in kg CO2 per km travelled.
    pub const fn emission_factor(self) -> f64 {
        match self {
            TransportMode::Truck => 0.21,
            TransportMode::Van => 0.15,
            TransportMode::Air => 1.13,
            TransportMode::Rail => 0.03,
            TransportMode::Ship => 0.01,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TransportMode::Truck => "truck",
            TransportMode::Van => "van",
            TransportMode::Air => "air",
            TransportMode::Rail => "rail",
            TransportMode::Ship => "ship",
        }
    }
}

/// Display band for a route's flood risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_flood_risk(flood_risk: f64) -> Self {
        if flood_risk > 0.6 {
            RiskLevel::High
        } else if flood_risk > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// One provider scored against one hospital by the external recommendation scorer.
///
/// `weighted_score` is opaque here: lower is better, and the workflow only orders by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub provider_id: ProviderId,
    pub hospital_id: HospitalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    pub distance_km: f64,
    pub carbon_emission_kg: f64,
    pub flood_risk: f64,
    pub weighted_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
    #[serde(default)]
    pub requested_device: Option<String>,
    #[serde(default)]
    pub offered_device: Option<String>,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

impl Candidate {
    /// Two candidates describe the same offer when provider, hospital and device line up.
    pub fn same_offer(&self, other: &Candidate) -> bool {
        self.provider_id == other.provider_id
            && self.hospital_id == other.hospital_id
            && self.offered_device == other.offered_device
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_flood_risk(self.flood_risk)
    }
}

/// Identifier of a confirmed selection, unique within a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionId(pub String);

/// Carbon and delivery-time benefit of picking a candidate over the worst ranked option.
///
/// Both figures are clamped at zero on construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SavingsEstimate {
    carbon_saved_kg: f64,
    time_saved_min: f64,
}

impl SavingsEstimate {
    pub fn new(carbon_saved_kg: f64, time_saved_min: f64) -> Self {
        Self {
            carbon_saved_kg: carbon_saved_kg.max(0.0),
            time_saved_min: time_saved_min.max(0.0),
        }
    }

    pub fn carbon_saved_kg(&self) -> f64 {
        self.carbon_saved_kg
    }

    pub fn time_saved_min(&self) -> f64 {
        self.time_saved_min
    }
}

/// A user-confirmed provider choice recorded in the selection ledger.
///
/// Only the ledger creates these, and nothing mutates one after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedSelection {
    id: SelectionId,
    candidate: Candidate,
    device: String,
    confirmed_at: DateTime<Utc>,
    carbon_saved_kg: f64,
    time_saved_min: f64,
}

impl ConfirmedSelection {
    pub(crate) fn new(
        id: SelectionId,
        candidate: Candidate,
        device: String,
        confirmed_at: DateTime<Utc>,
        savings: SavingsEstimate,
    ) -> Self {
        Self {
            id,
            candidate,
            device,
            confirmed_at,
            carbon_saved_kg: savings.carbon_saved_kg(),
            time_saved_min: savings.time_saved_min(),
        }
    }

    pub fn id(&self) -> &SelectionId {
        &self.id
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn confirmed_at(&self) -> DateTime<Utc> {
        self.confirmed_at
    }

    pub fn carbon_saved_kg(&self) -> f64 {
        self.carbon_saved_kg
    }

    pub fn time_saved_min(&self) -> f64 {
        self.time_saved_min
    }
}
