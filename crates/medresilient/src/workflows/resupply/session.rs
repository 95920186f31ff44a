use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::SubstituteCatalog;
use super::domain::{Candidate, ConfirmedSelection, HospitalId, SavingsEstimate};
use super::error::ResupplyError;
use super::filter::filter_candidates;
use super::ledger::SelectionLedger;
use super::ranking::{rank_candidates, RankedList};
use super::savings::calculate_savings;
use super::weights::ScoreWeights;

/// Monotonic tag attached to every recommendation request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestGeneration(pub u64);

impl fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload sent to the external scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub generation: RequestGeneration,
    pub hospital_id: HospitalId,
    #[serde(flatten)]
    pub weights: ScoreWeights,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// Ranked recommendations produced by the newest landed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentRecommendations {
    pub generation: RequestGeneration,
    pub hospital_id: HospitalId,
    pub requested_device: Option<String>,
    pub weights: ScoreWeights,
    pub ranked: RankedList,
}

/// Per-operator recommendation state: weights, the in-flight request and the latest ranked list.
///
/// Only the response to the newest request is ever applied. While that request is outstanding the
/// previous list is stale and savings/confirm against it are refused.
#[derive(Debug, Default)]
pub struct RecommendationSession {
    weights: ScoreWeights,
    latest: RequestGeneration,
    pending: Option<RecommendationRequest>,
    current: Option<CurrentRecommendations>,
}

impl RecommendationSession {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn set_alpha(&mut self, alpha: f64) -> Result<ScoreWeights, ResupplyError> {
        self.weights.set_alpha(alpha)?;
        Ok(self.weights)
    }

    pub fn set_beta(&mut self, beta: f64) -> Result<ScoreWeights, ResupplyError> {
        self.weights.set_beta(beta)?;
        Ok(self.weights)
    }

    pub fn replace_weights(&mut self, weights: ScoreWeights) {
        self.weights = weights;
    }

    /// Tag a new request with the next generation; any earlier request is superseded.
    pub fn begin_request(
        &mut self,
        hospital_id: HospitalId,
        limit: i64,
        device: Option<String>,
    ) -> Result<RecommendationRequest, ResupplyError> {
        if limit <= 0 {
            return Err(ResupplyError::InvalidLimit { limit });
        }

        self.latest = RequestGeneration(self.latest.0 + 1);
        let device = device
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let request = RecommendationRequest {
            generation: self.latest,
            hospital_id,
            weights: self.weights,
            limit,
            device,
        };
        if let Some(previous) = self.pending.replace(request.clone()) {
            debug!(superseded = %previous.generation, latest = %request.generation, "recommendation request superseded");
        }
        Ok(request)
    }

    /// Filter and rank a scorer response, provided it answers the newest request.
    pub fn apply_response(
        &mut self,
        generation: RequestGeneration,
        candidates: Vec<Candidate>,
        catalog: &SubstituteCatalog,
    ) -> Result<&CurrentRecommendations, ResupplyError> {
        let request = match self.pending.take() {
            Some(request) if request.generation == generation => request,
            other => {
                self.pending = other;
                warn!(%generation, latest = %self.latest, "discarding stale recommendation response");
                return Err(ResupplyError::StaleResponse {
                    generation,
                    latest: self.latest,
                });
            }
        };

        let filtered = filter_candidates(candidates, request.device.as_deref(), catalog);
        let ranked = rank_candidates(filtered, request.limit)?;

        Ok(self.current.insert(CurrentRecommendations {
            generation,
            hospital_id: request.hospital_id,
            requested_device: request.device,
            weights: request.weights,
            ranked,
        }))
    }

    /// Drop the outstanding request if it is still `generation`, restoring the previous list.
    pub fn abandon_request(&mut self, generation: RequestGeneration) -> bool {
        match &self.pending {
            Some(request) if request.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.pending.is_some()
    }

    pub fn latest_generation(&self) -> RequestGeneration {
        self.latest
    }

    pub fn current(&self) -> Option<&CurrentRecommendations> {
        self.current.as_ref()
    }

    /// Savings of `selected` against the current ranked list.
    pub fn savings_for(&self, selected: &Candidate) -> Result<SavingsEstimate, ResupplyError> {
        let current = self.fresh_recommendations(selected)?;
        calculate_savings(&current.ranked, selected)
    }

    /// Confirm `selected` for `device`, appending the resulting selection to `ledger`.
    ///
    /// The ranked member is recorded, so substitution tags reflect the filtered list.
    pub fn confirm(
        &self,
        selected: &Candidate,
        device: &str,
        ledger: &SelectionLedger,
    ) -> Result<ConfirmedSelection, ResupplyError> {
        if device.trim().is_empty() {
            return Err(ResupplyError::EmptyDevice);
        }

        let current = self.fresh_recommendations(selected)?;
        let savings = calculate_savings(&current.ranked, selected)?;
        let member = current
            .ranked
            .find(selected)
            .cloned()
            .ok_or_else(|| ResupplyError::SelectionNotRanked {
                provider_id: selected.provider_id.clone(),
            })?;

        ledger.confirm(member, device, savings)
    }

    fn fresh_recommendations(
        &self,
        selected: &Candidate,
    ) -> Result<&CurrentRecommendations, ResupplyError> {
        if self.pending.is_some() {
            return Err(ResupplyError::RecommendationsPending {
                generation: self.latest,
            });
        }
        self.current
            .as_ref()
            .ok_or_else(|| ResupplyError::SelectionNotRanked {
                provider_id: selected.provider_id.clone(),
            })
    }
}
