use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use tracing::{info, warn};

use super::catalog::SubstituteCatalog;
use super::domain::{Candidate, ConfirmedSelection, HospitalId};
use super::error::ResupplyError;
use super::ledger::{LedgerSummary, SelectionLedger};
use super::session::{CurrentRecommendations, RecommendationSession};
use super::source::CandidateSource;
use super::weights::ScoreWeights;
use crate::config::RecommendationConfig;

/// Inputs for a recommendation refresh.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationQuery {
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub device: Option<String>,
}

/// Service composing the candidate source, recommendation session and selection ledger.
pub struct ResupplyService<S> {
    source: Arc<S>,
    ledger: Arc<SelectionLedger>,
    catalog: SubstituteCatalog,
    session: Mutex<RecommendationSession>,
    default_limit: i64,
}

impl<S> ResupplyService<S>
where
    S: CandidateSource + 'static,
{
    pub fn new(source: Arc<S>, ledger: Arc<SelectionLedger>, config: RecommendationConfig) -> Self {
        Self {
            source,
            ledger,
            catalog: SubstituteCatalog::standard(),
            session: Mutex::new(RecommendationSession::new(config.weights)),
            default_limit: config.default_limit,
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.session().weights()
    }

    pub fn set_alpha(&self, alpha: f64) -> Result<ScoreWeights, ResupplyError> {
        let weights = self.session().set_alpha(alpha)?;
        info!(alpha = weights.alpha(), beta = weights.beta(), "weights updated");
        Ok(weights)
    }

    pub fn set_beta(&self, beta: f64) -> Result<ScoreWeights, ResupplyError> {
        let weights = self.session().set_beta(beta)?;
        info!(alpha = weights.alpha(), beta = weights.beta(), "weights updated");
        Ok(weights)
    }

    pub fn replace_weights(&self, weights: ScoreWeights) {
        self.session().replace_weights(weights);
    }

    /// Fetch, filter and rank candidates for a hospital.
    ///
    /// The session lock is released while the source is consulted; if a newer request lands
    /// first this one fails with `StaleResponse` and its candidates are discarded.
    pub fn recommend(
        &self,
        query: RecommendationQuery,
    ) -> Result<CurrentRecommendations, ResupplyError> {
        self.recommend_with_weights(query, None)
    }

    /// Like [`recommend`](Self::recommend), adopting `weights` for the session first.
    ///
    /// The weights are only kept once the request is accepted; a rejected limit or a failing
    /// source leaves the previous weights in place.
    pub fn recommend_with_weights(
        &self,
        query: RecommendationQuery,
        weights: Option<ScoreWeights>,
    ) -> Result<CurrentRecommendations, ResupplyError> {
        let RecommendationQuery {
            hospital_id,
            limit,
            device,
        } = query;
        let limit = limit.unwrap_or(self.default_limit);

        let (request, previous_weights) = {
            let mut session = self.session();
            let previous = session.weights();
            if let Some(weights) = weights {
                session.replace_weights(weights);
            }
            match session.begin_request(hospital_id, limit, device) {
                Ok(request) => (request, previous),
                Err(err) => {
                    session.replace_weights(previous);
                    return Err(err);
                }
            }
        };

        let candidates = match self.source.fetch(&request) {
            Ok(candidates) => candidates,
            Err(err) => {
                let mut session = self.session();
                if session.abandon_request(request.generation)
                    && weights.is_some()
                    && session.weights() == request.weights
                {
                    session.replace_weights(previous_weights);
                }
                drop(session);
                warn!(hospital_id = %request.hospital_id, generation = %request.generation, error = %err, "candidate source failed");
                return Err(err.into());
            }
        };

        let received = candidates.len();
        let mut session = self.session();
        let current = session.apply_response(request.generation, candidates, &self.catalog)?;

        info!(
            hospital_id = %current.hospital_id,
            generation = %current.generation,
            received,
            ranked = current.ranked.len(),
            "recommendations ranked"
        );

        Ok(current.clone())
    }

    pub fn current(&self) -> Option<CurrentRecommendations> {
        self.session().current().cloned()
    }

    /// Confirm a ranked candidate, recording its savings in the ledger.
    pub fn confirm(
        &self,
        candidate: &Candidate,
        device: &str,
    ) -> Result<ConfirmedSelection, ResupplyError> {
        let session = self.session();
        session.confirm(candidate, device, &self.ledger)
    }

    pub fn ledger(&self) -> LedgerSummary {
        self.ledger.summary()
    }

    pub fn clear_ledger(&self) -> usize {
        self.ledger.clear_all()
    }

    fn session(&self) -> MutexGuard<'_, RecommendationSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
