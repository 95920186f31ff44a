//! Supplier recommendation and savings workflow.
//!
//! Scored candidates from the external scorer are filtered by requested device, ranked by
//! weighted score, and turned into savings entries once an operator confirms a choice.

pub mod catalog;
pub mod domain;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod ranking;
pub mod router;
pub mod savings;
pub mod scoring;
pub mod service;
pub mod session;
pub mod source;
pub mod weights;

#[cfg(test)]
mod tests;

pub use catalog::SubstituteCatalog;
pub use domain::{
    Candidate, ConfirmedSelection, HospitalId, ProviderId, RiskLevel, SavingsEstimate,
    SelectionId, TransportMode,
};
pub use error::ResupplyError;
pub use filter::filter_candidates;
pub use ledger::{LedgerSummary, SelectionLedger};
pub use ranking::{rank_candidates, RankedCandidate, RankedList, DEFAULT_RANK_LIMIT};
pub use router::{resupply_router, RecommendationsView};
pub use savings::{calculate_savings, ASSUMED_SPEED_KMH};
pub use service::{RecommendationQuery, ResupplyService};
pub use session::{
    CurrentRecommendations, RecommendationRequest, RecommendationSession, RequestGeneration,
};
pub use source::{CandidateSource, CandidateSourceError};
pub use weights::{ScoreWeights, WEIGHT_TOLERANCE};
