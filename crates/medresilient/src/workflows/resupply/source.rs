use super::domain::Candidate;
use super::session::RecommendationRequest;

/// Boundary to the external scorer that turns a request into scored candidates.
///
/// Responses may arrive in any order; the workflow always filters and re-ranks them.
pub trait CandidateSource: Send + Sync {
    fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Candidate>, CandidateSourceError>;
}

/// Failure reported by a candidate source.
#[derive(Debug, thiserror::Error)]
pub enum CandidateSourceError {
    #[error("hospital {0} not found")]
    UnknownHospital(String),
    #[error("recommendation source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed recommendation response: {0}")]
    Malformed(String),
}
