use super::domain::ProviderId;
use super::session::RequestGeneration;
use super::source::CandidateSourceError;

/// Validation and sequencing failures raised by the recommendation and savings workflow.
///
/// Every variant is recoverable by the caller correcting its input or re-issuing a request.
#[derive(Debug, thiserror::Error)]
pub enum ResupplyError {
    #[error("weight {value} is outside the range [0, 1]")]
    InvalidWeight { value: f64 },
    #[error("rank limit must be positive, got {limit}")]
    InvalidLimit { limit: i64 },
    #[error("provider {provider_id} is not part of the current ranked recommendations")]
    SelectionNotRanked { provider_id: ProviderId },
    #[error("a device is required to confirm a selection")]
    EmptyDevice,
    #[error("response for request {generation} was superseded by request {latest}")]
    StaleResponse {
        generation: RequestGeneration,
        latest: RequestGeneration,
    },
    #[error("recommendations are refreshing (request {generation}); retry once it lands")]
    RecommendationsPending { generation: RequestGeneration },
    #[error(transparent)]
    Source(#[from] CandidateSourceError),
}
