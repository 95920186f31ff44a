use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Candidate, HospitalId};
use super::error::ResupplyError;
use super::ranking::RankedList;
use super::service::{RecommendationQuery, ResupplyService};
use super::session::{CurrentRecommendations, RequestGeneration};
use super::source::CandidateSource;
use super::weights::ScoreWeights;

/// Router builder exposing weights, recommendations and the selection ledger.
pub fn resupply_router<S>(service: Arc<ResupplyService<S>>) -> Router
where
    S: CandidateSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/weights",
            get(weights_handler::<S>).put(update_weights_handler::<S>),
        )
        .route("/api/v1/recommendations", post(recommend_handler::<S>))
        .route(
            "/api/v1/selections",
            get(ledger_handler::<S>)
                .post(confirm_handler::<S>)
                .delete(clear_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightsUpdate {
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationBody {
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmBody {
    pub candidate: Candidate,
    pub device: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsView {
    pub hospital_id: HospitalId,
    pub generation: RequestGeneration,
    pub requested_device: Option<String>,
    pub weights: ScoreWeights,
    pub count: usize,
    pub recommendations: RankedList,
}

impl From<CurrentRecommendations> for RecommendationsView {
    fn from(current: CurrentRecommendations) -> Self {
        Self {
            hospital_id: current.hospital_id,
            generation: current.generation,
            requested_device: current.requested_device,
            weights: current.weights,
            count: current.ranked.len(),
            recommendations: current.ranked,
        }
    }
}

pub(crate) async fn weights_handler<S>(State(service): State<Arc<ResupplyService<S>>>) -> Response
where
    S: CandidateSource + 'static,
{
    (StatusCode::OK, Json(service.weights())).into_response()
}

pub(crate) async fn update_weights_handler<S>(
    State(service): State<Arc<ResupplyService<S>>>,
    Json(update): Json<WeightsUpdate>,
) -> Response
where
    S: CandidateSource + 'static,
{
    if update.alpha.is_none() && update.beta.is_none() {
        let payload = json!({ "error": "either alpha or beta is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    match apply_weights(&service, update.alpha, update.beta) {
        Ok(weights) => (StatusCode::OK, Json(weights)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommend_handler<S>(
    State(service): State<Arc<ResupplyService<S>>>,
    Json(body): Json<RecommendationBody>,
) -> Response
where
    S: CandidateSource + 'static,
{
    let weights = match requested_weights(body.alpha, body.beta) {
        Ok(weights) => weights,
        Err(error) => return error_response(error),
    };

    let query = RecommendationQuery {
        hospital_id: body.hospital_id,
        limit: body.limit,
        device: body.device,
    };

    match service.recommend_with_weights(query, weights) {
        Ok(current) => (StatusCode::OK, Json(RecommendationsView::from(current))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_handler<S>(
    State(service): State<Arc<ResupplyService<S>>>,
    Json(body): Json<ConfirmBody>,
) -> Response
where
    S: CandidateSource + 'static,
{
    match service.confirm(&body.candidate, &body.device) {
        Ok(selection) => (StatusCode::CREATED, Json(selection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ledger_handler<S>(State(service): State<Arc<ResupplyService<S>>>) -> Response
where
    S: CandidateSource + 'static,
{
    (StatusCode::OK, Json(service.ledger())).into_response()
}

pub(crate) async fn clear_handler<S>(State(service): State<Arc<ResupplyService<S>>>) -> Response
where
    S: CandidateSource + 'static,
{
    let removed = service.clear_ledger();
    (StatusCode::OK, Json(json!({ "removed": removed }))).into_response()
}

fn apply_weights<S>(
    service: &ResupplyService<S>,
    alpha: Option<f64>,
    beta: Option<f64>,
) -> Result<ScoreWeights, ResupplyError>
where
    S: CandidateSource + 'static,
{
    match (alpha, beta) {
        (Some(alpha), Some(beta)) => {
            let weights = ScoreWeights::from_pair(alpha, beta)?;
            service.replace_weights(weights);
            Ok(weights)
        }
        (Some(alpha), None) => service.set_alpha(alpha),
        (None, Some(beta)) => service.set_beta(beta),
        (None, None) => Ok(service.weights()),
    }
}

/// Weights carried by a recommendation body, validated but not yet applied.
fn requested_weights(
    alpha: Option<f64>,
    beta: Option<f64>,
) -> Result<Option<ScoreWeights>, ResupplyError> {
    match (alpha, beta) {
        (Some(alpha), Some(beta)) => ScoreWeights::from_pair(alpha, beta).map(Some),
        (Some(alpha), None) => ScoreWeights::from_alpha(alpha).map(Some),
        (None, Some(beta)) => ScoreWeights::from_beta(beta).map(Some),
        (None, None) => Ok(None),
    }
}

pub(crate) fn error_status(error: &ResupplyError) -> StatusCode {
    match error {
        ResupplyError::InvalidWeight { .. }
        | ResupplyError::InvalidLimit { .. }
        | ResupplyError::EmptyDevice => StatusCode::UNPROCESSABLE_ENTITY,
        ResupplyError::SelectionNotRanked { .. }
        | ResupplyError::StaleResponse { .. }
        | ResupplyError::RecommendationsPending { .. } => StatusCode::CONFLICT,
        ResupplyError::Source(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: ResupplyError) -> Response {
    let status = error_status(&error);
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
