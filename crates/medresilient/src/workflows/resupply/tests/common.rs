use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use axum::response::Response;
use serde_json::Value;

use crate::config::RecommendationConfig;
use crate::workflows::resupply::domain::{Candidate, HospitalId, ProviderId, TransportMode};
use crate::workflows::resupply::session::RecommendationRequest;
use crate::workflows::resupply::source::{CandidateSource, CandidateSourceError};
use crate::workflows::resupply::{
    rank_candidates, RankedList, RecommendationQuery, ResupplyService, SelectionLedger,
};

pub(super) const HOSPITAL: &str = "H001";

pub(super) fn candidate(provider: &str, weighted_score: f64) -> Candidate {
    Candidate {
        provider_id: ProviderId(provider.to_string()),
        hospital_id: HospitalId(HOSPITAL.to_string()),
        provider_name: Some(format!("{provider} Medical Supply")),
        hospital_name: Some("Riverside General".to_string()),
        distance_km: 50.0,
        carbon_emission_kg: 10.0,
        flood_risk: 0.2,
        weighted_score,
        transport_mode: Some(TransportMode::Truck),
        requested_device: None,
        offered_device: Some("Ventilator".to_string()),
        is_substitute: false,
        estimated_time: Some("1 hour".to_string()),
    }
}

pub(super) fn route(provider: &str, weighted_score: f64, carbon: f64, distance: f64) -> Candidate {
    Candidate {
        carbon_emission_kg: carbon,
        distance_km: distance,
        ..candidate(provider, weighted_score)
    }
}

pub(super) fn offering(provider: &str, weighted_score: f64, device: &str) -> Candidate {
    Candidate {
        offered_device: Some(device.to_string()),
        ..candidate(provider, weighted_score)
    }
}

/// Best-to-worst fixture: emissions 10/15/20 kg over 50/80/120 km.
pub(super) fn three_routes() -> Vec<Candidate> {
    vec![
        route("P-WORST", 0.70, 20.0, 120.0),
        route("P-BEST", 0.20, 10.0, 50.0),
        route("P-MID", 0.45, 15.0, 80.0),
    ]
}

pub(super) fn ranked(candidates: Vec<Candidate>) -> RankedList {
    rank_candidates(candidates, 10).expect("positive limit")
}

pub(super) fn query(device: Option<&str>) -> RecommendationQuery {
    RecommendationQuery {
        hospital_id: HospitalId(HOSPITAL.to_string()),
        limit: None,
        device: device.map(str::to_string),
    }
}

pub(super) fn build_service(
    candidates: Vec<Candidate>,
) -> (
    ResupplyService<MemorySource>,
    Arc<MemorySource>,
    Arc<SelectionLedger>,
) {
    let source = Arc::new(MemorySource::new(candidates));
    let ledger = Arc::new(SelectionLedger::new());
    let service = ResupplyService::new(
        source.clone(),
        ledger.clone(),
        RecommendationConfig::default(),
    );
    (service, source, ledger)
}

#[derive(Default)]
pub(super) struct MemorySource {
    candidates: Vec<Candidate>,
    requests: Mutex<Vec<RecommendationRequest>>,
}

impl MemorySource {
    pub(super) fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<RecommendationRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

impl CandidateSource for MemorySource {
    fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request.clone());
        Ok(self.candidates.clone())
    }
}

pub(super) struct UnavailableSource;

impl CandidateSource for UnavailableSource {
    fn fetch(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        Err(CandidateSourceError::Unavailable("scorer offline".to_string()))
    }
}

/// Source whose first fetch issues a newer request through the service before answering.
#[derive(Default)]
pub(super) struct OvertakenSource {
    pub(super) candidates: Vec<Candidate>,
    pub(super) service: OnceLock<Weak<ResupplyService<OvertakenSource>>>,
    fired: AtomicBool,
}

impl OvertakenSource {
    pub(super) fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }
}

impl CandidateSource for OvertakenSource {
    fn fetch(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        if !self.fired.swap(true, Ordering::SeqCst) {
            if let Some(service) = self.service.get().and_then(Weak::upgrade) {
                service
                    .recommend(query(None))
                    .expect("overtaking request lands");
            }
        }
        Ok(self.candidates.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
