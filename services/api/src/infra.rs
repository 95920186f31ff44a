use metrics_exporter_prometheus::PrometheusHandle;
use medresilient::workflows::resupply::scoring::{
    route_emission_kg, route_flood_risk, weighted_score,
};
use medresilient::workflows::resupply::{
    Candidate, CandidateSource, CandidateSourceError, HospitalId, ProviderId,
    RecommendationRequest, TransportMode,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct DemoHospital {
    id: &'static str,
    name: &'static str,
    flood_risk: f64,
}

struct DemoProvider {
    id: &'static str,
    name: &'static str,
    device: &'static str,
    mode: TransportMode,
    flood_risk: f64,
}

/// Route distance in km from provider to hospital.
struct DemoRoute {
    hospital: &'static str,
    provider: &'static str,
    distance_km: f64,
}

/// In-memory stand-in for the route/flood scorer, backed by a fixed hospital network.
#[derive(Default, Clone)]
pub(crate) struct DemoCandidateSource;

const HOSPITALS: &[DemoHospital] = &[
    DemoHospital {
        id: "H001",
        name: "Riverside General Hospital",
        flood_risk: 0.35,
    },
    DemoHospital {
        id: "H002",
        name: "Harbor View Medical Center",
        flood_risk: 0.65,
    },
];

const PROVIDERS: &[DemoProvider] = &[
    DemoProvider {
        id: "P001",
        name: "Gulf Coast Medical Distributors",
        device: "Ventilator",
        mode: TransportMode::Truck,
        flood_risk: 0.55,
    },
    DemoProvider {
        id: "P002",
        name: "Upland Respiratory Supply",
        device: "CPAP",
        mode: TransportMode::Rail,
        flood_risk: 0.1,
    },
    DemoProvider {
        id: "P003",
        name: "Metro Critical Care Logistics",
        device: "Ventilator",
        mode: TransportMode::Van,
        flood_risk: 0.2,
    },
    DemoProvider {
        id: "P004",
        name: "Northfield Surgical",
        device: "Single-use electrosurgical scalpel",
        mode: TransportMode::Truck,
        flood_risk: 0.15,
    },
    DemoProvider {
        id: "P005",
        name: "Sterile Cycle Reprocessing",
        device: "Reusable electrosurgical scalpel",
        mode: TransportMode::Van,
        flood_risk: 0.3,
    },
    DemoProvider {
        id: "P006",
        name: "Skyline Air Medical",
        device: "Ventilator",
        mode: TransportMode::Air,
        flood_risk: 0.05,
    },
];

const ROUTES: &[DemoRoute] = &[
    DemoRoute {
        hospital: "H001",
        provider: "P001",
        distance_km: 42.0,
    },
    DemoRoute {
        hospital: "H001",
        provider: "P002",
        distance_km: 310.0,
    },
    DemoRoute {
        hospital: "H001",
        provider: "P003",
        distance_km: 88.0,
    },
    DemoRoute {
        hospital: "H001",
        provider: "P004",
        distance_km: 150.0,
    },
    DemoRoute {
        hospital: "H001",
        provider: "P005",
        distance_km: 35.0,
    },
    DemoRoute {
        hospital: "H001",
        provider: "P006",
        distance_km: 620.0,
    },
    DemoRoute {
        hospital: "H002",
        provider: "P001",
        distance_km: 18.0,
    },
    DemoRoute {
        hospital: "H002",
        provider: "P002",
        distance_km: 280.0,
    },
    DemoRoute {
        hospital: "H002",
        provider: "P003",
        distance_km: 130.0,
    },
    DemoRoute {
        hospital: "H002",
        provider: "P006",
        distance_km: 540.0,
    },
];

/// Rough door-to-door estimate used for display only.
fn estimated_time(distance_km: f64, mode: TransportMode) -> String {
    let speed_kmh = match mode {
        TransportMode::Air => 600.0,
        TransportMode::Rail => 80.0,
        TransportMode::Ship => 30.0,
        TransportMode::Truck | TransportMode::Van => 60.0,
    };
    let minutes = (distance_km / speed_kmh * 60.0).round() as u64;
    if minutes >= 60 {
        format!("{} hours {} mins", minutes / 60, minutes % 60)
    } else {
        format!("{minutes} mins")
    }
}

impl CandidateSource for DemoCandidateSource {
    fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        let hospital = HOSPITALS
            .iter()
            .find(|hospital| hospital.id == request.hospital_id.0)
            .ok_or_else(|| CandidateSourceError::UnknownHospital(request.hospital_id.0.clone()))?;

        ROUTES
            .iter()
            .filter(|route| route.hospital == hospital.id)
            .map(|route| {
                let provider = PROVIDERS
                    .iter()
                    .find(|provider| provider.id == route.provider)
                    .ok_or_else(|| {
                        CandidateSourceError::Malformed(format!(
                            "route references unknown provider {}",
                            route.provider
                        ))
                    })?;
                let carbon = route_emission_kg(route.distance_km, provider.mode);
                let flood_risk = route_flood_risk(provider.flood_risk, hospital.flood_risk);

                Ok(Candidate {
                    provider_id: ProviderId(provider.id.to_string()),
                    hospital_id: HospitalId(hospital.id.to_string()),
                    provider_name: Some(provider.name.to_string()),
                    hospital_name: Some(hospital.name.to_string()),
                    distance_km: route.distance_km,
                    carbon_emission_kg: carbon,
                    flood_risk,
                    weighted_score: weighted_score(&request.weights, flood_risk, carbon),
                    transport_mode: Some(provider.mode),
                    requested_device: request.device.clone(),
                    offered_device: Some(provider.device.to_string()),
                    is_substitute: false,
                    estimated_time: Some(estimated_time(route.distance_km, provider.mode)),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medresilient::workflows::resupply::{RequestGeneration, ScoreWeights};

    fn request(hospital: &str) -> RecommendationRequest {
        RecommendationRequest {
            generation: RequestGeneration(1),
            hospital_id: HospitalId(hospital.to_string()),
            weights: ScoreWeights::default(),
            limit: 5,
            device: None,
        }
    }

    #[test]
    fn demo_source_scores_every_route_for_the_hospital() {
        let candidates = DemoCandidateSource.fetch(&request("H001")).expect("known hospital");
        assert_eq!(candidates.len(), 6);
        assert!(candidates
            .iter()
            .all(|candidate| candidate.flood_risk >= 0.35));
    }

    #[test]
    fn demo_source_rejects_unknown_hospitals() {
        assert!(matches!(
            DemoCandidateSource.fetch(&request("H999")),
            Err(CandidateSourceError::UnknownHospital(_))
        ));
    }

    #[test]
    fn estimated_time_formats_hours() {
        assert_eq!(estimated_time(90.0, TransportMode::Truck), "1 hours 30 mins");
        assert_eq!(estimated_time(30.0, TransportMode::Van), "30 mins");
    }
}
