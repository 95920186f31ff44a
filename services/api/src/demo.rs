use crate::infra::DemoCandidateSource;
use clap::Args;
use medresilient::config::RecommendationConfig;
use medresilient::error::AppError;
use medresilient::workflows::resupply::{
    Candidate, HospitalId, RecommendationQuery, ResupplyService, SelectionLedger, TransportMode,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Hospital to resupply.
    #[arg(long, default_value = "H001")]
    pub(crate) hospital_id: String,
    /// Device the hospital needs. Substitutes from the catalog are accepted.
    #[arg(long)]
    pub(crate) device: Option<String>,
    /// Flood-risk weight between 0 and 1; the carbon weight becomes 1 - alpha.
    #[arg(long)]
    pub(crate) alpha: Option<f64>,
    /// Number of providers to rank.
    #[arg(long)]
    pub(crate) limit: Option<i64>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        hospital_id,
        device,
        alpha,
        limit,
    } = args;

    let service = ResupplyService::new(
        Arc::new(DemoCandidateSource),
        Arc::new(SelectionLedger::new()),
        RecommendationConfig::default(),
    );
    if let Some(alpha) = alpha {
        service.set_alpha(alpha)?;
    }

    let current = service.recommend(RecommendationQuery {
        hospital_id: HospitalId(hospital_id),
        limit,
        device,
    })?;

    println!("MedResilient resupply demo");
    println!(
        "Hospital: {} | Device: {} | Weights: flood {:.2} / carbon {:.2}",
        current.hospital_id,
        current.requested_device.as_deref().unwrap_or("any"),
        current.weights.alpha(),
        current.weights.beta()
    );

    if current.ranked.is_empty() {
        println!("\nNo providers offer the requested device or an accepted substitute.");
        return Ok(());
    }

    println!("\nRanked providers");
    for entry in current.ranked.entries() {
        let candidate = &entry.candidate;
        let substitute = if candidate.is_substitute {
            " (substitute)"
        } else {
            ""
        };
        println!(
            "  {}. {} [{}] {}{} | {:.1} km by {} | {:.1} kg CO2 | flood {:.2} ({}) | score {:.3}",
            entry.rank,
            candidate
                .provider_name
                .as_deref()
                .unwrap_or(&candidate.provider_id.0),
            candidate.provider_id,
            candidate.offered_device.as_deref().unwrap_or("-"),
            substitute,
            candidate.distance_km,
            candidate
                .transport_mode
                .map(TransportMode::label)
                .unwrap_or("unknown mode"),
            candidate.carbon_emission_kg,
            candidate.flood_risk,
            entry.risk_level.label(),
            candidate.weighted_score
        );
    }

    if let Some(best) = current.ranked.best() {
        let device = ledger_device(current.requested_device.as_deref(), best);
        let selection = service.confirm(best, &device)?;
        println!(
            "\nConfirmed {} for {}: saved {:.1} kg CO2 and {:.0} minutes against the worst ranked option",
            selection.candidate().provider_id,
            selection.device(),
            selection.carbon_saved_kg(),
            selection.time_saved_min()
        );
    }

    let summary = service.ledger();
    println!("\nSavings ledger");
    println!(
        "  Selections: {} | Carbon saved: {:.1} kg (~{} trees/year) | Time saved: {:.1} hours",
        summary.count,
        summary.total_carbon_saved_kg,
        summary.trees_equivalent,
        summary.hours_saved
    );

    Ok(())
}

/// Device recorded for a confirmed selection: what the operator asked for, else what is offered.
fn ledger_device(requested: Option<&str>, selected: &Candidate) -> String {
    requested
        .or(selected.offered_device.as_deref())
        .unwrap_or("unspecified device")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medresilient::workflows::resupply::ProviderId;

    fn cpap_offer() -> Candidate {
        Candidate {
            provider_id: ProviderId("P002".to_string()),
            hospital_id: HospitalId("H001".to_string()),
            provider_name: None,
            hospital_name: None,
            distance_km: 310.0,
            carbon_emission_kg: 7.0,
            flood_risk: 0.35,
            weighted_score: 0.2,
            transport_mode: Some(TransportMode::Rail),
            requested_device: Some("Ventilator".to_string()),
            offered_device: Some("CPAP".to_string()),
            is_substitute: true,
            estimated_time: None,
        }
    }

    #[test]
    fn substitute_selection_is_recorded_under_the_requested_device() {
        assert_eq!(ledger_device(Some("Ventilator"), &cpap_offer()), "Ventilator");
    }

    #[test]
    fn ledger_device_falls_back_to_the_offer() {
        assert_eq!(ledger_device(None, &cpap_offer()), "CPAP");

        let unlabelled = Candidate {
            offered_device: None,
            ..cpap_offer()
        };
        assert_eq!(ledger_device(None, &unlabelled), "unspecified device");
    }
}
