use super::common::*;
use crate::workflows::resupply::{filter_candidates, SubstituteCatalog};

fn mixed_offers() -> Vec<crate::workflows::resupply::Candidate> {
    vec![
        offering("P1", 0.4, "CPAP"),
        offering("P2", 0.2, "Ventilator"),
        offering("P3", 0.1, "Infusion pump"),
        offering("P4", 0.3, "Ventilator"),
    ]
}

#[test]
fn no_requested_device_returns_input_untouched() {
    let catalog = SubstituteCatalog::standard();
    let input = mixed_offers();

    assert_eq!(filter_candidates(input.clone(), None, &catalog), input);
    assert_eq!(filter_candidates(input.clone(), Some("  "), &catalog), input);
}

#[test]
fn tags_exact_matches_and_catalogued_substitutes_in_input_order() {
    let catalog = SubstituteCatalog::standard();

    let filtered = filter_candidates(mixed_offers(), Some("Ventilator"), &catalog);

    let providers: Vec<&str> = filtered.iter().map(|c| c.provider_id.0.as_str()).collect();
    assert_eq!(providers, vec!["P1", "P2", "P4"]);
    assert!(filtered[0].is_substitute, "CPAP stands in for a ventilator");
    assert!(!filtered[1].is_substitute);
    assert!(!filtered[2].is_substitute);
    assert!(filtered
        .iter()
        .all(|c| c.requested_device.as_deref() == Some("Ventilator")));
}

#[test]
fn never_returns_devices_outside_the_request_or_catalog() {
    let catalog = SubstituteCatalog::standard();
    let mut input = mixed_offers();
    let mut unlabelled = candidate("P5", 0.05);
    unlabelled.offered_device = None;
    input.push(unlabelled);

    for requested in ["Ventilator", "CPAP", "Infusion pump", "Reusable electrosurgical scalpel"] {
        for kept in filter_candidates(input.clone(), Some(requested), &catalog) {
            let offered = kept.offered_device.as_deref().expect("offered device present");
            assert!(
                catalog.devices_for(requested).contains(&offered),
                "{offered} returned for {requested}"
            );
            assert_eq!(kept.is_substitute, offered != requested);
        }
    }
}

#[test]
fn substitute_flag_from_the_scorer_is_overridden_for_exact_matches() {
    let catalog = SubstituteCatalog::standard();
    let mut flagged = offering("P1", 0.2, "CPAP");
    flagged.is_substitute = true;

    let filtered = filter_candidates(vec![flagged], Some("CPAP"), &catalog);

    assert_eq!(filtered.len(), 1);
    assert!(!filtered[0].is_substitute);
}

#[test]
fn unmatched_request_yields_an_empty_list() {
    let filtered = filter_candidates(
        mixed_offers(),
        Some("Defibrillator"),
        &SubstituteCatalog::standard(),
    );
    assert!(filtered.is_empty());
}
