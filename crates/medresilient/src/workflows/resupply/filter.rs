use tracing::debug;

use super::catalog::SubstituteCatalog;
use super::domain::Candidate;

/// Narrow scored candidates to those able to serve `requested_device`.
///
/// Exact matches are tagged `is_substitute = false`, catalogued substitutes `true`, and everything
/// else (including candidates that do not state an offered device) is dropped. Input order is
/// preserved. Without a requested device the list is returned untouched.
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    requested_device: Option<&str>,
    catalog: &SubstituteCatalog,
) -> Vec<Candidate> {
    let requested = match requested_device.map(str::trim) {
        Some(device) if !device.is_empty() => device,
        _ => return candidates,
    };

    let accepted = catalog.devices_for(requested);
    let received = candidates.len();
    let filtered: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|candidate| tag_for_request(candidate, requested, &accepted))
        .collect();

    debug!(
        requested_device = requested,
        received,
        kept = filtered.len(),
        substitutes = filtered.iter().filter(|c| c.is_substitute).count(),
        "filtered candidates by device"
    );

    filtered
}

fn tag_for_request(
    mut candidate: Candidate,
    requested: &str,
    accepted: &[&str],
) -> Option<Candidate> {
    let offered = candidate.offered_device.as_deref()?.trim();
    if !accepted.contains(&offered) {
        return None;
    }
    let is_substitute = offered != requested;

    candidate.requested_device = Some(requested.to_string());
    candidate.is_substitute = is_substitute;
    Some(candidate)
}
