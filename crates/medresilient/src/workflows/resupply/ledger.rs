use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{Candidate, ConfirmedSelection, SavingsEstimate, SelectionId};
use super::error::ResupplyError;

/// Average CO2 absorbed by one tree in a year.
const CARBON_PER_TREE_KG: f64 = 21.0;

/// Append-only record of confirmed selections for the session.
///
/// `confirm` and `clear_all` are the only writers and run under the same lock, so a confirm can
/// never interleave with a clear. Totals are folded over the entries on every read.
#[derive(Debug, Default)]
pub struct SelectionLedger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: Vec<ConfirmedSelection>,
    sequence: u64,
}

impl SelectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(
        &self,
        candidate: Candidate,
        device: &str,
        savings: SavingsEstimate,
    ) -> Result<ConfirmedSelection, ResupplyError> {
        self.confirm_at(candidate, device, savings, Utc::now())
    }

    /// Record a selection with an explicit confirmation time.
    pub fn confirm_at(
        &self,
        candidate: Candidate,
        device: &str,
        savings: SavingsEstimate,
        confirmed_at: DateTime<Utc>,
    ) -> Result<ConfirmedSelection, ResupplyError> {
        let device = device.trim();
        if device.is_empty() {
            return Err(ResupplyError::EmptyDevice);
        }

        let mut state = self.lock();
        state.sequence += 1;
        // The sequence breaks ties between confirmations landing in the same millisecond.
        let id = SelectionId(format!(
            "{}-{}-{}",
            candidate.provider_id,
            confirmed_at.timestamp_millis(),
            state.sequence
        ));

        let selection =
            ConfirmedSelection::new(id, candidate, device.to_string(), confirmed_at, savings);
        state.entries.push(selection.clone());

        info!(
            selection_id = %selection.id().0,
            provider_id = %selection.candidate().provider_id,
            device = selection.device(),
            carbon_saved_kg = selection.carbon_saved_kg(),
            time_saved_min = selection.time_saved_min(),
            "selection confirmed"
        );

        Ok(selection)
    }

    /// Remove every entry; returns how many were dropped.
    pub fn clear_all(&self) -> usize {
        let mut state = self.lock();
        let removed = state.entries.len();
        state.entries.clear();
        info!(removed, "selection ledger cleared");
        removed
    }

    pub fn selections(&self) -> Vec<ConfirmedSelection> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn total_carbon_saved(&self) -> f64 {
        total_carbon(&self.lock().entries)
    }

    pub fn total_time_saved(&self) -> f64 {
        total_time(&self.lock().entries)
    }

    /// Consistent snapshot of the entries and their totals.
    pub fn summary(&self) -> LedgerSummary {
        let entries = self.lock().entries.clone();
        LedgerSummary::from_entries(entries)
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn total_carbon(entries: &[ConfirmedSelection]) -> f64 {
    entries
        .iter()
        .fold(0.0, |total, entry| total + entry.carbon_saved_kg())
}

fn total_time(entries: &[ConfirmedSelection]) -> f64 {
    entries
        .iter()
        .fold(0.0, |total, entry| total + entry.time_saved_min())
}

/// Read-only view of the ledger handed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub selections: Vec<ConfirmedSelection>,
    pub count: usize,
    pub total_carbon_saved_kg: f64,
    pub total_time_saved_min: f64,
    pub trees_equivalent: u64,
    pub hours_saved: f64,
}

impl LedgerSummary {
    fn from_entries(selections: Vec<ConfirmedSelection>) -> Self {
        let total_carbon_saved_kg = total_carbon(&selections);
        let total_time_saved_min = total_time(&selections);
        Self {
            count: selections.len(),
            trees_equivalent: (total_carbon_saved_kg / CARBON_PER_TREE_KG).round() as u64,
            hours_saved: total_time_saved_min / 60.0,
            selections,
            total_carbon_saved_kg,
            total_time_saved_min,
        }
    }
}
