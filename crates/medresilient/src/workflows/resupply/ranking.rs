use serde::Serialize;

use super::domain::{Candidate, RiskLevel};
use super::error::ResupplyError;

pub const DEFAULT_RANK_LIMIT: i64 = 5;

/// Candidate annotated with its 1-based display rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub risk_level: RiskLevel,
    #[serde(flatten)]
    pub candidate: Candidate,
}

/// Candidates ordered best (lowest weighted score) first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<RankedCandidate>,
}

impl RankedList {
    pub fn entries(&self) -> &[RankedCandidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().map(|entry| &entry.candidate)
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.entries.first().map(|entry| &entry.candidate)
    }

    pub fn worst(&self) -> Option<&Candidate> {
        self.entries.last().map(|entry| &entry.candidate)
    }

    /// The ranked member describing the same offer as `candidate`.
    pub fn find(&self, candidate: &Candidate) -> Option<&Candidate> {
        self.candidates().find(|member| member.same_offer(candidate))
    }
}

/// Order candidates ascending by weighted score and keep the first `limit`.
///
/// The sort is stable, so equal scores keep the order the scorer returned them in.
pub fn rank_candidates(
    mut candidates: Vec<Candidate>,
    limit: i64,
) -> Result<RankedList, ResupplyError> {
    if limit <= 0 {
        return Err(ResupplyError::InvalidLimit { limit });
    }

    candidates.sort_by(|left, right| left.weighted_score.total_cmp(&right.weighted_score));
    let keep = usize::try_from(limit).unwrap_or(usize::MAX);
    candidates.truncate(keep);

    let entries = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| RankedCandidate {
            rank: index + 1,
            risk_level: candidate.risk_level(),
            candidate,
        })
        .collect();

    Ok(RankedList { entries })
}
