//! Shift-target selection under the minimum-relaxation principle.
//!
//! Candidates are the derived neighbors of the active paradigm that carry
//! strictly less tension under the current observations and resolve enough of
//! the active paradigm's anomalies to meet their own shift threshold. Among
//! those, the smallest improvement wins:
//!
//! 1. tension, descending
//! 2. attention, descending (active anomalies the candidate can conceive of)
//! 3. resolve, ascending (attended anomalies the candidate predicts correctly)
//! 4. paradigm ID, ascending

use puzzle_rules::{DescriptorId, Paradigm, ParadigmId};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use super::metrics::{anomaly_set, resolve, tension};
use crate::belief::Observations;

/// A scored shift candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftCandidate {
    pub paradigm: ParadigmId,
    pub tension: usize,
    pub attention: usize,
    pub resolve: usize,
}

impl ShiftCandidate {
    fn rank_key(&self) -> (Reverse<usize>, Reverse<usize>, usize, &ParadigmId) {
        (
            Reverse(self.tension),
            Reverse(self.attention),
            self.resolve,
            &self.paradigm,
        )
    }
}

/// All licensed shift candidates for the active paradigm, best first.
pub fn shift_candidates(
    o: &Observations,
    current: &Paradigm,
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
) -> Vec<ShiftCandidate> {
    let current_tension = tension(o, current);
    if current_tension == 0 {
        return Vec::new();
    }
    let current_anomalies: BTreeSet<DescriptorId> = anomaly_set(o, current);

    let mut candidates: Vec<ShiftCandidate> = current
        .neighbors
        .iter()
        .filter(|id| **id != current.id)
        .filter_map(|id| paradigms.get(id))
        .filter_map(|candidate| {
            let candidate_tension = tension(o, candidate);
            if candidate_tension >= current_tension {
                return None;
            }

            let licensed = resolve(o, current, candidate);
            if let Some(threshold) = candidate.shift_threshold {
                if licensed < threshold {
                    return None;
                }
            }

            let attended: Vec<_> = current_anomalies
                .iter()
                .filter(|d| candidate.is_conceivable(d.as_str()))
                .collect();
            let resolved = attended
                .iter()
                .filter(|d| candidate.prediction(d.as_str()) == o.get(d.as_str()).copied())
                .count();

            Some(ShiftCandidate {
                paradigm: candidate.id.clone(),
                tension: candidate_tension,
                attention: attended.len(),
                resolve: resolved,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));
    candidates
}

/// Pick the paradigm to shift to, or `None` when the active paradigm is in
/// crisis with no licensed relaxation available.
pub fn select_shift_target(
    o: &Observations,
    current: &Paradigm,
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
) -> Option<ParadigmId> {
    shift_candidates(o, current, paradigms)
        .into_iter()
        .next()
        .map(|c| c.paradigm)
}
