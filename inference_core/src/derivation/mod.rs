//! # Derivation
//!
//! Everything that can be known about a puzzle before anyone plays it. The
//! fully resolved observation set O* (premises plus every question's correct
//! answer) fixes which paradigms improve on which, how much evidence a shift
//! needs, and how deep each paradigm sits.
//!
//! Derivation runs once per puzzle and writes `neighbors`, `shift_threshold`,
//! and `depth` onto each paradigm.

mod depth;
mod neighborhood;

pub use depth::compute_depths;
pub use neighborhood::{compute_neighborhoods, compute_shift_thresholds};

use puzzle_rules::{DescriptorId, ParadigmId, Puzzle, Question};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::belief::Observations;
use crate::engine::{anomaly_set, explained_set};

/// Strict subset: `a ⊊ b`.
pub(crate) fn is_strict_subset<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.len() < b.len() && a.is_subset(b)
}

/// Build O*: premises first, then every question's asserted effect in order.
///
/// Later writes win. Irrelevant answers contribute nothing.
pub fn build_o_star(questions: &[Question], premises: &[(DescriptorId, bool)]) -> Observations {
    let mut o_star: Observations = premises.iter().cloned().collect();
    for question in questions {
        for (d, value) in question.effect().asserted() {
            o_star.insert(d.clone(), *value);
        }
    }
    o_star
}

/// What derivation computed, kept for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct DerivationReport {
    pub o_star: Observations,
    pub anomalies: BTreeMap<ParadigmId, BTreeSet<DescriptorId>>,
    pub explained: BTreeMap<ParadigmId, BTreeSet<DescriptorId>>,
}

/// Derive and store neighbors, shift thresholds, and depths for every paradigm.
pub fn derive(puzzle: &mut Puzzle) -> DerivationReport {
    let o_star = build_o_star(&puzzle.questions, &puzzle.premises);

    let neighborhoods = compute_neighborhoods(&puzzle.paradigms, &o_star);
    for (id, neighbors) in neighborhoods {
        if let Some(p) = puzzle.paradigms.get_mut(&id) {
            p.neighbors = neighbors;
        }
    }

    let thresholds = compute_shift_thresholds(&puzzle.paradigms, &o_star);
    let depths = compute_depths(&puzzle.paradigms, &o_star);
    for p in puzzle.paradigms.values_mut() {
        if let Some(threshold) = thresholds.get(&p.id) {
            p.shift_threshold = *threshold;
        }
        if let Some(depth) = depths.get(&p.id) {
            p.depth = *depth;
        }
    }

    let mut anomalies = BTreeMap::new();
    let mut explained = BTreeMap::new();
    for p in puzzle.paradigms.values() {
        let anomaly = anomaly_set(&o_star, p);
        debug!(
            paradigm = %p.id,
            anomalies = anomaly.len(),
            neighbors = p.neighbors.len(),
            threshold = ?p.shift_threshold,
            depth = p.depth,
            "paradigm derived"
        );
        anomalies.insert(p.id.clone(), anomaly);
        explained.insert(p.id.clone(), explained_set(&o_star, p));
    }

    info!(
        title = %puzzle.title,
        paradigms = puzzle.paradigms.len(),
        o_star = o_star.len(),
        max_depth = puzzle.paradigms.values().map(|p| p.depth).max().unwrap_or(0),
        "derivation complete"
    );

    DerivationReport {
        o_star,
        anomalies,
        explained,
    }
}
