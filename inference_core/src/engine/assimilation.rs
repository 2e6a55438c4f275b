//! Assimilation - propagating confirmed facts along a paradigm's relations.
//!
//! The update is an exponential-moving-average pull toward the paradigm's
//! prediction, so repeated pulls approach but never cross 0 or 1. Observed
//! descriptors are clamped back to their observed values after every pass:
//! propagate first, then clamp.

use puzzle_rules::Paradigm;

use crate::belief::{truth_to_belief, BeliefVector, Observations};

/// Propagate one descriptor's influence along the paradigm's relations.
pub fn assimilate_descriptor(h: &mut BeliefVector, descriptor: &str, paradigm: &Paradigm) {
    for rel in paradigm.relations_from(descriptor) {
        if let Some(predicted) = paradigm.prediction(rel.target.as_str()) {
            h.pull_toward(&rel.target, truth_to_belief(predicted), rel.weight);
        }
    }
}

/// Force every observed descriptor back to its exact observed value.
pub fn clamp_to_observations(h: &mut BeliefVector, o: &Observations) {
    for (d, value) in o {
        h.set(d.clone(), truth_to_belief(*value));
    }
}

/// Assimilate every observed, conceivable descriptor the paradigm agrees with,
/// then clamp H to O.
pub fn assimilate_from_paradigm(h: &mut BeliefVector, o: &Observations, paradigm: &Paradigm) {
    for d in paradigm.conceivable() {
        if let Some(observed) = o.get(d.as_str()) {
            if paradigm.prediction(d.as_str()) == Some(*observed) {
                assimilate_descriptor(h, d.as_str(), paradigm);
            }
        }
    }
    clamp_to_observations(h, o);
}
