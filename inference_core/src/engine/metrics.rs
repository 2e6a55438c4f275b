//! Agreement measures between a paradigm and the current evidence.

use puzzle_rules::{DescriptorId, Paradigm};
use std::collections::BTreeSet;

use crate::belief::{BeliefVector, Observations};

/// Conceivable descriptors whose observed value contradicts the paradigm.
pub fn anomalies<'a>(o: &'a Observations, paradigm: &'a Paradigm) -> impl Iterator<Item = &'a DescriptorId> {
    paradigm.conceivable().iter().filter(move |d| {
        match (o.get(d.as_str()), paradigm.prediction(d.as_str())) {
            (Some(observed), Some(predicted)) => *observed != predicted,
            _ => false,
        }
    })
}

/// The anomaly set of a paradigm as an owned set.
pub fn anomaly_set(o: &Observations, paradigm: &Paradigm) -> BTreeSet<DescriptorId> {
    anomalies(o, paradigm).cloned().collect()
}

/// Number of anomalies: conceivable descriptors in O that contradict the paradigm.
pub fn tension(o: &Observations, paradigm: &Paradigm) -> usize {
    anomalies(o, paradigm).count()
}

/// Predicted descriptors whose observed value agrees with the paradigm.
pub fn explained_set(o: &Observations, paradigm: &Paradigm) -> BTreeSet<DescriptorId> {
    paradigm
        .predictions()
        .iter()
        .filter(|(d, predicted)| o.get(d.as_str()) == Some(*predicted))
        .map(|(d, _)| d.clone())
        .collect()
}

/// Mean agreement between H and every prediction of the paradigm.
///
/// Returns 0.0 for a paradigm without predictions.
pub fn alignment(h: &BeliefVector, paradigm: &Paradigm) -> f64 {
    let predictions = paradigm.predictions();
    if predictions.is_empty() {
        return 0.0;
    }

    let score: f64 = predictions
        .iter()
        .map(|(d, predicted)| {
            let belief = h.get(d.as_str());
            if *predicted {
                belief
            } else {
                1.0 - belief
            }
        })
        .sum();

    score / predictions.len() as f64
}

/// Number of `source` anomalies that `target` predicts correctly.
pub fn resolve(o: &Observations, source: &Paradigm, target: &Paradigm) -> usize {
    anomalies(o, source)
        .filter(|d| target.prediction(d.as_str()) == o.get(d.as_str()).copied())
        .count()
}
