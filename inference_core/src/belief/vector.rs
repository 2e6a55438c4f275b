//! The continuous belief vector H.

use puzzle_rules::DescriptorId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Belief assigned to a descriptor nothing is known about.
pub const UNKNOWN_BELIEF: f64 = 0.5;

/// Per-descriptor belief in [0, 1]; missing entries read as [`UNKNOWN_BELIEF`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BeliefVector {
    values: HashMap<DescriptorId, f64>,
}

impl BeliefVector {
    /// Create an empty belief vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a belief vector with every descriptor at `initial`.
    pub fn with_descriptors<'a>(
        descriptors: impl IntoIterator<Item = &'a DescriptorId>,
        initial: f64,
    ) -> Self {
        Self {
            values: descriptors
                .into_iter()
                .map(|d| (d.clone(), initial))
                .collect(),
        }
    }

    /// Get the belief for a descriptor.
    pub fn get(&self, descriptor: &str) -> f64 {
        self.values.get(descriptor).copied().unwrap_or(UNKNOWN_BELIEF)
    }

    /// Set the belief for a descriptor.
    pub fn set(&mut self, descriptor: DescriptorId, value: f64) {
        self.values.insert(descriptor, value);
    }

    /// Pull a belief toward `target` by `weight`: `h += weight * (target - h)`.
    pub fn pull_toward(&mut self, descriptor: &DescriptorId, target: f64, weight: f64) {
        let current = self.get(descriptor.as_str());
        self.values
            .insert(descriptor.clone(), current + weight * (target - current));
    }

    /// Check if a descriptor has an explicit entry.
    pub fn contains(&self, descriptor: &str) -> bool {
        self.values.contains_key(descriptor)
    }

    /// Iterate over all explicit beliefs.
    pub fn iter(&self) -> impl Iterator<Item = (&DescriptorId, &f64)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
