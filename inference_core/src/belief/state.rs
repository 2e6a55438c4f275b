//! Game state - everything that changes during one play session.

use puzzle_rules::{DescriptorId, ParadigmId, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;
use uuid::Uuid;

use super::BeliefVector;

/// Confirmed truth values (O).
pub type Observations = HashMap<DescriptorId, bool>;

/// Unique identifier for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Belief state of one play session.
///
/// `o`, `r`, and `answered` only grow. Every observed descriptor holds its
/// exact observed value in `h` after each engine step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub session_id: SessionId,

    /// Continuous belief vector (H).
    pub h: BeliefVector,

    /// Observed truth values (O).
    pub o: Observations,

    /// Descriptors confirmed irrelevant (R).
    pub r: HashSet<DescriptorId>,

    /// Active paradigm.
    pub p_current: ParadigmId,

    pub answered: HashSet<QuestionId>,
}

impl GameState {
    /// Create a state with the given beliefs and nothing observed.
    pub fn new(h: BeliefVector, p_current: ParadigmId) -> Self {
        Self {
            session_id: SessionId::new(),
            h,
            o: Observations::new(),
            r: HashSet::new(),
            p_current,
            answered: HashSet::new(),
        }
    }

    /// Record an observation in O and H.
    ///
    /// An observation never overwrites an earlier one with a different value;
    /// such a conflict is logged and the original value kept. Returns whether
    /// the descriptor now holds `value`.
    pub fn observe(&mut self, descriptor: &DescriptorId, value: bool) -> bool {
        match self.o.get(descriptor) {
            Some(existing) if *existing != value => {
                warn!(
                    session = %self.session_id,
                    descriptor = %descriptor,
                    kept = *existing,
                    "conflicting observation ignored"
                );
                false
            }
            _ => {
                self.o.insert(descriptor.clone(), value);
                self.h.set(descriptor.clone(), truth_to_belief(value));
                true
            }
        }
    }

    /// Record a descriptor as irrelevant. O and H are left untouched.
    pub fn mark_irrelevant(&mut self, descriptor: &DescriptorId) {
        self.r.insert(descriptor.clone());
    }

    pub fn mark_answered(&mut self, question: &QuestionId) {
        self.answered.insert(question.clone());
    }

    /// Get the observed value of a descriptor.
    pub fn observed(&self, descriptor: &str) -> Option<bool> {
        self.o.get(descriptor).copied()
    }

    pub fn is_observed(&self, descriptor: &str) -> bool {
        self.o.contains_key(descriptor)
    }

    pub fn is_irrelevant(&self, descriptor: &str) -> bool {
        self.r.contains(descriptor)
    }

    pub fn is_answered(&self, question: &str) -> bool {
        self.answered.contains(question)
    }
}

/// Map a truth value onto the belief scale.
pub fn truth_to_belief(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
