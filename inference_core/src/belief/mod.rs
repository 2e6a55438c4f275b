//! Belief module - the mutable per-session state of one play-through.
//!
//! - **BeliefVector**: continuous [0, 1] estimate per descriptor (H)
//! - **GameState**: H plus the observed set (O), irrelevant set (R), active paradigm, and answered questions

mod state;
mod vector;

pub use state::*;
pub use vector::*;
