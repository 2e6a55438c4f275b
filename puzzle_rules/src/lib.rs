//! # Puzzle Rules
//!
//! The "Puzzle Bible" crate - contains the static definition of a situation puzzle:
//! descriptors (hidden facts), paradigms (candidate explanations), and questions.
//! This crate is the single source of truth for puzzle data and does not contain
//! any belief-tracking or shift logic.

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod puzzle;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use puzzle::*;
