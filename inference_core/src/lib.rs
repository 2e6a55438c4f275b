//! # Inference Core (The Cortex)
//!
//! The "brain" of the situation-puzzle engine. This crate reads the static
//! puzzle from `puzzle_rules`, derives the paradigm improvement graph from the
//! fully resolved ground truth, and tracks the player's belief state turn by
//! turn, shifting the active paradigm when contradictions pile up.
//!
//! ## Core Components
//!
//! - **belief**: The per-session belief vector and observation sets
//! - **derivation**: One-time neighbor, threshold, and depth annotations
//! - **engine**: Assimilation, tension, shift selection, and question opening
//! - **events**: Game event types for core<->presentation communication
//! - **session**: A play session driving the engine one question at a time
//! - **diagnostics**: Offline checks of puzzle-design invariants
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The same puzzle and the same questions always yield the same state
//! - **Event-Driven**: The core reports what happened each turn, it does not own the game loop
//! - **No I/O**: Puzzle text and configuration are passed in by the caller

pub mod belief;
pub mod derivation;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod events;
pub mod session;

pub use belief::*;
pub use derivation::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use session::*;
