//! Configuration errors raised while building a puzzle.
//!
//! Every variant marks corrupt puzzle data. None of them are recovered from:
//! a puzzle that fails to build must not be playable.

use crate::entities::{DescriptorId, ParadigmId, QuestionId};

/// Data-integrity violations found at load time.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("paradigm {paradigm}: descriptor {descriptor} is predicted both true and false")]
    ConflictingPrediction {
        paradigm: ParadigmId,
        descriptor: DescriptorId,
    },

    #[error("paradigm {paradigm}: conceivable descriptors without a prediction: {descriptors:?}")]
    ConceivableWithoutPrediction {
        paradigm: ParadigmId,
        descriptors: Vec<DescriptorId>,
    },

    #[error("paradigm {paradigm}: relation endpoint {descriptor} is not conceivable")]
    RelationOutsideConceivable {
        paradigm: ParadigmId,
        descriptor: DescriptorId,
    },

    #[error("paradigm {paradigm}: relation {source_id} -> {target} has weight {weight} outside (0, 1]")]
    InvalidRelationWeight {
        paradigm: ParadigmId,
        source_id: DescriptorId,
        target: DescriptorId,
        weight: f64,
    },

    #[error("descriptor {descriptor} has truth value {value}, expected 0 or 1")]
    InvalidTruthValue { descriptor: DescriptorId, value: i64 },

    #[error("duplicate paradigm id {0}")]
    DuplicateParadigm(ParadigmId),

    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("initial paradigm {0} is not defined")]
    UnknownInitParadigm(ParadigmId),

    #[error("initial question {0} is not defined")]
    UnknownInitQuestion(QuestionId),

    #[error("failed to parse puzzle file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for puzzle construction.
pub type RulesResult<T> = Result<T, RulesError>;
