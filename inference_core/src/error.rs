//! Errors surfaced by the inference core.

use puzzle_rules::{QuestionId, RulesError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid puzzle: {0}")]
    Rules(#[from] RulesError),

    #[error("failed to parse engine config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid engine config: {reason}")]
    InvalidConfig { reason: String },

    #[error("question {0} is not defined")]
    UnknownQuestion(QuestionId),

    #[error("question {0} is not open")]
    QuestionNotOpen(QuestionId),

    #[error("session has already finished")]
    SessionFinished,
}

pub type CoreResult<T> = Result<T, CoreError>;
