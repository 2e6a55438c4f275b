//! Game events - what happened during a turn, for the presentation layer.

use puzzle_rules::{Answer, ParadigmId, QuestionId};
use serde::{Deserialize, Serialize};

/// Something the player should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The game master answered a question.
    QuestionAnswered {
        question: QuestionId,
        answer: Answer,
    },

    /// The player's working hypothesis changed.
    ParadigmShifted { from: ParadigmId, to: ParadigmId },

    /// New questions became available. IDs are sorted.
    QuestionsOpened { ids: Vec<QuestionId> },

    /// A clearing question was answered.
    PuzzleCleared,

    /// Nothing is left to ask and the puzzle is not cleared.
    Stuck,
}

impl GameEvent {
    /// Check if this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::PuzzleCleared | GameEvent::Stuck)
    }
}
