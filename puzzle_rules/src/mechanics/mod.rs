//! Puzzle mechanics: ground-truth answers and their effects.

use serde::{Deserialize, Serialize};

use crate::entities::DescriptorId;

/// The ground-truth answer to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    /// The probed facts play no part in the story.
    Irrelevant,
}

impl Answer {
    /// Get the wire name of this answer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Irrelevant => "irrelevant",
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What answering a question reveals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect<'a> {
    /// Facts asserted to hold the given truth values.
    Asserted(&'a [(DescriptorId, bool)]),
    /// Facts confirmed to be irrelevant; never forced to a value.
    Irrelevant(&'a [DescriptorId]),
}

impl<'a> Effect<'a> {
    /// The asserted pairs, empty for an irrelevant effect.
    pub fn asserted(&self) -> &'a [(DescriptorId, bool)] {
        match self {
            Effect::Asserted(pairs) => pairs,
            Effect::Irrelevant(_) => &[],
        }
    }

    /// Check if this effect carries no assertions.
    pub fn is_irrelevant(&self) -> bool {
        matches!(self, Effect::Irrelevant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_names() {
        assert_eq!(Answer::Yes.as_str(), "yes");
        assert_eq!(Answer::No.to_string(), "no");
        assert_eq!(Answer::Irrelevant.as_str(), "irrelevant");
    }

    #[test]
    fn test_answer_deserialize() {
        let answer: Answer = serde_json::from_str("\"irrelevant\"").unwrap();
        assert_eq!(answer, Answer::Irrelevant);
    }

    #[test]
    fn test_irrelevant_effect_has_no_assertions() {
        let ids = vec![DescriptorId::from("Fs-1")];
        let effect = Effect::Irrelevant(&ids);
        assert!(effect.is_irrelevant());
        assert!(effect.asserted().is_empty());
    }
}
