//! Question definitions - the player-facing yes/no/irrelevant probes.

use serde::Serialize;
use std::collections::BTreeSet;

use super::{DescriptorId, ParadigmId, QuestionId};
use crate::mechanics::{Answer, Effect};

/// An atomic player-facing probe with a fixed ground-truth answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,

    /// Facts asserted when the answer is "yes".
    pub ans_yes: Vec<(DescriptorId, bool)>,
    /// Facts asserted when the answer is "no".
    pub ans_no: Vec<(DescriptorId, bool)>,
    /// Facts confirmed irrelevant when the answer is "irrelevant".
    pub ans_irrelevant: Vec<DescriptorId>,

    pub correct_answer: Answer,

    /// Answering this question ends the puzzle successfully.
    pub is_clear: bool,

    /// Descriptors that must already be observed before the question opens.
    pub prerequisites: Vec<DescriptorId>,

    // Scoping metadata
    pub related_descriptors: Vec<DescriptorId>,
    pub topic_category: String,
    /// Paradigms this question belongs to. Empty = every paradigm.
    pub paradigms: Vec<ParadigmId>,
}

impl Question {
    /// Create a question with the given ground-truth answer and no effects.
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>, correct_answer: Answer) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ans_yes: Vec::new(),
            ans_no: Vec::new(),
            ans_irrelevant: Vec::new(),
            correct_answer,
            is_clear: false,
            prerequisites: Vec::new(),
            related_descriptors: Vec::new(),
            topic_category: String::new(),
            paradigms: Vec::new(),
        }
    }

    /// Add an assertion made by a "yes" answer.
    pub fn with_yes(mut self, descriptor: impl Into<DescriptorId>, value: bool) -> Self {
        self.ans_yes.push((descriptor.into(), value));
        self
    }

    /// Add an assertion made by a "no" answer.
    pub fn with_no(mut self, descriptor: impl Into<DescriptorId>, value: bool) -> Self {
        self.ans_no.push((descriptor.into(), value));
        self
    }

    /// Add a descriptor confirmed irrelevant by an "irrelevant" answer.
    pub fn with_irrelevant(mut self, descriptor: impl Into<DescriptorId>) -> Self {
        self.ans_irrelevant.push(descriptor.into());
        self
    }

    pub fn with_prerequisite(mut self, descriptor: impl Into<DescriptorId>) -> Self {
        self.prerequisites.push(descriptor.into());
        self
    }

    pub fn with_related(mut self, descriptor: impl Into<DescriptorId>) -> Self {
        self.related_descriptors.push(descriptor.into());
        self
    }

    pub fn with_paradigm(mut self, paradigm: impl Into<ParadigmId>) -> Self {
        self.paradigms.push(paradigm.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic_category = topic.into();
        self
    }

    /// Mark this question as the one that solves the puzzle.
    pub fn clearing(mut self) -> Self {
        self.is_clear = true;
        self
    }

    /// The effect selected by the ground-truth answer.
    pub fn effect(&self) -> Effect<'_> {
        match self.correct_answer {
            Answer::Yes => Effect::Asserted(&self.ans_yes),
            Answer::No => Effect::Asserted(&self.ans_no),
            Answer::Irrelevant => Effect::Irrelevant(&self.ans_irrelevant),
        }
    }

    /// Every descriptor this question refers to, in any answer or as related.
    pub fn referenced_descriptors(&self) -> BTreeSet<&DescriptorId> {
        self.ans_yes
            .iter()
            .chain(self.ans_no.iter())
            .map(|(d, _)| d)
            .chain(self.ans_irrelevant.iter())
            .chain(self.related_descriptors.iter())
            .collect()
    }

    /// Check if the question is in scope for a paradigm.
    pub fn belongs_to(&self, paradigm: &ParadigmId) -> bool {
        self.paradigms.is_empty() || self.paradigms.contains(paradigm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup_question(answer: Answer) -> Question {
        Question::new("Q1", "Was the soup made of turtle?", answer)
            .with_yes("Fs-1", true)
            .with_no("Fs-1", false)
            .with_irrelevant("Fs-9")
    }

    #[test]
    fn test_effect_follows_answer() {
        let yes = soup_question(Answer::Yes);
        assert_eq!(
            yes.effect(),
            Effect::Asserted(&[(DescriptorId::from("Fs-1"), true)])
        );

        let no = soup_question(Answer::No);
        assert!(!no.effect().asserted()[0].1);

        let irrelevant = soup_question(Answer::Irrelevant);
        assert!(irrelevant.effect().is_irrelevant());
    }

    #[test]
    fn test_referenced_descriptors() {
        let question = soup_question(Answer::Yes).with_related("Fs-4");
        let referenced: Vec<_> = question
            .referenced_descriptors()
            .into_iter()
            .map(|d| d.as_str())
            .collect();
        assert_eq!(referenced, vec!["Fs-1", "Fs-4", "Fs-9"]);
    }

    #[test]
    fn test_paradigm_scope() {
        let open_to_all = soup_question(Answer::Yes);
        assert!(open_to_all.belongs_to(&ParadigmId::from("P3")));

        let scoped = soup_question(Answer::Yes).with_paradigm("P1");
        assert!(scoped.belongs_to(&ParadigmId::from("P1")));
        assert!(!scoped.belongs_to(&ParadigmId::from("P2")));
    }

    #[test]
    fn test_question_builder() {
        let question = Question::new("Q9", "Did he know the truth?", Answer::Yes)
            .with_yes("Fs-5", true)
            .with_prerequisite("Fs-1")
            .with_topic("motive")
            .clearing();

        assert!(question.is_clear);
        assert_eq!(question.prerequisites.len(), 1);
        assert_eq!(question.topic_category, "motive");
    }
}
