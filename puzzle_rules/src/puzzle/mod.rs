//! Puzzle definition - the complete static data of one situation puzzle.

mod file;

pub use file::*;

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::entities::{Descriptor, DescriptorId, Paradigm, ParadigmId, Question, QuestionId};
use crate::error::{RulesError, RulesResult};

/// A validated situation puzzle, ready for derivation and play.
#[derive(Debug, Clone, Serialize)]
pub struct Puzzle {
    pub title: String,
    pub statement: String,

    /// Paradigm the player starts from.
    pub init_paradigm: ParadigmId,

    /// Premise facts known from the start, in file order.
    pub premises: Vec<(DescriptorId, bool)>,

    /// Every descriptor ID in the puzzle.
    pub all_descriptor_ids: Vec<DescriptorId>,

    /// Labelled descriptors, when the file provides them.
    pub descriptors: Vec<Descriptor>,

    /// Paradigms by ID.
    pub paradigms: BTreeMap<ParadigmId, Paradigm>,

    /// Questions in file order.
    pub questions: Vec<Question>,

    /// Explicit bootstrap question list, overriding derivation.
    pub init_question_ids: Option<Vec<QuestionId>>,
}

impl Puzzle {
    /// Assemble a puzzle from already-built parts.
    pub fn new(
        title: impl Into<String>,
        init_paradigm: impl Into<ParadigmId>,
        premises: Vec<(DescriptorId, bool)>,
        all_descriptor_ids: Vec<DescriptorId>,
        paradigms: Vec<Paradigm>,
        questions: Vec<Question>,
    ) -> RulesResult<Self> {
        let mut paradigm_map = BTreeMap::new();
        for paradigm in paradigms {
            if paradigm_map.contains_key(&paradigm.id) {
                return Err(RulesError::DuplicateParadigm(paradigm.id));
            }
            paradigm_map.insert(paradigm.id.clone(), paradigm);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(&question.id) {
                return Err(RulesError::DuplicateQuestion(question.id.clone()));
            }
        }

        let init_paradigm = init_paradigm.into();
        if !paradigm_map.contains_key(&init_paradigm) {
            return Err(RulesError::UnknownInitParadigm(init_paradigm));
        }

        Ok(Self {
            title: title.into(),
            statement: String::new(),
            init_paradigm,
            premises,
            all_descriptor_ids,
            descriptors: Vec::new(),
            paradigms: paradigm_map,
            questions,
            init_question_ids: None,
        })
    }

    /// Set the puzzle statement shown to the player.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    /// Set an explicit bootstrap question list.
    pub fn with_init_questions(mut self, ids: Vec<QuestionId>) -> RulesResult<Self> {
        for id in &ids {
            if self.question(id.as_str()).is_none() {
                return Err(RulesError::UnknownInitQuestion(id.clone()));
            }
        }
        self.init_question_ids = Some(ids);
        Ok(self)
    }

    /// Parse and validate a puzzle from its JSON text.
    pub fn from_json_str(json: &str) -> RulesResult<Self> {
        let file: PuzzleFile = serde_json::from_str(json)?;
        let puzzle = file.into_puzzle()?;
        debug!(
            title = %puzzle.title,
            paradigms = puzzle.paradigms.len(),
            questions = puzzle.questions.len(),
            descriptors = puzzle.all_descriptor_ids.len(),
            "loaded puzzle"
        );
        Ok(puzzle)
    }

    /// Get paradigm by ID.
    pub fn paradigm(&self, id: &str) -> Option<&Paradigm> {
        self.paradigms.get(id)
    }

    /// Get the starting paradigm.
    pub fn initial_paradigm(&self) -> Option<&Paradigm> {
        self.paradigms.get(&self.init_paradigm)
    }

    /// Get question by ID.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id.as_str() == id)
    }

    /// Questions that end the puzzle.
    pub fn clearing_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_clear)
    }

    /// Questions that belong to a paradigm, Q(P).
    pub fn questions_for<'a>(&'a self, paradigm: &'a ParadigmId) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |q| q.paradigms.contains(paradigm))
    }
}
