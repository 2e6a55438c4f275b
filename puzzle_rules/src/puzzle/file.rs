//! On-disk puzzle format.
//!
//! Truth values are written as `0`/`1` and pairs as JSON arrays, e.g.
//! `"ps_values": [["Ps-1", 1]]`. The records here mirror the file exactly;
//! [`PuzzleFile::into_puzzle`] turns them into validated domain types.

use serde::{Deserialize, Serialize};

use super::Puzzle;
use crate::entities::{Descriptor, DescriptorId, Paradigm, ParadigmId, Question, QuestionId};
use crate::error::{RulesError, RulesResult};
use crate::mechanics::Answer;

/// A `[descriptor, 0|1]` pair as written in the file.
pub type TruthRecord = (String, i64);

/// Top-level puzzle record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleFile {
    pub title: String,
    #[serde(default)]
    pub statement: String,
    pub init_paradigm: String,
    #[serde(default)]
    pub ps_values: Vec<TruthRecord>,
    #[serde(default)]
    pub all_descriptor_ids: Vec<String>,
    #[serde(default)]
    pub descriptors: Vec<DescriptorRecord>,
    pub paradigms: Vec<ParadigmRecord>,
    pub questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub init_question_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParadigmRecord {
    pub id: String,
    pub name: String,
    pub p_pred: Vec<TruthRecord>,
    #[serde(default)]
    pub relations: Vec<(String, String, f64)>,
    /// Absent = every predicted descriptor is conceivable.
    #[serde(default)]
    pub conceivable: Option<Vec<String>>,
    #[serde(default)]
    pub shift_threshold: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub ans_yes: Vec<TruthRecord>,
    #[serde(default)]
    pub ans_no: Vec<TruthRecord>,
    #[serde(default)]
    pub ans_irrelevant: Vec<String>,
    pub correct_answer: Answer,
    #[serde(default)]
    pub is_clear: bool,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub related_descriptors: Vec<String>,
    #[serde(default)]
    pub topic_category: String,
    #[serde(default)]
    pub paradigms: Vec<String>,
}

fn truth_value(descriptor: &str, value: i64) -> RulesResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(RulesError::InvalidTruthValue {
            descriptor: DescriptorId::from(descriptor),
            value,
        }),
    }
}

fn truth_pairs(records: Vec<TruthRecord>) -> RulesResult<Vec<(DescriptorId, bool)>> {
    records
        .into_iter()
        .map(|(d, v)| {
            let value = truth_value(&d, v)?;
            Ok::<_, RulesError>((DescriptorId::from(d), value))
        })
        .collect()
}

fn ids<T: From<String>>(raw: Vec<String>) -> Vec<T> {
    raw.into_iter().map(T::from).collect()
}

impl ParadigmRecord {
    /// Build and validate the paradigm.
    pub fn into_paradigm(self) -> RulesResult<Paradigm> {
        let mut builder = Paradigm::builder(self.id, self.name).predictions(truth_pairs(self.p_pred)?);
        if let Some(conceivable) = self.conceivable {
            builder = builder.conceivable(conceivable);
        }
        for (source, target, weight) in self.relations {
            builder = builder.relation(source, target, weight);
        }
        if let Some(threshold) = self.shift_threshold {
            builder = builder.shift_threshold(threshold);
        }
        builder.build()
    }
}

impl QuestionRecord {
    pub fn into_question(self) -> RulesResult<Question> {
        Ok(Question {
            id: QuestionId::from(self.id),
            text: self.text,
            ans_yes: truth_pairs(self.ans_yes)?,
            ans_no: truth_pairs(self.ans_no)?,
            ans_irrelevant: ids(self.ans_irrelevant),
            correct_answer: self.correct_answer,
            is_clear: self.is_clear,
            prerequisites: ids(self.prerequisites),
            related_descriptors: ids(self.related_descriptors),
            topic_category: self.topic_category,
            paradigms: ids(self.paradigms),
        })
    }
}

impl PuzzleFile {
    /// Convert the file records into a validated [`Puzzle`].
    pub fn into_puzzle(self) -> RulesResult<Puzzle> {
        let paradigms = self
            .paradigms
            .into_iter()
            .map(ParadigmRecord::into_paradigm)
            .collect::<RulesResult<Vec<_>>>()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<RulesResult<Vec<_>>>()?;

        let mut puzzle = Puzzle::new(
            self.title,
            ParadigmId::from(self.init_paradigm),
            truth_pairs(self.ps_values)?,
            ids(self.all_descriptor_ids),
            paradigms,
            questions,
        )?
        .with_statement(self.statement);

        puzzle.descriptors = self
            .descriptors
            .into_iter()
            .map(|d| Descriptor::new(d.id, d.label))
            .collect();

        match self.init_question_ids {
            Some(init) => puzzle.with_init_questions(ids(init)),
            None => Ok(puzzle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "title": "Turtle Soup",
        "statement": "A man orders turtle soup and later dies.",
        "init_paradigm": "P1",
        "ps_values": [["Ps-1", 1]],
        "all_descriptor_ids": ["Ps-1", "Fs-1"],
        "paradigms": [
            {
                "id": "P1",
                "name": "Ordinary meal",
                "p_pred": [["Ps-1", 1], ["Fs-1", 1]],
                "relations": [["Ps-1", "Fs-1", 0.8]]
            }
        ],
        "questions": [
            {
                "id": "Q1",
                "text": "Was it really turtle?",
                "ans_yes": [["Fs-1", 1]],
                "ans_no": [["Fs-1", 0]],
                "ans_irrelevant": [],
                "correct_answer": "no",
                "prerequisites": ["Ps-1"]
            }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_puzzle() {
        let puzzle = Puzzle::from_json_str(MINIMAL).unwrap();

        assert_eq!(puzzle.title, "Turtle Soup");
        assert_eq!(puzzle.premises, vec![(DescriptorId::from("Ps-1"), true)]);

        let p1 = puzzle.paradigm("P1").unwrap();
        assert_eq!(p1.conceivable().len(), 2);
        assert_eq!(p1.relations()[0].weight, 0.8);

        let q1 = puzzle.question("Q1").unwrap();
        assert_eq!(q1.correct_answer, Answer::No);
        assert!(!q1.is_clear);
        assert!(q1.paradigms.is_empty());
        assert_eq!(q1.prerequisites, vec![DescriptorId::from("Ps-1")]);
    }

    #[test]
    fn test_truth_value_must_be_binary() {
        let json = MINIMAL.replace(r#"["Ps-1", 1]],"#, r#"["Ps-1", 2]],"#);
        let result = Puzzle::from_json_str(&json);
        assert!(matches!(result, Err(RulesError::InvalidTruthValue { value: 2, .. })));
    }

    #[test]
    fn test_malformed_paradigm_is_fatal() {
        let json = MINIMAL.replace(r#"[["Ps-1", "Fs-1", 0.8]]"#, r#"[["Ps-1", "Fs-7", 0.8]]"#);
        let result = Puzzle::from_json_str(&json);
        assert!(matches!(result, Err(RulesError::RelationOutsideConceivable { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let result = Puzzle::from_json_str("{ not json");
        assert!(matches!(result, Err(RulesError::Parse(_))));
    }

    #[test]
    fn test_init_question_ids() {
        let json = MINIMAL.replace(
            r#""all_descriptor_ids""#,
            r#""init_question_ids": ["Q1"], "all_descriptor_ids""#,
        );
        let puzzle = Puzzle::from_json_str(&json).unwrap();
        assert_eq!(puzzle.init_question_ids, Some(vec![QuestionId::from("Q1")]));
    }
}
