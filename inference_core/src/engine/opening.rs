//! Question opening - which questions the player may ask next.

use puzzle_rules::{Effect, Paradigm, ParadigmId, Question};
use std::collections::BTreeMap;

use crate::belief::{truth_to_belief, GameState, Observations};

/// Check if any referenced descriptor lies outside the paradigm's conceivable set.
pub fn is_blocked_by_conceivable(question: &Question, paradigm: &Paradigm) -> bool {
    question
        .referenced_descriptors()
        .into_iter()
        .any(|d| !paradigm.is_conceivable(d.as_str()))
}

/// Check if every prerequisite has been observed.
pub fn prerequisites_met(question: &Question, o: &Observations) -> bool {
    question
        .prerequisites
        .iter()
        .all(|d| o.contains_key(d.as_str()))
}

/// Questions answerable in the current state.
///
/// A question opens when it is unanswered, in scope for the active paradigm,
/// references only conceivable descriptors, has its prerequisites observed,
/// and at least one asserted fact is already believed within `epsilon` of
/// its eventual value.
pub fn open_questions<'q>(
    state: &GameState,
    questions: &'q [Question],
    paradigms: &BTreeMap<ParadigmId, Paradigm>,
    epsilon: f64,
) -> Vec<&'q Question> {
    let current = paradigms.get(&state.p_current);

    questions
        .iter()
        .filter(|q| !state.is_answered(q.id.as_str()))
        .filter(|q| q.belongs_to(&state.p_current))
        .filter(|q| match current {
            Some(p) if !p.conceivable().is_empty() => !is_blocked_by_conceivable(q, p),
            _ => true,
        })
        .filter(|q| prerequisites_met(q, &state.o))
        .filter(|q| match q.effect() {
            Effect::Asserted(pairs) => pairs
                .iter()
                .any(|(d, v)| (state.h.get(d.as_str()) - truth_to_belief(*v)).abs() < epsilon),
            Effect::Irrelevant(_) => false,
        })
        .collect()
}

/// Bootstrap questions for a fresh paradigm: the asserted effect agrees with
/// at least one prediction and contradicts none. When `o` is given,
/// prerequisites must already be observed.
pub fn init_questions<'q>(
    paradigm: &Paradigm,
    questions: &'q [Question],
    o: Option<&Observations>,
) -> Vec<&'q Question> {
    questions
        .iter()
        .filter(|q| o.map_or(true, |o| prerequisites_met(q, o)))
        .filter(|q| {
            let pairs = q.effect().asserted();
            let mut matched = false;
            for (d, v) in pairs {
                match paradigm.prediction(d.as_str()) {
                    Some(predicted) if predicted == *v => matched = true,
                    Some(_) => return false,
                    None => {}
                }
            }
            matched
        })
        .collect()
}
