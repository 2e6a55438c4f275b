//! # Diagnostics
//!
//! Offline checks for puzzle authors. Each check runs over a derived puzzle
//! (see [`crate::derivation::derive`]) and returns a report instead of failing,
//! so a tool can print every problem at once.

mod simulation;

pub use simulation::{simulate, SimulationReport, TurnShift};

use puzzle_rules::{DescriptorId, Effect, Paradigm, ParadigmId, Puzzle, Question, QuestionId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::belief::GameState;
use crate::derivation::build_o_star;
use crate::engine::{anomaly_set, select_shift_target, tension};

/// Follow shift selection under O* from the initial paradigm until no target
/// remains or a paradigm would be revisited.
pub fn o_star_shift_chain(puzzle: &Puzzle) -> Vec<ParadigmId> {
    let o_star = build_o_star(&puzzle.questions, &puzzle.premises);
    let mut chain = vec![puzzle.init_paradigm.clone()];
    let mut current = puzzle.initial_paradigm();

    while let Some(p) = current {
        match select_shift_target(&o_star, p, &puzzle.paradigms) {
            Some(next) if !chain.contains(&next) => {
                current = puzzle.paradigms.get(&next);
                chain.push(next);
            }
            _ => break,
        }
    }
    chain
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReachabilityReport {
    pub chain: Vec<ParadigmId>,
    /// Deepest paradigm; the lowest ID wins a tie.
    pub deepest: Option<ParadigmId>,
    pub reached: bool,
}

/// Check that the O* shift chain ends at the deepest paradigm.
pub fn check_reachability(puzzle: &Puzzle) -> ReachabilityReport {
    let chain = o_star_shift_chain(puzzle);
    let deepest = puzzle
        .paradigms
        .values()
        .max_by(|a, b| a.depth.cmp(&b.depth).then_with(|| b.id.cmp(&a.id)))
        .map(|p| p.id.clone());
    let reached = match &deepest {
        Some(id) => chain.contains(id),
        None => false,
    };
    ReachabilityReport {
        chain,
        deepest,
        reached,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonotonicityReport {
    /// Anomaly count under O* at each step of the path.
    pub counts: Vec<(ParadigmId, usize)>,
    /// Consecutive steps where the count did not drop.
    pub violations: Vec<(ParadigmId, ParadigmId)>,
}

impl MonotonicityReport {
    pub fn holds(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check that anomaly counts under O* strictly decrease along `path`.
///
/// Unknown paradigm IDs are skipped.
pub fn check_anomaly_monotonicity(puzzle: &Puzzle, path: &[ParadigmId]) -> MonotonicityReport {
    let o_star = build_o_star(&puzzle.questions, &puzzle.premises);
    let counts: Vec<(ParadigmId, usize)> = path
        .iter()
        .filter_map(|id| puzzle.paradigms.get(id))
        .map(|p| (p.id.clone(), tension(&o_star, p)))
        .collect();
    let violations = counts
        .windows(2)
        .filter(|pair| pair[1].1 >= pair[0].1)
        .map(|pair| (pair[0].0.clone(), pair[1].0.clone()))
        .collect();
    MonotonicityReport { counts, violations }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    /// Required anomalies no question of the paradigm reveals.
    pub uncovered: BTreeMap<ParadigmId, BTreeSet<DescriptorId>>,
    /// Anomaly descriptors no question reveals at all.
    pub globally_uncovered: BTreeSet<DescriptorId>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty() && self.globally_uncovered.is_empty()
    }
}

fn asserted_descriptors<'q>(questions: impl IntoIterator<Item = &'q Question>) -> BTreeSet<&'q DescriptorId> {
    questions
        .into_iter()
        .flat_map(|q| q.effect().asserted().iter().map(|(d, _)| d))
        .collect()
}

/// Check that every anomaly a player must see is revealed by some question.
///
/// A paradigm's required anomalies are those no deeper paradigm shares; they
/// must be covered by the effects of the questions that belong to it. Global
/// coverage only counts questions scoped to some paradigm.
pub fn check_completeness(puzzle: &Puzzle) -> CompletenessReport {
    let o_star = build_o_star(&puzzle.questions, &puzzle.premises);
    let anomalies: BTreeMap<&ParadigmId, BTreeSet<DescriptorId>> = puzzle
        .paradigms
        .iter()
        .map(|(id, p)| (id, anomaly_set(&o_star, p)))
        .collect();

    let mut report = CompletenessReport::default();
    for p in puzzle.paradigms.values() {
        let shared: BTreeSet<&DescriptorId> = puzzle
            .paradigms
            .values()
            .filter(|deeper| deeper.depth > p.depth)
            .flat_map(|deeper| anomalies[&deeper.id].iter())
            .collect();
        let covered = asserted_descriptors(puzzle.questions_for(&p.id));

        let missing: BTreeSet<DescriptorId> = anomalies[&p.id]
            .iter()
            .filter(|d| !shared.contains(d) && !covered.contains(d))
            .cloned()
            .collect();
        if !missing.is_empty() {
            report.uncovered.insert(p.id.clone(), missing);
        }
    }

    let covered = asserted_descriptors(
        puzzle
            .questions
            .iter()
            .filter(|q| q.paradigms.iter().any(|id| puzzle.paradigms.contains_key(id))),
    );
    report.globally_uncovered = anomalies
        .values()
        .flatten()
        .filter(|d| !covered.contains(d))
        .cloned()
        .collect();
    report
}

/// A question asserting a value that contradicts an earlier premise or question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionConflict {
    pub descriptor: DescriptorId,
    pub question: QuestionId,
    pub value: bool,
    pub earlier: bool,
}

/// Find descriptors whose asserted value changes while building O*.
pub fn find_conflicting_assertions(
    questions: &[Question],
    premises: &[(DescriptorId, bool)],
) -> Vec<AssertionConflict> {
    let mut seen: HashMap<&DescriptorId, bool> = premises.iter().map(|(d, v)| (d, *v)).collect();
    let mut conflicts = Vec::new();
    for q in questions {
        for (d, value) in q.effect().asserted() {
            if let Some(earlier) = seen.insert(d, *value) {
                if earlier != *value {
                    conflicts.push(AssertionConflict {
                        descriptor: d.clone(),
                        question: q.id.clone(),
                        value: *value,
                        earlier,
                    });
                }
            }
        }
    }
    conflicts
}

/// Questions split by whether their answer contradicts a paradigm.
#[derive(Debug, Clone, Default)]
pub struct QuestionClasses<'q> {
    pub safe: Vec<&'q Question>,
    pub anomalous: Vec<&'q Question>,
}

/// Classify questions as safe or anomaly-revealing for a paradigm.
///
/// Irrelevant answers are always safe.
pub fn classify_questions<'q>(questions: &'q [Question], paradigm: &Paradigm) -> QuestionClasses<'q> {
    let mut classes = QuestionClasses::default();
    for q in questions {
        let reveals_anomaly = q
            .effect()
            .asserted()
            .iter()
            .any(|(d, v)| matches!(paradigm.prediction(d.as_str()), Some(predicted) if predicted != *v));
        if reveals_anomaly {
            classes.anomalous.push(q);
        } else {
            classes.safe.push(q);
        }
    }
    classes
}

/// Descriptors reachable from `origins` along the paradigm's relations.
///
/// Origins themselves are included only when some path leads back to them.
pub fn reachable(origins: &BTreeSet<DescriptorId>, paradigm: &Paradigm) -> BTreeSet<DescriptorId> {
    let mut result = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut frontier: VecDeque<&DescriptorId> = origins.iter().collect();

    while let Some(current) = frontier.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        for rel in paradigm.relations_from(current.as_str()) {
            if !visited.contains(&rel.target) {
                result.insert(rel.target.clone());
                frontier.push_back(&rel.target);
            }
        }
    }
    result
}

/// Relation-graph opening variant, used for connectivity checks.
///
/// A question qualifies when some asserted pair is reachable from a
/// consistent observation and agrees with the paradigm, or is reachable from
/// an anomalous observation.
pub fn reachable_questions<'q>(
    state: &GameState,
    questions: &'q [Question],
    paradigm: &Paradigm,
) -> Vec<&'q Question> {
    let mut consistent = BTreeSet::new();
    let mut anomalous = BTreeSet::new();
    for (d, value) in &state.o {
        match paradigm.prediction(d.as_str()) {
            Some(predicted) if predicted == *value => {
                consistent.insert(d.clone());
            }
            Some(_) => {
                anomalous.insert(d.clone());
            }
            None => {}
        }
    }
    let consistent_reach = reachable(&consistent, paradigm);
    let anomaly_reach = reachable(&anomalous, paradigm);

    questions
        .iter()
        .filter(|q| !state.is_answered(q.id.as_str()))
        .filter(|q| q.belongs_to(&paradigm.id))
        .filter(|q| q.prerequisites.iter().all(|d| state.is_observed(d.as_str())))
        .filter(|q| match q.effect() {
            Effect::Asserted(pairs) => pairs.iter().any(|(d, v)| {
                (consistent_reach.contains(d) && paradigm.prediction(d.as_str()) == Some(*v))
                    || anomaly_reach.contains(d)
            }),
            Effect::Irrelevant(_) => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::BeliefVector;
    use puzzle_rules::Answer;

    fn line() -> Paradigm {
        Paradigm::builder("P1", "Line")
            .predictions([("d1", true), ("d2", true), ("d3", false), ("d4", true)])
            .relation("d1", "d2", 0.8)
            .relation("d2", "d3", 0.8)
            .build()
            .unwrap()
    }

    fn state(observed: &[(&str, bool)]) -> GameState {
        let mut state = GameState::new(BeliefVector::new(), ParadigmId::from("P1"));
        for (d, v) in observed {
            state.observe(&DescriptorId::from(*d), *v);
        }
        state
    }

    #[test]
    fn test_reachable_follows_multiple_hops() {
        let origins: BTreeSet<_> = [DescriptorId::from("d1")].into_iter().collect();
        let reach = reachable(&origins, &line());

        let expected: BTreeSet<_> = ["d2", "d3"].into_iter().map(DescriptorId::from).collect();
        assert_eq!(reach, expected);
        assert!(reachable(&BTreeSet::new(), &line()).is_empty());
    }

    #[test]
    fn test_reachable_questions_consistent_origin() {
        let questions = vec![
            Question::new("q1", "d2?", Answer::Yes).with_yes("d2", true),
            Question::new("q2", "d2 wrong?", Answer::No).with_no("d2", false),
            Question::new("q3", "d4?", Answer::Yes).with_yes("d4", true),
        ];
        let found: Vec<_> = reachable_questions(&state(&[("d1", true)]), &questions, &line())
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();

        // q2 contradicts the prediction and q3 has no relation path.
        assert_eq!(found, vec!["q1"]);
    }

    #[test]
    fn test_reachable_questions_anomalous_origin() {
        let questions = vec![Question::new("q1", "d2 wrong?", Answer::No).with_no("d2", false)];
        let found = reachable_questions(&state(&[("d1", false)]), &questions, &line());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_classify_questions() {
        let questions = vec![
            Question::new("q1", "Safe", Answer::Yes).with_yes("d1", true),
            Question::new("q2", "Anomaly", Answer::Yes).with_yes("d3", true),
            Question::new("q3", "Irrelevant", Answer::Irrelevant).with_irrelevant("d3"),
            Question::new("q4", "Unpredicted", Answer::Yes).with_yes("d9", false),
        ];
        let classes = classify_questions(&questions, &line());

        let safe: Vec<_> = classes.safe.iter().map(|q| q.id.as_str()).collect();
        let anomalous: Vec<_> = classes.anomalous.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(safe, vec!["q1", "q3", "q4"]);
        assert_eq!(anomalous, vec!["q2"]);
    }

    #[test]
    fn test_unscoped_question_does_not_cover_anomaly() {
        let p1 = Paradigm::builder("P1", "Naive")
            .predictions([("d1", true), ("d2", true)])
            .build()
            .unwrap();
        let questions = vec![
            Question::new("q1", "Unscoped", Answer::No).with_no("d1", false),
            Question::new("q2", "Scoped", Answer::Yes)
                .with_yes("d2", true)
                .with_paradigm("P1"),
        ];
        let puzzle = Puzzle::new(
            "Coverage",
            "P1",
            Vec::new(),
            vec!["d1".into(), "d2".into()],
            vec![p1],
            questions,
        )
        .unwrap();

        let report = check_completeness(&puzzle);
        let expected: BTreeSet<_> = [DescriptorId::from("d1")].into_iter().collect();
        assert_eq!(report.uncovered[&ParadigmId::from("P1")], expected);
        assert_eq!(report.globally_uncovered, expected);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_find_conflicting_assertions() {
        let premises = vec![(DescriptorId::from("d1"), true)];
        let questions = vec![
            Question::new("q1", "Agrees", Answer::Yes).with_yes("d1", true),
            Question::new("q2", "Flips", Answer::No).with_no("d1", false),
            Question::new("q3", "Fresh", Answer::Yes).with_yes("d2", true),
        ];
        let conflicts = find_conflicting_assertions(&questions, &premises);

        assert_eq!(
            conflicts,
            vec![AssertionConflict {
                descriptor: DescriptorId::from("d1"),
                question: QuestionId::from("q2"),
                value: false,
                earlier: true,
            }]
        );
    }
}
