//! # Puzzle Session
//!
//! One play-through of a puzzle. The session owns the derived puzzle, the
//! engine, and the belief state, and turns each asked question into a list of
//! [`GameEvent`]s for the presentation layer.

use puzzle_rules::{Answer, Paradigm, Puzzle, Question, QuestionId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::belief::GameState;
use crate::derivation::{derive, DerivationReport};
use crate::engine::{check_clear, get_answer, BeliefEngine, EngineConfig};
use crate::error::{CoreError, CoreResult};
use crate::events::GameEvent;

/// Result of asking one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub answer: Answer,
    pub events: Vec<GameEvent>,
    pub finished: bool,
}

/// A single play session.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    report: DerivationReport,
    engine: BeliefEngine,
    state: GameState,
    open: Vec<QuestionId>,
    finished: bool,
    cleared: bool,
}

impl PuzzleSession {
    /// Derive the puzzle and set up the opening state.
    ///
    /// The first open questions are the puzzle's explicit bootstrap list when
    /// it has one, otherwise the questions the initial paradigm agrees with.
    pub fn start(mut puzzle: Puzzle, config: EngineConfig) -> CoreResult<Self> {
        config.validate()?;
        let report = derive(&mut puzzle);
        let engine = BeliefEngine::new(config);

        let state = engine.init_game(
            &puzzle.premises,
            &puzzle.paradigms,
            &puzzle.init_paradigm,
            &puzzle.all_descriptor_ids,
        );

        let open: Vec<QuestionId> = match (&puzzle.init_question_ids, puzzle.initial_paradigm()) {
            (Some(ids), _) => ids.clone(),
            (None, Some(paradigm)) => engine
                .init_questions(paradigm, &puzzle.questions, Some(&state.o))
                .into_iter()
                .map(|q| q.id.clone())
                .collect(),
            (None, None) => Vec::new(),
        };

        info!(
            session = %state.session_id,
            title = %puzzle.title,
            paradigm = %state.p_current,
            open = open.len(),
            "session started"
        );

        let finished = open.is_empty();
        if finished {
            warn!(session = %state.session_id, "no opening questions");
        }

        Ok(Self {
            puzzle,
            report,
            engine,
            state,
            open,
            finished,
            cleared: false,
        })
    }

    /// Ask an open question and apply its answer.
    pub fn ask(&mut self, question_id: &str) -> CoreResult<TurnOutcome> {
        if self.finished {
            return Err(CoreError::SessionFinished);
        }
        let question = self
            .puzzle
            .question(question_id)
            .ok_or_else(|| CoreError::UnknownQuestion(question_id.into()))?;
        if !self.open.iter().any(|id| id.as_str() == question_id) {
            return Err(CoreError::QuestionNotOpen(question.id.clone()));
        }

        let previous_paradigm = self.state.p_current.clone();
        let previous_open: HashSet<&QuestionId> = self.open.iter().collect();
        let current_open: Vec<&Question> = self
            .open
            .iter()
            .filter_map(|id| self.puzzle.question(id.as_str()))
            .collect();

        let next_open = self.engine.update(
            &mut self.state,
            question,
            &self.puzzle.paradigms,
            &self.puzzle.questions,
            &current_open,
        );

        let answer = get_answer(question);
        let mut events = vec![GameEvent::QuestionAnswered {
            question: question.id.clone(),
            answer,
        }];

        if self.state.p_current != previous_paradigm {
            events.push(GameEvent::ParadigmShifted {
                from: previous_paradigm,
                to: self.state.p_current.clone(),
            });
        }

        let mut opened: Vec<QuestionId> = next_open
            .iter()
            .filter(|q| !previous_open.contains(&q.id))
            .map(|q| q.id.clone())
            .collect();
        opened.sort();
        if !opened.is_empty() {
            events.push(GameEvent::QuestionsOpened { ids: opened });
        }

        let next_ids: Vec<QuestionId> = next_open.iter().map(|q| q.id.clone()).collect();

        if check_clear(question) {
            info!(session = %self.state.session_id, question = %question.id, "puzzle cleared");
            events.push(GameEvent::PuzzleCleared);
            self.finished = true;
            self.cleared = true;
        } else if next_ids.is_empty() {
            warn!(
                session = %self.state.session_id,
                paradigm = %self.state.p_current,
                answered = self.state.answered.len(),
                "session stuck"
            );
            events.push(GameEvent::Stuck);
            self.finished = true;
        }
        self.open = next_ids;

        Ok(TurnOutcome {
            answer,
            events,
            finished: self.finished,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// What derivation computed for this session's puzzle.
    pub fn report(&self) -> &DerivationReport {
        &self.report
    }

    /// IDs of the currently open questions, in opening order.
    pub fn open_question_ids(&self) -> &[QuestionId] {
        &self.open
    }

    /// The currently open questions, in opening order.
    pub fn open_questions(&self) -> Vec<&Question> {
        self.open
            .iter()
            .filter_map(|id| self.puzzle.question(id.as_str()))
            .collect()
    }

    pub fn current_paradigm(&self) -> Option<&Paradigm> {
        self.puzzle.paradigm(self.state.p_current.as_str())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> Puzzle {
        let p1 = Paradigm::builder("P1", "Naive")
            .predictions([("Ps-1", true), ("Fs-1", true), ("Fs-2", false)])
            .relation("Ps-1", "Fs-1", 0.8)
            .build()
            .unwrap();
        let p2 = Paradigm::builder("P2", "True")
            .predictions([("Ps-1", true), ("Fs-1", true), ("Fs-2", true), ("Fs-3", true)])
            .relation("Fs-2", "Fs-3", 0.9)
            .build()
            .unwrap();
        let questions = vec![
            Question::new("Q1", "Did he taste it?", Answer::Yes)
                .with_yes("Fs-1", true)
                .with_yes("Fs-2", true),
            Question::new("Q2", "Was it the truth?", Answer::Yes)
                .with_yes("Fs-3", true)
                .with_paradigm("P2")
                .clearing(),
            Question::new("Q3", "Unrelated", Answer::Irrelevant).with_irrelevant("Fs-7"),
        ];
        Puzzle::new(
            "Soup",
            "P1",
            vec![("Ps-1".into(), true)],
            ["Ps-1", "Fs-1", "Fs-2", "Fs-3", "Fs-7"].into_iter().map(Into::into).collect(),
            vec![p1, p2],
            questions,
        )
        .unwrap()
        .with_init_questions(vec!["Q1".into()])
        .unwrap()
    }

    #[test]
    fn test_session_plays_to_clear() {
        let mut session = PuzzleSession::start(puzzle(), EngineConfig::default()).unwrap();
        assert_eq!(session.open_question_ids(), &[QuestionId::from("Q1")]);

        let outcome = session.ask("Q1").unwrap();
        assert_eq!(outcome.answer, Answer::Yes);
        assert_eq!(
            outcome.events,
            vec![
                GameEvent::QuestionAnswered {
                    question: "Q1".into(),
                    answer: Answer::Yes,
                },
                GameEvent::ParadigmShifted {
                    from: "P1".into(),
                    to: "P2".into(),
                },
                GameEvent::QuestionsOpened { ids: vec!["Q2".into()] },
            ]
        );
        assert!(!outcome.finished);

        let outcome = session.ask("Q2").unwrap();
        assert_eq!(outcome.events.last(), Some(&GameEvent::PuzzleCleared));
        assert!(session.is_finished());
        assert!(session.is_cleared());
        assert!(matches!(session.ask("Q2"), Err(CoreError::SessionFinished)));
    }

    #[test]
    fn test_ask_rejects_unknown_and_closed_questions() {
        let mut session = PuzzleSession::start(puzzle(), EngineConfig::default()).unwrap();

        assert!(matches!(session.ask("Q99"), Err(CoreError::UnknownQuestion(_))));
        assert!(matches!(session.ask("Q2"), Err(CoreError::QuestionNotOpen(_))));
        assert!(session.state().answered.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            epsilon: 2.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            PuzzleSession::start(puzzle(), config),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_stuck_when_nothing_opens() {
        // A tight epsilon keeps Q1 closed: H[Fs-1] is 0.9 after the premise.
        let puzzle = puzzle().with_init_questions(vec!["Q3".into()]).unwrap();
        let config = EngineConfig {
            epsilon: 0.05,
            ..EngineConfig::default()
        };
        let mut session = PuzzleSession::start(puzzle, config).unwrap();

        let outcome = session.ask("Q3").unwrap();
        assert_eq!(outcome.answer, Answer::Irrelevant);
        assert_eq!(outcome.events.last(), Some(&GameEvent::Stuck));
        assert!(outcome.finished);
        assert!(!session.is_cleared());
    }
}
