//! Automated play-through for checking that a puzzle can be finished.

use puzzle_rules::{ParadigmId, Puzzle, QuestionId};
use serde::Serialize;
use tracing::debug;

use crate::engine::EngineConfig;
use crate::error::CoreResult;
use crate::events::GameEvent;
use crate::session::PuzzleSession;

/// A paradigm shift observed during simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnShift {
    /// 1-based turn on which the shift happened.
    pub step: usize,
    pub question: QuestionId,
    pub from: ParadigmId,
    pub to: ParadigmId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub steps: usize,
    pub asked: Vec<QuestionId>,
    pub shifts: Vec<TurnShift>,
    /// Paradigms in the order they became active, starting with the initial one.
    pub visited: Vec<ParadigmId>,
    pub cleared: bool,
    pub stuck: bool,
}

/// Play the puzzle by always asking the open question with the lowest ID.
pub fn simulate(puzzle: Puzzle, config: EngineConfig) -> CoreResult<SimulationReport> {
    let mut session = PuzzleSession::start(puzzle, config)?;
    let mut report = SimulationReport {
        steps: 0,
        asked: Vec::new(),
        shifts: Vec::new(),
        visited: vec![session.state().p_current.clone()],
        cleared: false,
        stuck: false,
    };

    while !session.is_finished() {
        let Some(next) = session.open_question_ids().iter().min().cloned() else {
            break;
        };
        let outcome = session.ask(next.as_str())?;
        report.steps += 1;

        for event in &outcome.events {
            if let GameEvent::ParadigmShifted { from, to } = event {
                report.shifts.push(TurnShift {
                    step: report.steps,
                    question: next.clone(),
                    from: from.clone(),
                    to: to.clone(),
                });
                report.visited.push(to.clone());
            }
        }
        report.asked.push(next);
    }

    report.cleared = session.is_cleared();
    report.stuck = !report.cleared;
    debug!(
        steps = report.steps,
        shifts = report.shifts.len(),
        cleared = report.cleared,
        "simulation finished"
    );
    Ok(report)
}
