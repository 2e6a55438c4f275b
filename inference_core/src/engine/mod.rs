//! # Belief Engine
//!
//! Per-session inference: direct updates from answers, assimilation along the
//! active paradigm's relations, tension-driven paradigm shifts, and question
//! opening.
//!
//! ## Turn Order
//!
//! 1. **Direct update**: the answer's effect lands in O and H, or in R
//! 2. **Assimilation**: confirmed facts the paradigm agrees with propagate
//! 3. **Shift**: anomalies may move the player to a neighboring paradigm
//! 4. **Refresh**: newly answerable questions join the open list

pub mod assimilation;
pub mod metrics;
pub mod opening;
pub mod shift;

pub use assimilation::*;
pub use metrics::*;
pub use opening::*;
pub use shift::*;

use puzzle_rules::{Answer, DescriptorId, Effect, Paradigm, ParadigmId, Question};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::belief::{BeliefVector, GameState, Observations, UNKNOWN_BELIEF};
use crate::error::{CoreError, CoreResult};

/// Configuration for the belief engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How close a belief must be to an answer's value for the question to open.
    pub epsilon: f64,

    /// Belief assigned to every descriptor at the start of a session.
    pub unknown_belief: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.2,
            unknown_belief: UNKNOWN_BELIEF,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.epsilon > 0.0 && self.epsilon <= 1.0) {
            return Err(CoreError::InvalidConfig {
                reason: format!("epsilon must be in (0, 1], got {}", self.epsilon),
            });
        }
        if !(0.0..=1.0).contains(&self.unknown_belief) {
            return Err(CoreError::InvalidConfig {
                reason: format!("unknown_belief must be in [0, 1], got {}", self.unknown_belief),
            });
        }
        Ok(())
    }
}

/// The belief engine drives one session's state from answer to answer.
#[derive(Debug, Clone, Default)]
pub struct BeliefEngine {
    config: EngineConfig,
}

impl BeliefEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the opening state: every descriptor unknown, premises observed,
    /// then the initial paradigm's relations assimilated from the premises.
    pub fn init_game(
        &self,
        premises: &[(DescriptorId, bool)],
        paradigms: &BTreeMap<ParadigmId, Paradigm>,
        init_paradigm: &ParadigmId,
        all_descriptor_ids: &[DescriptorId],
    ) -> GameState {
        let h = BeliefVector::with_descriptors(all_descriptor_ids, self.config.unknown_belief);
        let mut state = GameState::new(h, init_paradigm.clone());

        for (d, value) in premises {
            state.observe(d, *value);
        }

        match paradigms.get(init_paradigm) {
            Some(paradigm) => assimilate_from_paradigm(&mut state.h, &state.o, paradigm),
            None => warn!(paradigm = %init_paradigm, "initial paradigm is not defined"),
        }

        debug!(
            session = %state.session_id,
            paradigm = %init_paradigm,
            premises = premises.len(),
            "game initialized"
        );
        state
    }

    /// Bootstrap questions for a paradigm. See [`opening::init_questions`].
    pub fn init_questions<'q>(
        &self,
        paradigm: &Paradigm,
        questions: &'q [Question],
        o: Option<&Observations>,
    ) -> Vec<&'q Question> {
        opening::init_questions(paradigm, questions, o)
    }

    /// Questions answerable in the current state, using the configured epsilon.
    pub fn open_questions<'q>(
        &self,
        state: &GameState,
        questions: &'q [Question],
        paradigms: &BTreeMap<ParadigmId, Paradigm>,
    ) -> Vec<&'q Question> {
        opening::open_questions(state, questions, paradigms, self.config.epsilon)
    }

    /// Apply one answered question and return the refreshed open list.
    ///
    /// The returned list keeps every previously open question except the one
    /// just answered, in order, followed by newly opened questions.
    pub fn update<'q>(
        &self,
        state: &mut GameState,
        question: &Question,
        paradigms: &BTreeMap<ParadigmId, Paradigm>,
        all_questions: &'q [Question],
        current_open: &[&'q Question],
    ) -> Vec<&'q Question> {
        // Direct update.
        let mut accepted = Vec::new();
        match question.effect() {
            Effect::Irrelevant(descriptors) => {
                for d in descriptors {
                    state.mark_irrelevant(d);
                }
            }
            Effect::Asserted(pairs) => {
                for (d, value) in pairs {
                    if state.observe(d, *value) {
                        accepted.push((d, *value));
                    }
                }
            }
        }
        state.mark_answered(&question.id);

        // Assimilation under the active paradigm.
        if let Some(current) = paradigms.get(&state.p_current) {
            for (d, value) in &accepted {
                if current.prediction(d.as_str()) == Some(*value) {
                    assimilate_descriptor(&mut state.h, d.as_str(), current);
                }
            }
            clamp_to_observations(&mut state.h, &state.o);

            // Shift evaluation.
            let current_tension = tension(&state.o, current);
            if current_tension > 0 {
                if let Some(target) = select_shift_target(&state.o, current, paradigms) {
                    if let Some(next) = paradigms.get(&target) {
                        info!(
                            session = %state.session_id,
                            from = %current.id,
                            to = %target,
                            tension = current_tension,
                            "paradigm shift"
                        );
                        state.p_current = target;
                        assimilate_from_paradigm(&mut state.h, &state.o, next);
                    }
                }
            }
        } else {
            clamp_to_observations(&mut state.h, &state.o);
        }

        // Additive refresh.
        let mut open: Vec<&'q Question> = current_open
            .iter()
            .copied()
            .filter(|q| q.id != question.id)
            .collect();
        for candidate in self.open_questions(state, all_questions, paradigms) {
            if !open.iter().any(|q| q.id == candidate.id) {
                open.push(candidate);
            }
        }

        debug!(
            session = %state.session_id,
            question = %question.id,
            paradigm = %state.p_current,
            observed = state.o.len(),
            open = open.len(),
            "turn applied"
        );
        open
    }
}

/// Check if answering this question clears the puzzle.
pub fn check_clear(question: &Question) -> bool {
    question.is_clear
}

/// The answer the game master gives to this question.
pub fn get_answer(question: &Question) -> Answer {
    question.correct_answer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> BTreeMap<ParadigmId, Paradigm> {
        let mut p1 = Paradigm::builder("P1", "Poisoned soup")
            .predictions([("Ps-1", true), ("Fs-1", true), ("Fs-2", false)])
            .relation("Ps-1", "Fs-1", 0.8)
            .build()
            .unwrap();
        p1.neighbors.insert(ParadigmId::from("P2"));
        let p2 = Paradigm::builder("P2", "Past memory")
            .predictions([("Ps-1", true), ("Fs-1", true), ("Fs-2", true), ("Fs-3", true)])
            .relation("Fs-2", "Fs-3", 0.9)
            .build()
            .unwrap();
        [p1, p2].into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn ids() -> Vec<DescriptorId> {
        ["Ps-1", "Fs-1", "Fs-2", "Fs-3", "Fs-7"]
            .into_iter()
            .map(DescriptorId::from)
            .collect()
    }

    fn start(engine: &BeliefEngine) -> GameState {
        engine.init_game(
            &[(DescriptorId::from("Ps-1"), true)],
            &soup(),
            &ParadigmId::from("P1"),
            &ids(),
        )
    }

    #[test]
    fn test_premise_bootstrap() {
        let engine = BeliefEngine::with_defaults();
        let state = start(&engine);

        assert!((state.h.get("Fs-1") - 0.9).abs() < 1e-12);
        assert_eq!(state.o.len(), 1);
        assert_eq!(state.observed("Ps-1"), Some(true));
        assert_eq!(state.h.get("Fs-3"), 0.5);
        assert_eq!(state.p_current, ParadigmId::from("P1"));
    }

    #[test]
    fn test_irrelevant_answer_touches_only_r() {
        let engine = BeliefEngine::with_defaults();
        let mut state = start(&engine);
        let before_h = state.h.clone();
        let before_o = state.o.clone();

        let question = Question::new("Q6", "Was it raining?", Answer::Irrelevant).with_irrelevant("Fs-7");
        let questions = vec![question.clone()];
        engine.update(&mut state, &question, &soup(), &questions, &[]);

        assert!(state.is_irrelevant("Fs-7"));
        assert_eq!(state.h, before_h);
        assert_eq!(state.o, before_o);
        assert!(state.is_answered("Q6"));
    }

    #[test]
    fn test_update_clamps_observations() {
        let engine = BeliefEngine::with_defaults();
        let mut state = start(&engine);

        let question = Question::new("Q1", "Did he taste it?", Answer::Yes).with_yes("Fs-1", true);
        let questions = vec![question.clone()];
        engine.update(&mut state, &question, &soup(), &questions, &[]);

        for (d, value) in &state.o {
            let expected = if *value { 1.0 } else { 0.0 };
            assert_eq!(state.h.get(d.as_str()), expected);
        }
    }

    #[test]
    fn test_anomaly_triggers_shift() {
        let engine = BeliefEngine::with_defaults();
        let mut state = start(&engine);
        let paradigms = soup();

        let question = Question::new("Q3", "Was it different before?", Answer::Yes).with_yes("Fs-2", true);
        let follow_up = Question::new("Q4", "Was he on a ship?", Answer::Yes)
            .with_yes("Fs-3", true)
            .with_paradigm("P2");
        let questions = vec![question.clone(), follow_up];
        let open = engine.update(&mut state, &question, &paradigms, &questions, &[]);

        assert_eq!(state.p_current, ParadigmId::from("P2"));
        assert!((state.h.get("Fs-3") - 0.95).abs() < 1e-12);
        let ids: Vec<_> = open.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["Q4"]);
    }

    #[test]
    fn test_refresh_is_additive() {
        let engine = BeliefEngine::with_defaults();
        let mut state = start(&engine);
        let paradigms = soup();

        // Q2 stays open even though nothing would reopen it now.
        let questions = vec![
            Question::new("Q1", "Did he taste it?", Answer::Yes).with_yes("Fs-1", true),
            Question::new("Q2", "Was it cold?", Answer::No).with_no("Fs-3", false),
        ];
        let current: Vec<&Question> = questions.iter().collect();
        let open = engine.update(&mut state, &questions[0], &paradigms, &questions, &current);

        let ids: Vec<_> = open.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["Q2"]);
    }

    #[test]
    fn test_config_from_toml() {
        let config = EngineConfig::from_toml_str("epsilon = 0.1").unwrap();
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.unknown_belief, 0.5);

        assert!(EngineConfig::from_toml_str("").is_ok());
        assert!(matches!(
            EngineConfig::from_toml_str("epsilon = 0.0"),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("unknown_belief = 1.5"),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("epsilon = \"wide\""),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_answer_helpers() {
        let q = Question::new("Q7", "Is this the answer?", Answer::Yes).clearing();
        assert!(check_clear(&q));
        assert_eq!(get_answer(&q), Answer::Yes);
    }
}
