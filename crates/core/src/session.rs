use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::evaluator::AnswerEvaluator;
use crate::model::{DrillProgress, DrillSummary, Feedback, TermPair, Vocabulary};
use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no vocabulary to drill")]
    EmptyVocabulary,

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("cannot {operation} while the drill is {phase}")]
    InvalidTransition {
        operation: DrillOperation,
        phase: DrillPhase,
    },
}

/// External events a session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillOperation {
    Start,
    SubmitAnswer,
    Advance,
    Restart,
}

impl fmt::Display for DrillOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrillOperation::Start => "start",
            DrillOperation::SubmitAnswer => "submit an answer",
            DrillOperation::Advance => "advance",
            DrillOperation::Restart => "restart",
        })
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a session is in its lifecycle, without the attached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillPhase {
    Uninitialized,
    Active,
    Feedback,
    Complete,
}

impl fmt::Display for DrillPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrillPhase::Uninitialized => "not started",
            DrillPhase::Active => "waiting for an answer",
            DrillPhase::Feedback => "showing feedback",
            DrillPhase::Complete => "complete",
        })
    }
}

/// Tagged session state. Feedback only exists while it is being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState {
    Uninitialized,
    Active,
    Feedback(Feedback),
    Complete,
}

impl DrillState {
    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        match self {
            DrillState::Uninitialized => DrillPhase::Uninitialized,
            DrillState::Active => DrillPhase::Active,
            DrillState::Feedback(_) => DrillPhase::Feedback,
            DrillState::Complete => DrillPhase::Complete,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One randomized pass through a vocabulary.
///
/// Every operation either applies its whole transition or returns an error and
/// leaves the session untouched. Calls made from the wrong phase are rejected with
/// `SessionError::InvalidTransition`.
pub struct QuizSession {
    terms: Vec<TermPair>,
    index: usize,
    correct_count: u32,
    total_count: u32,
    state: DrillState,
    evaluator: AnswerEvaluator,
    clock: Clock,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
            index: 0,
            correct_count: 0,
            total_count: 0,
            state: DrillState::Uninitialized,
            evaluator: AnswerEvaluator::default(),
            clock: Clock::default(),
            started_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: AnswerEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Shuffle the vocabulary into a fresh drill order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if a drill is already loaded.
    /// Returns `SessionError::EmptyVocabulary` if there is nothing to drill.
    pub fn start(&mut self, vocabulary: &Vocabulary) -> Result<DrillPhase, SessionError> {
        self.start_with_rng(vocabulary, &mut rand::rng())
    }

    /// Same as [`QuizSession::start`] with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::start`].
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        vocabulary: &Vocabulary,
        rng: &mut R,
    ) -> Result<DrillPhase, SessionError> {
        if !self.can_start() {
            return Err(self.reject(DrillOperation::Start));
        }
        if vocabulary.is_empty() {
            return Err(SessionError::EmptyVocabulary);
        }

        let mut terms = vocabulary.pairs();
        terms.as_mut_slice().shuffle(rng);

        self.terms = terms;
        self.index = 0;
        self.correct_count = 0;
        self.total_count = 0;
        self.started_at = Some(self.clock.now());
        self.completed_at = None;
        self.state = DrillState::Active;
        Ok(self.phase())
    }

    /// Grade an answer for the current term.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the active phase.
    /// Returns `SessionError::EmptyAnswer` if `answer` is blank.
    pub fn submit_answer(&mut self, answer: &str) -> Result<Feedback, SessionError> {
        if !matches!(self.state, DrillState::Active) {
            return Err(self.reject(DrillOperation::SubmitAnswer));
        }
        if answer.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        let pair = self
            .terms
            .get(self.index)
            .ok_or_else(|| self.reject(DrillOperation::SubmitAnswer))?;

        let outcome = self.evaluator.evaluate(answer, &pair.target);
        let feedback = Feedback {
            outcome,
            expected: pair.target.clone(),
            answer: answer.to_string(),
        };

        self.total_count = self.total_count.saturating_add(1);
        if outcome.is_correct() {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.state = DrillState::Feedback(feedback.clone());
        Ok(feedback)
    }

    /// Dismiss feedback and move to the next term.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless feedback is showing.
    pub fn advance(&mut self) -> Result<DrillPhase, SessionError> {
        if !matches!(self.state, DrillState::Feedback(_)) {
            return Err(self.reject(DrillOperation::Advance));
        }

        self.index += 1;
        if self.index < self.terms.len() {
            self.state = DrillState::Active;
        } else {
            self.completed_at = Some(self.clock.now());
            self.state = DrillState::Complete;
        }
        Ok(self.phase())
    }

    /// Drop the current drill entirely. Valid from any phase.
    pub fn restart(&mut self) -> DrillPhase {
        self.terms.clear();
        self.index = 0;
        self.correct_count = 0;
        self.total_count = 0;
        self.started_at = None;
        self.completed_at = None;
        self.state = DrillState::Uninitialized;
        self.phase()
    }

    /// True while no term sequence is loaded.
    #[must_use]
    pub fn can_start(&self) -> bool {
        matches!(self.state, DrillState::Uninitialized) || self.terms.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> &DrillState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        self.state.phase()
    }

    /// The source term to translate, while the drill is active or showing feedback.
    #[must_use]
    pub fn current_term(&self) -> Option<&str> {
        match self.state {
            DrillState::Active | DrillState::Feedback(_) => {
                self.terms.get(self.index).map(|pair| pair.source.as_str())
            }
            DrillState::Uninitialized | DrillState::Complete => None,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        match &self.state {
            DrillState::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total_terms(&self) -> usize {
        self.terms.len()
    }

    /// Source terms in drill order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|pair| pair.source.as_str())
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// `None` unless a term is on screen.
    #[must_use]
    pub fn progress(&self) -> Option<DrillProgress> {
        self.current_term().map(|_| DrillProgress {
            position: self.index + 1,
            total: self.terms.len(),
        })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, DrillState::Complete)
    }

    /// Final tally, available once the drill is complete.
    #[must_use]
    pub fn summary(&self) -> Option<DrillSummary> {
        if !self.is_complete() {
            return None;
        }
        Some(DrillSummary {
            correct: self.correct_count,
            total: self.total_count,
            started_at: self.started_at?,
            completed_at: self.completed_at?,
        })
    }

    fn reject(&self, operation: DrillOperation) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            phase: self.phase(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase())
            .field("terms_len", &self.terms.len())
            .field("index", &self.index)
            .field("correct_count", &self.correct_count)
            .field("total_count", &self.total_count)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
