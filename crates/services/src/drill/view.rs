use serde::Serialize;
use vocab_core::{
    AnswerOutcome, DrillPhase, DrillProgress, DrillSummary, Feedback, QuizSession, SessionId,
};

/// Everything a presentation layer needs to render one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillSnapshot {
    pub session_id: SessionId,
    pub phase: DrillPhase,
    pub current_term: Option<String>,
    pub feedback: Option<Feedback>,
    pub progress: Option<DrillProgress>,
    pub correct_count: u32,
    pub total_count: u32,
    pub is_complete: bool,
    pub summary: Option<DrillSummary>,
}

impl DrillSnapshot {
    #[must_use]
    pub fn from_session(session_id: SessionId, session: &QuizSession) -> Self {
        Self {
            session_id,
            phase: session.phase(),
            current_term: session.current_term().map(str::to_string),
            feedback: session.feedback().cloned(),
            progress: session.progress(),
            correct_count: session.correct_count(),
            total_count: session.total_count(),
            is_complete: session.is_complete(),
            summary: session.summary(),
        }
    }

    /// One-line verdict for the feedback currently showing.
    #[must_use]
    pub fn feedback_message(&self) -> Option<String> {
        let feedback = self.feedback.as_ref()?;
        Some(match feedback.outcome {
            AnswerOutcome::Correct => "Correct!".to_string(),
            AnswerOutcome::Close => format!(
                "Almost, but not quite. The correct answer is: {}",
                feedback.expected
            ),
            AnswerOutcome::Wrong => {
                format!("Wrong. The correct answer is: {}", feedback.expected)
            }
        })
    }

    /// `"3 / 12"` while a term is showing.
    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        self.progress
            .map(|progress| format!("{} / {}", progress.position, progress.total))
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{} / {}", self.correct_count, self.total_count)
    }
}
