use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::AnswerOutcome;

/// Result of the last submitted answer, shown until the drill advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub outcome: AnswerOutcome,
    /// The correct translation, revealed after every answer.
    pub expected: String,
    /// What was submitted, as typed.
    pub answer: String,
}

/// Position of the term currently on screen, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillProgress {
    pub position: usize,
    pub total: usize,
}

/// Tally for a finished pass through the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillSummary {
    pub correct: u32,
    pub total: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl DrillSummary {
    /// Share of exact answers in `[0, 1]`; `0.0` when nothing was answered.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn accuracy_handles_zero_total() {
        let summary = DrillSummary {
            correct: 0,
            total: 0,
            started_at: fixed_now(),
            completed_at: fixed_now(),
        };
        assert_eq!(summary.accuracy(), 0.0);
    }

    #[test]
    fn accuracy_is_ratio_of_correct() {
        let summary = DrillSummary {
            correct: 3,
            total: 4,
            started_at: fixed_now(),
            completed_at: fixed_now(),
        };
        assert!((summary.accuracy() - 0.75).abs() < f64::EPSILON);
    }
}
