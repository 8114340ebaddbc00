use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single submitted answer.
///
/// - `Correct`: identical to the expected answer after normalization
/// - `Close`: not identical, but similar enough to count as a typo
/// - `Wrong`: anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Close,
    Wrong,
}

impl AnswerOutcome {
    /// Only exact answers count towards the correct tally.
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerOutcome::Correct => "correct",
            AnswerOutcome::Close => "close",
            AnswerOutcome::Wrong => "wrong",
        }
    }
}

impl fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
