#![forbid(unsafe_code)]

pub mod evaluator;
pub mod model;
pub mod session;
pub mod time;

pub use evaluator::{AnswerEvaluator, CLOSE_MATCH_THRESHOLD, similarity_ratio};
pub use model::{
    AnswerOutcome, DrillProgress, DrillSummary, Feedback, SessionId, TermPair, Vocabulary,
    normalize_term,
};
pub use session::{DrillOperation, DrillPhase, DrillState, QuizSession, SessionError};
pub use time::Clock;
