mod ids;
mod outcome;
mod session;
mod vocabulary;

pub use ids::SessionId;
pub use outcome::AnswerOutcome;
pub use session::{DrillProgress, DrillSummary, Feedback};
pub use vocabulary::{TermPair, Vocabulary, normalize_term};
