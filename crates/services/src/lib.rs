#![forbid(unsafe_code)]

pub mod config;
pub mod drill;
pub mod error;
pub mod vocabulary;

pub use vocab_core::Clock;

pub use config::SourceConfig;
pub use drill::{DrillService, DrillSnapshot};
pub use error::{DrillError, IngestError, TransportError};
pub use vocabulary::{VocabularyLoad, VocabularySource};
