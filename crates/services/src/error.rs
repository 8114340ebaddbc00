//! Shared error types for the services crate.

use thiserror::Error;

use vocab_core::SessionError;

/// Errors emitted by a `Transport` while fetching raw resource bytes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("fetch timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Reasons a vocabulary resource could not be ingested.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("could not fetch {locator}: {source}")]
    Transport {
        locator: String,
        #[source]
        source: TransportError,
    },
    #[error("unknown text encoding (tried {})", tried.join(", "))]
    Encoding { tried: Vec<&'static str> },
    #[error("malformed table: {0}")]
    Malformed(#[from] csv::Error),
    #[error("columns {source_columns:?} and {target_columns:?} are required (found: {found:?})")]
    Schema {
        source_columns: Vec<String>,
        target_columns: Vec<String>,
        found: Vec<String>,
    },
}

/// Errors emitted by `DrillService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DrillError {
    #[error("unknown drill session")]
    UnknownSession,
    #[error("no vocabulary available")]
    NoVocabulary,
    #[error("drill session lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Session(#[from] SessionError),
}
