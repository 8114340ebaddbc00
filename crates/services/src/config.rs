use std::env;
use std::time::Duration;

use crate::vocabulary::{ColumnSynonyms, DEFAULT_LADDER, SNIFF_SAMPLE_BYTES, TextEncoding};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_SOURCE_URL: &str = "VOCAB_SOURCE_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "VOCAB_FETCH_TIMEOUT_SECS";
pub const ENV_ENCODINGS: &str = "VOCAB_ENCODINGS";
pub const ENV_SOURCE_COLUMNS: &str = "VOCAB_SOURCE_COLUMNS";
pub const ENV_TARGET_COLUMNS: &str = "VOCAB_TARGET_COLUMNS";

/// Where to load a vocabulary from and how to read it.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    pub locator: String,
    pub timeout: Duration,
    pub encodings: Vec<TextEncoding>,
    pub sample_bytes: usize,
    pub columns: ColumnSynonyms,
}

impl SourceConfig {
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            encodings: DEFAULT_LADDER.to_vec(),
            sample_bytes: SNIFF_SAMPLE_BYTES,
            columns: ColumnSynonyms::default(),
        }
    }

    /// Reads `VOCAB_SOURCE_URL` and the optional tuning variables.
    ///
    /// Returns `None` when no locator is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let locator = env::var(ENV_SOURCE_URL).ok()?;
        if locator.trim().is_empty() {
            return None;
        }
        let mut config = Self::new(locator.trim());

        if let Some(secs) = env::var(ENV_FETCH_TIMEOUT_SECS)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
        {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Ok(labels) = env::var(ENV_ENCODINGS) {
            config = config.with_encodings(parse_encodings(&labels));
        }
        let source = env::var(ENV_SOURCE_COLUMNS).ok().map(|v| split_list(&v));
        let target = env::var(ENV_TARGET_COLUMNS).ok().map(|v| split_list(&v));
        if source.is_some() || target.is_some() {
            let defaults = ColumnSynonyms::default();
            config = config.with_columns(ColumnSynonyms::new(
                &source.unwrap_or(defaults.source),
                &target.unwrap_or(defaults.target),
            ));
        }

        Some(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// An empty ladder falls back to the default one.
    #[must_use]
    pub fn with_encodings(mut self, encodings: Vec<TextEncoding>) -> Self {
        self.encodings = if encodings.is_empty() {
            DEFAULT_LADDER.to_vec()
        } else {
            encodings
        };
        self
    }

    #[must_use]
    pub fn with_sample_bytes(mut self, sample_bytes: usize) -> Self {
        self.sample_bytes = sample_bytes.max(1);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnSynonyms) -> Self {
        self.columns = columns;
        self
    }
}

/// Comma-separated encoding labels; unknown labels are skipped.
#[must_use]
pub fn parse_encodings(labels: &str) -> Vec<TextEncoding> {
    labels.split(',').filter_map(TextEncoding::from_label).collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
