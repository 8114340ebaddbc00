use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trims surrounding whitespace and lower-cases a term.
#[must_use]
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One source term with its expected translation, both normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPair {
    pub source: String,
    pub target: String,
}

impl TermPair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Mapping from normalized source term to normalized target term.
///
/// Every key and value is non-empty and already normalized. Inserting an existing
/// source term replaces its translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    entries: BTreeMap<String, String>,
}

impl Vocabulary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes both sides and stores the pair.
    ///
    /// Returns `false` (and stores nothing) when either side is empty after normalization.
    pub fn insert(&mut self, source: &str, target: &str) -> bool {
        let source = normalize_term(source);
        let target = normalize_term(target);
        if source.is_empty() || target.is_empty() {
            return false;
        }
        self.entries.insert(source, target);
        true
    }

    #[must_use]
    pub fn translation(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    #[must_use]
    pub fn pairs(&self) -> Vec<TermPair> {
        self.iter()
            .map(|(source, target)| TermPair::new(source, target))
            .collect()
    }
}

impl<S: AsRef<str>, T: AsRef<str>> FromIterator<(S, T)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for (source, target) in iter {
            vocabulary.insert(source.as_ref(), target.as_ref());
        }
        vocabulary
    }
}
