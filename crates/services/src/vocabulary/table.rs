use vocab_core::{Vocabulary, normalize_term};

use crate::error::IngestError;

/// Accepted header names for the source and target columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSynonyms {
    pub source: Vec<String>,
    pub target: Vec<String>,
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        Self {
            source: vec!["finnish".into(), "suomi".into(), "fi".into()],
            target: vec!["english".into(), "englanti".into(), "en".into()],
        }
    }
}

impl ColumnSynonyms {
    /// Synonyms are normalized so lookups can compare against normalized headers.
    #[must_use]
    pub fn new<S: AsRef<str>>(source: &[S], target: &[S]) -> Self {
        let normalize = |names: &[S]| -> Vec<String> {
            names
                .iter()
                .map(|name| normalize_term(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect()
        };
        Self {
            source: normalize(source),
            target: normalize(target),
        }
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub source: usize,
    pub target: usize,
}

/// Find the source and target columns in a header row.
///
/// Synonyms are tried in order; a header name that occurs twice resolves to its last
/// occurrence.
///
/// # Errors
///
/// Returns `IngestError::Schema` naming the headers found when either column is missing.
pub fn resolve_columns<S: AsRef<str>>(
    headers: &[S],
    synonyms: &ColumnSynonyms,
) -> Result<ResolvedColumns, IngestError> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|header| normalize_term(header.as_ref()))
        .collect();

    let find = |candidates: &[String]| {
        candidates
            .iter()
            .find_map(|candidate| normalized.iter().rposition(|header| header == candidate))
    };

    match (
        find(synonyms.source.as_slice()),
        find(synonyms.target.as_slice()),
    ) {
        (Some(source), Some(target)) => Ok(ResolvedColumns { source, target }),
        _ => Err(IngestError::Schema {
            source_columns: synonyms.source.clone(),
            target_columns: synonyms.target.clone(),
            found: headers
                .iter()
                .map(|header| header.as_ref().trim().to_string())
                .collect(),
        }),
    }
}

/// Parse delimited text with a header row into a vocabulary.
///
/// Rows may have any length; missing cells read as empty and such rows are skipped.
///
/// # Errors
///
/// Returns `IngestError::Malformed` for reader failures and `IngestError::Schema` when
/// the header row lacks a required column.
pub fn parse_vocabulary(
    text: &str,
    delimiter: u8,
    synonyms: &ColumnSynonyms,
) -> Result<Vocabulary, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = resolve_columns(&headers, synonyms)?;

    let mut vocabulary = Vocabulary::new();
    for record in reader.records() {
        let record = record?;
        let source = record.get(columns.source).unwrap_or_default();
        let target = record.get(columns.target).unwrap_or_default();
        vocabulary.insert(source, target);
    }
    Ok(vocabulary)
}
