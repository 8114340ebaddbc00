//! Ingestion of loosely formatted vocabulary tables.

mod decode;
mod delimiter;
mod locator;
mod source;
mod table;
mod transport;

pub use decode::{DEFAULT_LADDER, TextEncoding, decode_with_ladder};
pub use delimiter::{CANDIDATE_DELIMITERS, SNIFF_SAMPLE_BYTES, detect_delimiter, sniff_delimiter};
pub use locator::direct_download_locator;
pub use source::{VocabularyLoad, VocabularySource, ingest_bytes};
pub use table::{ColumnSynonyms, ResolvedColumns, parse_vocabulary, resolve_columns};
pub use transport::{FileTransport, HttpTransport, Transport, is_remote};
