use std::sync::Arc;

use tracing::{debug, info, warn};
use vocab_core::Vocabulary;

use super::decode::decode_with_ladder;
use super::delimiter::detect_delimiter;
use super::locator::direct_download_locator;
use super::table::parse_vocabulary;
use super::transport::{FileTransport, HttpTransport, Transport, is_remote};
use crate::config::SourceConfig;
use crate::error::IngestError;

/// Outcome of one ingestion attempt.
///
/// Failures are values, not errors: callers always get a usable (possibly empty)
/// vocabulary and can still inspect why loading failed.
#[derive(Debug)]
pub enum VocabularyLoad {
    Loaded(Vocabulary),
    Failed(IngestError),
}

impl VocabularyLoad {
    /// True when a non-empty vocabulary was loaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, VocabularyLoad::Loaded(vocabulary) if !vocabulary.is_empty())
    }

    #[must_use]
    pub fn failure(&self) -> Option<&IngestError> {
        match self {
            VocabularyLoad::Loaded(_) => None,
            VocabularyLoad::Failed(err) => Some(err),
        }
    }

    /// The loaded vocabulary, or an empty one after a failure.
    #[must_use]
    pub fn into_vocabulary(self) -> Vocabulary {
        match self {
            VocabularyLoad::Loaded(vocabulary) => vocabulary,
            VocabularyLoad::Failed(_) => Vocabulary::new(),
        }
    }
}

/// Decode, sniff and parse raw resource bytes.
///
/// # Errors
///
/// Returns `IngestError` for encoding, table-structure or schema problems.
pub fn ingest_bytes(bytes: &[u8], config: &SourceConfig) -> Result<Vocabulary, IngestError> {
    let (text, encoding) = decode_with_ladder(bytes, &config.encodings)?;
    let delimiter = detect_delimiter(&text, config.sample_bytes);
    debug!(
        encoding = encoding.label(),
        delimiter = %char::from(delimiter).escape_default(),
        "decoded vocabulary resource"
    );
    parse_vocabulary(&text, delimiter, &config.columns)
}

/// Loads term pairs from a tabular resource.
#[derive(Clone)]
pub struct VocabularySource {
    config: SourceConfig,
    transport: Arc<dyn Transport>,
}

impl VocabularySource {
    #[must_use]
    pub fn new(config: SourceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Picks HTTP for `http(s)://` locators and the local filesystem otherwise.
    #[must_use]
    pub fn from_config(config: SourceConfig) -> Self {
        let transport: Arc<dyn Transport> = if is_remote(&config.locator) {
            Arc::new(HttpTransport::new())
        } else {
            Arc::new(FileTransport)
        };
        Self::new(config, transport)
    }

    #[must_use]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch and parse the configured resource.
    ///
    /// # Errors
    ///
    /// Returns `IngestError` for any transport, encoding, structure or schema failure.
    pub async fn try_load(&self) -> Result<Vocabulary, IngestError> {
        let locator = direct_download_locator(&self.config.locator);
        let bytes = self
            .transport
            .fetch(&locator, self.config.timeout)
            .await
            .map_err(|source| IngestError::Transport {
                locator: locator.clone(),
                source,
            })?;
        let vocabulary = ingest_bytes(&bytes, &self.config)?;
        info!(
            locator = %locator,
            bytes = bytes.len(),
            terms = vocabulary.len(),
            "vocabulary loaded"
        );
        Ok(vocabulary)
    }

    /// Like [`VocabularySource::try_load`], but failures are logged and returned as
    /// [`VocabularyLoad::Failed`].
    pub async fn load(&self) -> VocabularyLoad {
        match self.try_load().await {
            Ok(vocabulary) => VocabularyLoad::Loaded(vocabulary),
            Err(err) => {
                warn!(locator = %self.config.locator, "loading vocabulary failed: {err}");
                VocabularyLoad::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned bytes and remembers the locator it was asked for.
    struct StaticTransport {
        body: Result<Vec<u8>, u16>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        fn ok(body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_vec()),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn status(code: u16) -> Arc<Self> {
            Arc::new(Self {
                body: Err(code),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, locator: &str, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
            self.requested.lock().unwrap().push(locator.to_string());
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(code) => Err(TransportError::HttpStatus(
                    reqwest::StatusCode::from_u16(*code).unwrap(),
                )),
            }
        }
    }

    fn source(transport: Arc<StaticTransport>) -> VocabularySource {
        VocabularySource::new(
            SourceConfig::new("https://www.dropbox.com/s/x/words.csv?dl=0"),
            transport,
        )
    }

    #[tokio::test]
    async fn semicolon_and_comma_files_give_same_vocabulary() {
        let semicolon = source(StaticTransport::ok(b"Finnish;English\ntalo;house\nkoira;dog\n"))
            .load()
            .await
            .into_vocabulary();
        let comma = source(StaticTransport::ok(b"finnish,english\ntalo,house\nkoira,dog\n"))
            .load()
            .await
            .into_vocabulary();
        assert_eq!(semicolon, comma);
        assert_eq!(semicolon.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_source_term_keeps_last_row() {
        let body = b"finnish;english\n\"talo\";\"house\"\nkoira;dog\n\"talo\";\"home\"\n";
        let vocab = source(StaticTransport::ok(body)).try_load().await.unwrap();
        assert_eq!(vocab.translation("talo"), Some("home"));
        assert_eq!(vocab.len(), 2);
    }

    #[tokio::test]
    async fn fetch_uses_direct_download_locator() {
        let transport = StaticTransport::ok(b"fi,en\nyksi,one\n");
        source(Arc::clone(&transport)).try_load().await.unwrap();
        let requested = transport.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec!["https://www.dropbox.com/s/x/words.csv?dl=1".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_empty_vocabulary() {
        let load = source(StaticTransport::status(404)).load().await;
        assert!(!load.is_available());
        assert!(matches!(
            load.failure(),
            Some(IngestError::Transport {
                source: TransportError::HttpStatus(_),
                ..
            })
        ));
        assert!(load.into_vocabulary().is_empty());
    }

    #[tokio::test]
    async fn schema_failure_is_reported() {
        let load = source(StaticTransport::ok(b"word,meaning\ntalo,house\n"))
            .load()
            .await;
        let message = load.failure().unwrap().to_string();
        assert!(message.contains("word"));
        assert!(message.contains("meaning"));
    }

    #[test]
    fn cp1252_bytes_ingest_with_umlauts() {
        let config = SourceConfig::new("words.csv");
        let vocab = ingest_bytes(b"suomi;englanti\np\xE4iv\xE4;day\n", &config).unwrap();
        assert_eq!(vocab.translation("päivä"), Some("day"));
    }

    #[test]
    fn restricted_ladder_can_fail_to_decode() {
        let config = SourceConfig::new("words.csv")
            .with_encodings(vec![crate::vocabulary::TextEncoding::Utf8]);
        let err = ingest_bytes(b"fi,en\np\xE4iv\xE4,day\n", &config).unwrap_err();
        assert!(matches!(err, IngestError::Encoding { .. }));
    }

    #[test]
    fn header_only_resource_is_loaded_but_unavailable() {
        let config = SourceConfig::new("words.csv");
        let load = VocabularyLoad::Loaded(ingest_bytes(b"finnish,english\n", &config).unwrap());
        assert!(!load.is_available());
        assert!(load.failure().is_none());
    }
}
