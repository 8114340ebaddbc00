use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};
use vocab_core::{AnswerEvaluator, Clock, QuizSession, SessionError, SessionId, Vocabulary};

use super::view::DrillSnapshot;
use crate::error::DrillError;

/// Serves drill sessions over one shared, read-only vocabulary.
///
/// Sessions are addressed by `SessionId`. Each session has its own lock, so events
/// for one session run one at a time while different sessions never block each other.
pub struct DrillService {
    vocabulary: RwLock<Arc<Vocabulary>>,
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<QuizSession>>>>,
    clock: Clock,
    evaluator: AnswerEvaluator,
}

impl DrillService {
    #[must_use]
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary: RwLock::new(vocabulary),
            sessions: Mutex::new(HashMap::new()),
            clock: Clock::default(),
            evaluator: AnswerEvaluator::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: AnswerEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Current vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Poisoned` if a writer panicked.
    pub fn vocabulary(&self) -> Result<Arc<Vocabulary>, DrillError> {
        let guard = self.vocabulary.read().map_err(|_| DrillError::Poisoned)?;
        Ok(Arc::clone(&guard))
    }

    /// Swap in a freshly loaded vocabulary. Sessions pick it up on their next start.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Poisoned` if the lock is poisoned.
    pub fn replace_vocabulary(&self, vocabulary: Arc<Vocabulary>) -> Result<(), DrillError> {
        let mut guard = self.vocabulary.write().map_err(|_| DrillError::Poisoned)?;
        *guard = vocabulary;
        Ok(())
    }

    /// Register a new, not yet started session.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Poisoned` if the registry lock is poisoned.
    pub fn open_session(&self) -> Result<SessionId, DrillError> {
        let id = SessionId::new();
        let session = QuizSession::new()
            .with_clock(self.clock)
            .with_evaluator(self.evaluator);
        let mut sessions = self.sessions.lock().map_err(|_| DrillError::Poisoned)?;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        debug!(session = %id, "drill session opened");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `DrillError::UnknownSession` if `id` is not registered.
    pub fn close_session(&self, id: SessionId) -> Result<(), DrillError> {
        let mut sessions = self.sessions.lock().map_err(|_| DrillError::Poisoned)?;
        sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(DrillError::UnknownSession)
    }

    /// Start the drill if no term sequence is loaded, otherwise resume where it is.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoVocabulary` when there is nothing to drill.
    pub fn start(&self, id: SessionId) -> Result<DrillSnapshot, DrillError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().map_err(|_| DrillError::Poisoned)?;
        if session.can_start() {
            let vocabulary = self.vocabulary()?;
            match session.start(&vocabulary) {
                Ok(_) => debug!(session = %id, terms = vocabulary.len(), "drill started"),
                Err(SessionError::EmptyVocabulary) => return Err(DrillError::NoVocabulary),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(DrillSnapshot::from_session(id, &session))
    }

    /// # Errors
    ///
    /// Returns `DrillError::Session` for blank answers or when no answer is expected.
    pub fn submit_answer(&self, id: SessionId, answer: &str) -> Result<DrillSnapshot, DrillError> {
        self.with_session(id, |session| {
            session.submit_answer(answer).map(|_| ()).inspect_err(|err| {
                if matches!(err, SessionError::EmptyAnswer) {
                    warn!(session = %id, "empty answer rejected");
                }
            })
        })
    }

    /// # Errors
    ///
    /// Returns `DrillError::Session` unless feedback is showing.
    pub fn advance(&self, id: SessionId) -> Result<DrillSnapshot, DrillError> {
        self.with_session(id, |session| session.advance().map(|_| ()))
    }

    /// # Errors
    ///
    /// Returns `DrillError::UnknownSession` if `id` is not registered.
    pub fn restart(&self, id: SessionId) -> Result<DrillSnapshot, DrillError> {
        self.with_session(id, |session| {
            session.restart();
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns `DrillError::UnknownSession` if `id` is not registered.
    pub fn snapshot(&self, id: SessionId) -> Result<DrillSnapshot, DrillError> {
        self.with_session(id, |_| Ok(()))
    }

    fn session(&self, id: SessionId) -> Result<Arc<Mutex<QuizSession>>, DrillError> {
        let sessions = self.sessions.lock().map_err(|_| DrillError::Poisoned)?;
        sessions.get(&id).cloned().ok_or(DrillError::UnknownSession)
    }

    fn with_session(
        &self,
        id: SessionId,
        apply: impl FnOnce(&mut QuizSession) -> Result<(), SessionError>,
    ) -> Result<DrillSnapshot, DrillError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().map_err(|_| DrillError::Poisoned)?;
        apply(&mut session)?;
        Ok(DrillSnapshot::from_session(id, &session))
    }
}

impl fmt::Debug for DrillService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillService")
            .field("clock", &self.clock)
            .field("evaluator", &self.evaluator)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
