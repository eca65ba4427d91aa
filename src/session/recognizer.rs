use super::arbiter::SessionArbiter;
use super::session::Session;
use crate::engine::{NativeHandlers, SpeechEngine};
use std::sync::Arc;
use tracing::info;

/// Entry point for speech recognition on one engine
///
/// Owns the session arbiter for the engine and installs the native
/// notification handlers once, at construction. Sessions created here share
/// the arbiter, so at most one of them recognizes at a time.
pub struct Recognizer {
    engine: Arc<dyn SpeechEngine>,
    arbiter: Arc<SessionArbiter>,
}

impl Recognizer {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let arbiter = Arc::new(SessionArbiter::new());

        let router = Arc::clone(&arbiter);
        engine.install_handlers(NativeHandlers::routing_to(move |event| {
            router.route_event(event)
        }));

        info!("Recognizer ready on {} engine", engine.name());

        Self { engine, arbiter }
    }

    /// Create an idle session
    pub fn create_session(&self) -> Session {
        Session::new(Arc::clone(&self.arbiter), Arc::clone(&self.engine))
    }

    /// Whether speech recognition is available on this system
    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    /// Whether recognition is in progress, on any session
    pub fn is_recognizing(&self) -> bool {
        self.engine.is_recognizing()
    }

    pub fn arbiter(&self) -> &Arc<SessionArbiter> {
        &self.arbiter
    }

    pub fn engine(&self) -> &Arc<dyn SpeechEngine> {
        &self.engine
    }
}
