use super::arbiter::{DispatchFn, SessionArbiter, SessionId};
use super::emitter::{EventEmitter, Listener};
use super::error::{SessionError, SessionResult};
use super::events::{EventKind, VoiceEvent};
use crate::engine::SpeechEngine;
use futures::channel::mpsc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{error, info, warn};

/// Receiving end of `Session::event_stream`
pub type EventStream = mpsc::UnboundedReceiver<VoiceEvent>;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never started, or ownership was released
    Idle,
    /// Owns the recognizer
    Active,
    /// Destroyed; every call fails from now on
    Destroyed,
}

/// A speech recognition session
///
/// Only one session per recognizer may be recognizing at a time. Native
/// events are delivered to the listeners of the session that started
/// recognition, until a `results` or `error` event ends it.
pub struct Session {
    shared: Arc<SessionShared>,
}

struct SessionShared {
    id: SessionId,
    arbiter: Arc<SessionArbiter>,
    engine: Arc<dyn SpeechEngine>,
    destroyed: AtomicBool,
    emitter: Mutex<EventEmitter>,
}

impl Session {
    pub(crate) fn new(arbiter: Arc<SessionArbiter>, engine: Arc<dyn SpeechEngine>) -> Self {
        let id = SessionId::new();
        info!("Created session {} on {}", id, engine.name());

        Self {
            shared: Arc::new(SessionShared {
                id,
                arbiter,
                engine,
                destroyed: AtomicBool::new(false),
                emitter: Mutex::new(EventEmitter::new()),
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.shared.id
    }

    pub fn state(&self) -> SessionState {
        if self.is_destroyed() {
            SessionState::Destroyed
        } else if self.shared.arbiter.is_owner(self.shared.id) {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.load(Ordering::SeqCst)
    }

    /// Register `listener` for `kind`
    ///
    /// The same listener may be added several times and then fires once per
    /// registration.
    pub fn add_event_listener(&self, kind: EventKind, listener: Listener) -> SessionResult<()> {
        self.ensure_alive()?;
        self.shared.emitter().add(kind, listener);
        Ok(())
    }

    /// Remove one registration of `listener` from `kind`
    ///
    /// Removing a listener that is not registered does nothing.
    pub fn remove_event_listener(&self, kind: EventKind, listener: &Listener) -> SessionResult<()> {
        self.ensure_alive()?;
        self.shared.emitter().remove(kind, listener);
        Ok(())
    }

    /// Stream of every event delivered to this session
    ///
    /// Ends only when the session is destroyed or dropped. A `results` or
    /// `error` event does not end it, so consumers stop reading on
    /// `EventKind::is_terminal` themselves.
    pub fn event_stream(&self) -> SessionResult<EventStream> {
        self.ensure_alive()?;

        let (tx, rx) = mpsc::unbounded();
        let forward: Listener = Arc::new(move |event: &VoiceEvent| {
            // Receiver may be gone already
            let _ = tx.unbounded_send(event.clone());
        });

        let mut emitter = self.shared.emitter();
        for kind in EventKind::ALL {
            emitter.add(kind, Arc::clone(&forward));
        }

        Ok(rx)
    }

    /// Start recognizing
    ///
    /// Restarting on the session that already owns the recognizer is allowed.
    pub fn start(&self, locale: Option<&str>) -> SessionResult<()> {
        self.ensure_alive()?;

        let shared = &self.shared;
        if !shared.arbiter.try_claim(shared.id, shared.dispatcher()) {
            return Err(self.conflict("start"));
        }

        info!("Session {} starting recognition (locale: {:?})", shared.id, locale);
        if let Err(e) = shared.engine.start(locale) {
            error!("Failed to start {}: {:#}", shared.engine.name(), e);
        }

        Ok(())
    }

    /// Stop recognizing; a `results` or `error` event should follow
    ///
    /// Ownership is kept until that event arrives. Stopping when nothing is
    /// recognizing is allowed.
    pub fn stop(&self) -> SessionResult<()> {
        self.ensure_alive()?;
        self.ensure_owner_or_free("stop")?;

        info!("Session {} stopping recognition", self.shared.id);
        if let Err(e) = self.shared.engine.stop() {
            error!("Failed to stop {}: {:#}", self.shared.engine.name(), e);
        }

        Ok(())
    }

    /// Cancel recognizing; no `results` or `error` event will follow
    ///
    /// Ownership is released immediately. Cancelling when nothing is
    /// recognizing is allowed.
    pub fn cancel(&self) -> SessionResult<()> {
        self.ensure_alive()?;
        self.ensure_owner_or_free("cancel")?;

        info!("Session {} cancelling recognition", self.shared.id);
        if let Err(e) = self.shared.engine.cancel() {
            error!("Failed to cancel {}: {:#}", self.shared.engine.name(), e);
        }
        // Another session may have started while the engine call ran
        self.shared.arbiter.release_if_owner(self.shared.id);

        Ok(())
    }

    /// Destroy the session: drop its listeners and cancel its recognition
    ///
    /// Fails if the session was already destroyed.
    pub fn destroy(&self) -> SessionResult<()> {
        if self.shared.destroyed.swap(true, Ordering::SeqCst) {
            warn!("Session {} destroyed twice", self.shared.id);
            return Err(SessionError::Destroyed);
        }

        self.shared.teardown();
        Ok(())
    }

    fn ensure_alive(&self) -> SessionResult<()> {
        if self.is_destroyed() {
            warn!("Session {} used after destroy", self.shared.id);
            return Err(SessionError::Destroyed);
        }
        Ok(())
    }

    fn ensure_owner_or_free(&self, action: &str) -> SessionResult<()> {
        if self.shared.arbiter.is_owner_or_free(self.shared.id) {
            return Ok(());
        }
        Err(self.conflict(action))
    }

    fn conflict(&self, action: &str) -> SessionError {
        warn!(
            "Session {} cannot {}: {:?} is recognizing",
            self.shared.id,
            action,
            self.shared.arbiter.current_owner()
        );
        SessionError::AnotherInstanceRecognizing
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.shared.destroyed.swap(true, Ordering::SeqCst) {
            self.shared.teardown();
        }
    }
}

impl SessionShared {
    fn emitter(&self) -> MutexGuard<'_, EventEmitter> {
        self.emitter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatcher(self: &Arc<Self>) -> DispatchFn {
        let weak: Weak<SessionShared> = Arc::downgrade(self);
        Arc::new(move |event: VoiceEvent| {
            if let Some(shared) = weak.upgrade() {
                shared.on_voice_event(event);
            }
        })
    }

    fn on_voice_event(&self, event: VoiceEvent) {
        let kind = event.kind();

        // Listeners run unlocked so they may call back into the session
        let listeners = self.emitter().listeners(kind);
        for listener in listeners {
            listener(&event);
        }

        if kind.is_terminal() {
            info!("Session {} finished recognition with {} event", self.id, kind);
            // A listener may have handed the recognizer to another session
            self.arbiter.release_if_owner(self.id);
        }
    }

    fn teardown(&self) {
        info!("Destroying session {}", self.id);

        // Listeners may own the session; drop them after unlocking
        let removed = self.emitter().take_all();
        drop(removed);

        if self.arbiter.release_if_owner(self.id) {
            if let Err(e) = self.engine.cancel() {
                error!("Failed to cancel {}: {:#}", self.engine.name(), e);
            }
        }
    }
}
