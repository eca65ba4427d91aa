//! Speech recognition sessions
//!
//! This module provides:
//! - `Recognizer`: wires a native engine to a session arbiter
//! - `SessionArbiter`: tracks which session owns the shared recognizer
//! - `Session`: start/stop/cancel control and per-session event listeners
//! - Typed recognition events and errors

mod arbiter;
mod emitter;
mod error;
mod events;
mod recognizer;
mod session;

pub use arbiter::{DispatchFn, SessionArbiter, SessionId};
pub use emitter::{EventEmitter, Listener};
pub use error::{SessionError, SessionResult};
pub use events::{ErrorData, EventKind, UnknownEventKind, VoiceEvent};
pub use recognizer::Recognizer;
pub use session::{EventStream, Session, SessionState};
