pub mod config;
pub mod engine;
pub mod session;

pub use config::Config;
pub use engine::{EngineCall, NativeHandlers, SimulatedEngine, SpeechEngine};
pub use session::{
    DispatchFn, ErrorData, EventKind, EventStream, Listener, Recognizer, Session,
    SessionArbiter, SessionError, SessionId, SessionResult, SessionState, VoiceEvent,
};
