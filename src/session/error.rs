/// Synchronous failures of session control calls
///
/// Native recognition failures are not reported here; they arrive as
/// `VoiceEvent::Error` through the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A different session currently owns the recognizer
    #[error("Another instance is recognizing right now.")]
    AnotherInstanceRecognizing,

    /// The session was destroyed
    #[error("Instance destroyed. You cannot use methods on it anymore. Create another one.")]
    Destroyed,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
