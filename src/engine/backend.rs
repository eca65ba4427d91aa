use crate::session::{ErrorData, VoiceEvent};
use anyhow::Result;
use std::sync::Arc;

/// Single-slot callback for one kind of native notification
pub type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// The seven notification channels of the native recognizer
///
/// The recognizer installs one fixed set of handlers per engine; each
/// handler routes into the session arbiter rather than to a session.
#[derive(Clone)]
pub struct NativeHandlers {
    pub on_speech_start: Handler<()>,
    pub on_speech_end: Handler<()>,
    pub on_speech_volume_changed: Handler<f32>,
    pub on_speech_partial_results: Handler<Vec<String>>,
    pub on_speech_results: Handler<Vec<String>>,
    pub on_speech_recognized: Handler<String>,
    pub on_speech_error: Handler<ErrorData>,
}

impl NativeHandlers {
    /// Build handlers that all feed typed events into `sink`
    pub fn routing_to<F>(sink: F) -> Self
    where
        F: Fn(VoiceEvent) + Send + Sync + 'static,
    {
        let sink = Arc::new(sink);

        let start = Arc::clone(&sink);
        let end = Arc::clone(&sink);
        let volume = Arc::clone(&sink);
        let partial = Arc::clone(&sink);
        let results = Arc::clone(&sink);
        let recognized = Arc::clone(&sink);
        let error = sink;

        Self {
            on_speech_start: Arc::new(move |()| start(VoiceEvent::Start)),
            on_speech_end: Arc::new(move |()| end(VoiceEvent::End)),
            on_speech_volume_changed: Arc::new(move |value| {
                volume(VoiceEvent::VolumeChanged { value })
            }),
            on_speech_partial_results: Arc::new(move |value| {
                partial(VoiceEvent::PartialResults { value })
            }),
            on_speech_results: Arc::new(move |value| results(VoiceEvent::Results { value })),
            on_speech_recognized: Arc::new(move |transcript| {
                recognized(VoiceEvent::Recognized { transcript })
            }),
            on_speech_error: Arc::new(move |data| error(VoiceEvent::Error(data))),
        }
    }

    /// Invoke the slot matching `event`
    pub fn deliver(&self, event: VoiceEvent) {
        match event {
            VoiceEvent::Start => (self.on_speech_start)(()),
            VoiceEvent::End => (self.on_speech_end)(()),
            VoiceEvent::VolumeChanged { value } => (self.on_speech_volume_changed)(value),
            VoiceEvent::PartialResults { value } => (self.on_speech_partial_results)(value),
            VoiceEvent::Results { value } => (self.on_speech_results)(value),
            VoiceEvent::Recognized { transcript } => (self.on_speech_recognized)(transcript),
            VoiceEvent::Error(data) => (self.on_speech_error)(data),
        }
    }
}

/// Native speech recognition capability
///
/// Control calls are requests: they return as soon as the platform accepted
/// them, and outcomes arrive later through the installed `NativeHandlers`.
/// Errors returned here mean the request itself could not be issued.
///
/// Implementations:
/// - `SimulatedEngine`: scripted notifications (testing, demos)
pub trait SpeechEngine: Send + Sync {
    /// Begin recognition, optionally for a specific locale (e.g. "en-US")
    fn start(&self, locale: Option<&str>) -> Result<()>;

    /// Stop listening; the engine should follow up with results or an error
    fn stop(&self) -> Result<()>;

    /// Abort recognition without results
    fn cancel(&self) -> Result<()>;

    /// Whether recognition is supported on this system
    fn is_available(&self) -> bool;

    /// Whether any recognition is in progress
    fn is_recognizing(&self) -> bool;

    /// Replace the notification handlers
    fn install_handlers(&self, handlers: NativeHandlers);

    /// Get engine name for logging
    fn name(&self) -> &str;
}
