pub mod backend;
pub mod simulated;

pub use backend::{Handler, NativeHandlers, SpeechEngine};
pub use simulated::{EngineCall, SimulatedEngine};
