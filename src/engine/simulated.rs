// In-process engine that records control calls and replays notifications

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::backend::{NativeHandlers, SpeechEngine};
use crate::session::VoiceEvent;

/// A control call received by the simulated engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Start { locale: Option<String> },
    Stop,
    Cancel,
}

/// Simulated speech engine
///
/// Stands in for a platform recognizer: records every control call and lets
/// the caller fire native notifications through whatever handlers are
/// installed.
pub struct SimulatedEngine {
    calls: Mutex<Vec<EngineCall>>,
    handlers: Mutex<Option<NativeHandlers>>,
    available: AtomicBool,
    recognizing: AtomicBool,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handlers: Mutex::new(None),
            available: AtomicBool::new(true),
            recognizing: AtomicBool::new(false),
        }
    }

    fn calls_mut(&self) -> MutexGuard<'_, Vec<EngineCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All control calls received so far, oldest first
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls_mut().clone()
    }

    pub fn start_calls(&self) -> Vec<Option<String>> {
        self.calls_mut()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Start { locale } => Some(locale.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.calls_mut().iter().filter(|c| **c == EngineCall::Stop).count()
    }

    pub fn cancel_count(&self) -> usize {
        self.calls_mut().iter().filter(|c| **c == EngineCall::Cancel).count()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_recognizing(&self, recognizing: bool) {
        self.recognizing.store(recognizing, Ordering::SeqCst);
    }

    /// Forget recorded calls and flags; installed handlers stay
    pub fn reset(&self) {
        self.calls_mut().clear();
        self.available.store(true, Ordering::SeqCst);
        self.recognizing.store(false, Ordering::SeqCst);
    }

    /// Fire a native notification
    ///
    /// Does nothing if no handlers are installed.
    pub fn trigger(&self, event: VoiceEvent) {
        // Clone out so handlers run without our lock held
        let handlers = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match handlers {
            Some(handlers) => handlers.deliver(event),
            None => debug!("No handlers installed, dropping {} notification", event.kind()),
        }
    }

    /// Fire a notification by raw name and JSON payload
    ///
    /// Unknown names are ignored, like notifications this crate has no slot
    /// for.
    pub fn trigger_raw(&self, name: &str, payload: serde_json::Value) -> Result<()> {
        let event = VoiceEvent::from_raw(name, payload)
            .with_context(|| format!("Invalid payload for {} notification", name))?;

        match event {
            Some(event) => self.trigger(event),
            None => debug!("Ignoring unknown notification: {}", name),
        }

        Ok(())
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for SimulatedEngine {
    fn start(&self, locale: Option<&str>) -> Result<()> {
        info!("Simulated recognition started (locale: {:?})", locale);
        self.calls_mut().push(EngineCall::Start {
            locale: locale.map(str::to_string),
        });
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        info!("Simulated recognition stopped");
        self.calls_mut().push(EngineCall::Stop);
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        info!("Simulated recognition cancelled");
        self.calls_mut().push(EngineCall::Cancel);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_recognizing(&self) -> bool {
        self.recognizing.load(Ordering::SeqCst)
    }

    fn install_handlers(&self, handlers: NativeHandlers) {
        *self.handlers.lock().unwrap_or_else(PoisonError::into_inner) = Some(handlers);
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
