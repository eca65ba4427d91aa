use super::events::{EventKind, VoiceEvent};
use std::collections::HashMap;
use std::sync::Arc;

/// Event listener callback
///
/// Listeners are compared by `Arc` identity, so keep a clone of the `Arc`
/// to remove it later.
pub type Listener = Arc<dyn Fn(&VoiceEvent) + Send + Sync>;

/// Per-session publish/subscribe registry
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; the same listener may be registered more than once
    pub fn add(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Remove the first registration of `listener` under `kind`
    ///
    /// Returns false if it was not registered.
    pub fn remove(&mut self, kind: EventKind, listener: &Listener) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };

        let Some(index) = list.iter().position(|l| Arc::ptr_eq(l, listener)) else {
            return false;
        };

        list.remove(index);
        if list.is_empty() {
            self.listeners.remove(&kind);
        }
        true
    }

    /// Remove every listener, handing them back to the caller
    pub fn take_all(&mut self) -> EventEmitter {
        std::mem::take(self)
    }

    /// Snapshot of the listeners for `kind`, in registration order
    pub fn listeners(&self, kind: EventKind) -> Vec<Listener> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}
