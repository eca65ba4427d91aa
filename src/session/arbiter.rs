use super::events::VoiceEvent;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Identity of a session, used by the arbiter to track ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Routing target for native events delivered to the owning session
pub type DispatchFn = Arc<dyn Fn(VoiceEvent) + Send + Sync>;

struct Owner {
    id: SessionId,
    dispatch: DispatchFn,
}

/// Tracks which session owns the shared recognizer
///
/// There is exactly one live recognition at the OS level, so one arbiter is
/// shared by every session created from the same engine. The owner slot and
/// its dispatch target are set and cleared together.
#[derive(Default)]
pub struct SessionArbiter {
    owner: Mutex<Option<Owner>>,
}

impl SessionArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    // Native callbacks may arrive on another thread; a panicking listener
    // must not wedge the slot for everyone else.
    fn slot(&self) -> MutexGuard<'_, Option<Owner>> {
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `id` as owner, replacing any previous owner
    ///
    /// Callers check `is_owner_or_free` first.
    pub fn claim(&self, id: SessionId, dispatch: DispatchFn) {
        let mut slot = self.slot();
        if let Some(previous) = slot.as_ref() {
            if previous.id != id {
                debug!("Ownership moved from {} to {}", previous.id, id);
            }
        }
        *slot = Some(Owner { id, dispatch });
    }

    /// Install `id` as owner if nobody else owns the recognizer
    ///
    /// The check and the install happen under one lock. Re-claiming by the
    /// current owner replaces its dispatch target. Returns false, leaving the
    /// slot untouched, if another session is the owner.
    pub fn try_claim(&self, id: SessionId, dispatch: DispatchFn) -> bool {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|owner| owner.id != id) {
            return false;
        }
        *slot = Some(Owner { id, dispatch });
        true
    }

    pub fn release(&self) {
        if let Some(previous) = self.slot().take() {
            debug!("Released ownership held by {}", previous.id);
        }
    }

    /// Release only if `id` is the current owner
    ///
    /// Returns true if ownership was released.
    pub fn release_if_owner(&self, id: SessionId) -> bool {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|owner| owner.id == id) {
            *slot = None;
            debug!("Released ownership held by {}", id);
            return true;
        }
        false
    }

    pub fn current_owner(&self) -> Option<SessionId> {
        self.slot().as_ref().map(|owner| owner.id)
    }

    pub fn is_owner(&self, id: SessionId) -> bool {
        self.current_owner() == Some(id)
    }

    /// True if nobody owns the recognizer or `id` already does
    pub fn is_owner_or_free(&self, id: SessionId) -> bool {
        self.current_owner().map_or(true, |owner| owner == id)
    }

    /// Deliver a native event to the owner's dispatch target
    ///
    /// Dropped when there is no owner. The dispatch target runs without the
    /// slot locked so it may release ownership itself.
    pub fn route_event(&self, event: VoiceEvent) {
        let target = self
            .slot()
            .as_ref()
            .map(|owner| (owner.id, Arc::clone(&owner.dispatch)));

        match target {
            Some((id, dispatch)) => {
                debug!("Routing {} event to {}", event.kind(), id);
                dispatch(event);
            }
            None => {
                debug!("Dropping {} event, no session owns the recognizer", event.kind());
            }
        }
    }
}
