//! In-process synchronous dispatcher.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dispatcher::{DispatchError, EventDispatcher, Listener};
use crate::event::Event;

struct Registration<E> {
    priority: i32,
    listener: Arc<dyn Listener<E>>,
}

impl<E> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            listener: self.listener.clone(),
        }
    }
}

/// In-process dispatcher.
///
/// - No IO / no async
/// - Higher priority runs first; equal priorities keep registration order
/// - First failure wins (later listeners are skipped)
pub struct SyncEventDispatcher<E> {
    listeners: RwLock<HashMap<String, Vec<Registration<E>>>>,
}

impl<E> SyncEventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event_name`.
    pub fn add_listener(
        &self,
        event_name: impl Into<String>,
        priority: i32,
        listener: Arc<dyn Listener<E>>,
    ) -> Result<(), DispatchError> {
        let mut map = self.listeners.write().map_err(|_| DispatchError::Poisoned)?;
        let slot = map.entry(event_name.into()).or_default();

        // Insert after every registration with priority >= ours.
        let at = slot
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(slot.len());
        slot.insert(at, Registration { priority, listener });

        Ok(())
    }

    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listener_count(event_name) > 0
    }

    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners
            .read()
            .map(|map| map.get(event_name).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl<E> Default for SyncEventDispatcher<E> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> core::fmt::Debug for SyncEventDispatcher<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let counts: HashMap<String, usize> = self
            .listeners
            .read()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.len())).collect())
            .unwrap_or_default();

        f.debug_struct("SyncEventDispatcher")
            .field("listeners", &counts)
            .finish()
    }
}

impl<E> EventDispatcher<E> for SyncEventDispatcher<E>
where
    E: Event,
{
    fn dispatch(&self, event_name: &str, event: &mut E) -> Result<(), DispatchError> {
        // Snapshot so listeners never run under the registry lock.
        let registrations: Vec<Registration<E>> = {
            let map = self.listeners.read().map_err(|_| DispatchError::Poisoned)?;
            map.get(event_name).cloned().unwrap_or_default()
        };

        tracing::debug!(
            event = event_name,
            kind = event.kind(),
            listeners = registrations.len(),
            "dispatching event"
        );

        for registration in &registrations {
            registration
                .listener
                .handle(event_name, event)
                .map_err(|source| {
                    tracing::warn!(event = event_name, error = %source, "event listener failed");
                    DispatchError::Listener {
                        event: event_name.to_string(),
                        source,
                    }
                })?;
        }

        Ok(())
    }
}
