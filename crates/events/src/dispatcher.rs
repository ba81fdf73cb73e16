//! Event dispatch abstraction (mechanics only).
//!
//! This module provides the **named event dispatch pattern**: a caller announces that
//! something is about to happen (or has happened) under a stable string name, and every
//! listener registered for that name runs before `dispatch` returns.
//!
//! ## Design Philosophy
//!
//! - **Synchronous**: dispatch is a blocking fan-out inside the caller's stack frame
//! - **Ordered**: listeners run by priority, then registration order
//! - **Fail-fast**: the first listener error stops the fan-out and is returned
//! - **No retries, no timeouts**: recovery belongs to whoever called `dispatch`
//!
//! Callers that dispatch an "initialize" event followed by a "completed" event can
//! therefore rely on every initialize listener having finished (successfully) before
//! any completed listener starts.

use std::sync::Arc;

use thiserror::Error;

/// Result type returned by listeners.
pub type ListenerResult = anyhow::Result<()>;

/// Reacts to a named event.
///
/// Listeners receive the payload by `&mut` so they can enrich it (e.g. refresh a cart's
/// totals) for the caller to read back after dispatch.
pub trait Listener<E>: Send + Sync {
    fn handle(&self, event_name: &str, event: &mut E) -> ListenerResult;
}

impl<E, F> Listener<E> for F
where
    F: Fn(&str, &mut E) -> ListenerResult + Send + Sync,
{
    fn handle(&self, event_name: &str, event: &mut E) -> ListenerResult {
        self(event_name, event)
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// A listener failed; later listeners for the same event did not run.
    #[error("listener for `{event}` failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// The listener registry lock was poisoned.
    #[error("listener registry poisoned")]
    Poisoned,
}

/// Publishes named events to registered listeners.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`, so one dispatcher can be shared by concurrent
/// requests. Each `dispatch` call is still a single synchronous fan-out.
pub trait EventDispatcher<E>: Send + Sync {
    fn dispatch(&self, event_name: &str, event: &mut E) -> Result<(), DispatchError>;
}

impl<E, D> EventDispatcher<E> for Arc<D>
where
    D: EventDispatcher<E> + ?Sized,
{
    fn dispatch(&self, event_name: &str, event: &mut E) -> Result<(), DispatchError> {
        (**self).dispatch(event_name, event)
    }
}
