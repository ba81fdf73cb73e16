//! Synchronous lifecycle events: payload trait, listener contract, dispatcher.

pub mod dispatcher;
pub mod event;
pub mod sync_dispatcher;

pub use dispatcher::{DispatchError, EventDispatcher, Listener, ListenerResult};
pub use event::Event;
pub use sync_dispatcher::SyncEventDispatcher;
