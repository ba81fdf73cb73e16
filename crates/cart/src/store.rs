use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use cartkit_core::{DomainError, DomainResult, SessionId};

use crate::model::Cart;

/// Session-keyed cart storage.
pub trait CartStore: Send + Sync {
    fn get(&self, session: &SessionId) -> DomainResult<Option<Cart>>;
    fn put(&self, session: SessionId, cart: Cart) -> DomainResult<()>;
    fn remove(&self, session: &SessionId) -> DomainResult<Option<Cart>>;

    /// Drop every cart expired at `now`; returns how many went.
    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}

impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    fn get(&self, session: &SessionId) -> DomainResult<Option<Cart>> {
        (**self).get(session)
    }

    fn put(&self, session: SessionId, cart: Cart) -> DomainResult<()> {
        (**self).put(session, cart)
    }

    fn remove(&self, session: &SessionId) -> DomainResult<Option<Cart>> {
        (**self).remove(session)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        (**self).purge_expired(now)
    }
}

/// In-memory cart store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    inner: RwLock<HashMap<SessionId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DomainError {
    DomainError::storage("cart store lock poisoned")
}

impl CartStore for InMemoryCartStore {
    fn get(&self, session: &SessionId) -> DomainResult<Option<Cart>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(session).cloned())
    }

    fn put(&self, session: SessionId, cart: Cart) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(session, cart);
        Ok(())
    }

    fn remove(&self, session: &SessionId) -> DomainResult<Option<Cart>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(session))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let before = map.len();
        map.retain(|_, cart| !cart.is_expired(now));
        Ok(before - map.len())
    }
}
