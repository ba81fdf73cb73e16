use chrono::{Duration, Utc};

use cartkit_core::{CartId, DomainResult, Entity, SessionId};

use crate::model::Cart;
use crate::store::CartStore;

/// Resolves the caller's current cart.
///
/// Implementations must be idempotent within a request: repeated calls return the
/// same cart (same id, same contents) as long as nothing saved or cleared it.
pub trait CartProvider: Send + Sync {
    fn current_cart(&self) -> DomainResult<Cart>;
}

/// Session-scoped provider backed by a [`CartStore`].
///
/// A session without a cart (or with an expired one) gets a new empty cart, which
/// is stored immediately so the next call sees the same id. Minting a cart also
/// purges every expired cart in the store, so abandoned sessions do not pile up.
#[derive(Debug, Clone)]
pub struct SessionCartProvider<S> {
    store: S,
    session: SessionId,
    ttl: Duration,
}

impl<S> SessionCartProvider<S>
where
    S: CartStore,
{
    pub fn new(store: S, session: SessionId, ttl: Duration) -> Self {
        Self { store, session, ttl }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl<S> CartProvider for SessionCartProvider<S>
where
    S: CartStore,
{
    fn current_cart(&self) -> DomainResult<Cart> {
        let now = Utc::now();

        if let Some(cart) = self.store.get(&self.session)? {
            if !cart.is_expired(now) {
                return Ok(cart);
            }
            tracing::info!(session = %self.session, cart = %cart.id(), "discarding expired cart");
            self.store.remove(&self.session)?;
        }

        let purged = self.store.purge_expired(now)?;
        if purged > 0 {
            tracing::debug!(purged, "purged expired carts");
        }

        let cart = Cart::new(CartId::new(), now + self.ttl);
        tracing::debug!(session = %self.session, cart = %cart.id(), "created cart");
        self.store.put(self.session, cart.clone())?;
        Ok(cart)
    }
}
