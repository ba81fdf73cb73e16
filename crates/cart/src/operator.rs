//! Cart operator: the one place carts are mutated and persisted.

use chrono::{Duration, Utc};

use cartkit_core::{CartItemId, DomainError, DomainResult, Entity, SessionId};

use crate::form::MAX_QUANTITY;
use crate::model::{Cart, CartItem, NewCartItem};
use crate::store::CartStore;

/// Cart mutation + persistence contract.
///
/// Controllers do not call `save`/`clear` themselves; lifecycle listeners do, in
/// response to the `cart.*.initialize` events.
pub trait CartOperator: Send + Sync {
    /// Add a line, merging into an existing line with the same sku.
    fn add_item(&self, cart: &mut Cart, item: NewCartItem) -> DomainResult<CartItemId>;

    fn remove_item(&self, cart: &mut Cart, item_id: &CartItemId) -> DomainResult<CartItem>;

    /// Recompute totals.
    fn refresh(&self, cart: &mut Cart);

    /// Extend the cart's lifetime and persist it.
    fn save(&self, cart: &mut Cart) -> DomainResult<()>;

    /// Drop the cart from storage.
    fn clear(&self, cart: &Cart) -> DomainResult<()>;
}

impl<O> CartOperator for std::sync::Arc<O>
where
    O: CartOperator + ?Sized,
{
    fn add_item(&self, cart: &mut Cart, item: NewCartItem) -> DomainResult<CartItemId> {
        (**self).add_item(cart, item)
    }

    fn remove_item(&self, cart: &mut Cart, item_id: &CartItemId) -> DomainResult<CartItem> {
        (**self).remove_item(cart, item_id)
    }

    fn refresh(&self, cart: &mut Cart) {
        (**self).refresh(cart)
    }

    fn save(&self, cart: &mut Cart) -> DomainResult<()> {
        (**self).save(cart)
    }

    fn clear(&self, cart: &Cart) -> DomainResult<()> {
        (**self).clear(cart)
    }
}

/// Session-scoped operator writing through a [`CartStore`].
#[derive(Debug, Clone)]
pub struct StoreCartOperator<S> {
    store: S,
    session: SessionId,
    ttl: Duration,
}

impl<S> StoreCartOperator<S>
where
    S: CartStore,
{
    pub fn new(store: S, session: SessionId, ttl: Duration) -> Self {
        Self { store, session, ttl }
    }
}

fn quantity_too_large() -> DomainError {
    DomainError::validation(format!("quantity must be at most {MAX_QUANTITY}"))
}

impl<S> CartOperator for StoreCartOperator<S>
where
    S: CartStore,
{
    fn add_item(&self, cart: &mut Cart, item: NewCartItem) -> DomainResult<CartItemId> {
        if item.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(quantity_too_large());
        }
        if item.sku.trim().is_empty() {
            return Err(DomainError::validation("sku must not be empty"));
        }

        if let Some(existing) = cart.find_item_by_sku_mut(&item.sku) {
            let quantity = existing.quantity().saturating_add(item.quantity);
            if quantity > MAX_QUANTITY {
                return Err(quantity_too_large());
            }
            existing.set_quantity(quantity);
            return Ok(*existing.id());
        }

        let line = CartItem::new(
            CartItemId::new(),
            item.sku,
            item.name,
            item.quantity,
            item.unit_price,
        )?;
        let id = *line.id();
        cart.push_item(line);
        Ok(id)
    }

    fn remove_item(&self, cart: &mut Cart, item_id: &CartItemId) -> DomainResult<CartItem> {
        cart.remove_item(item_id).ok_or_else(DomainError::not_found)
    }

    fn refresh(&self, cart: &mut Cart) {
        cart.calculate_total();
    }

    fn save(&self, cart: &mut Cart) -> DomainResult<()> {
        cart.set_expires_at(Utc::now() + self.ttl);
        self.store.put(self.session, cart.clone())?;
        tracing::debug!(session = %self.session, cart = %cart.id(), total = cart.total(), "cart saved");
        Ok(())
    }

    fn clear(&self, cart: &Cart) -> DomainResult<()> {
        self.store.remove(&self.session)?;
        tracing::debug!(session = %self.session, cart = %cart.id(), "cart cleared");
        Ok(())
    }
}
