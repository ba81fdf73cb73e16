//! Lifecycle listeners: the code that actually saves and clears carts.
//!
//! Controllers only announce `cart.*.initialize` / `cart.*.completed`; whether a cart
//! is persisted depends entirely on what is registered here.

use std::sync::Arc;

use anyhow::anyhow;

use cartkit_core::SessionId;
use cartkit_events::{DispatchError, Listener, ListenerResult, SyncEventDispatcher};

use crate::events::{
    CART_CLEAR_COMPLETED, CART_CLEAR_INITIALIZE, CART_SAVE_COMPLETED, CART_SAVE_INITIALIZE,
    CartLifecycleEvent,
};
use crate::flash::{Flash, FlashStore};
use crate::operator::CartOperator;

pub const SAVED_MESSAGE: &str = "Your cart has been updated.";
pub const CLEARED_MESSAGE: &str = "Your cart has been cleared.";

/// Refreshes + saves on `cart.save.initialize`, clears on `cart.clear.initialize`.
#[derive(Debug, Clone)]
pub struct CartPersistenceListener<O> {
    operator: O,
}

impl<O> CartPersistenceListener<O> {
    pub fn new(operator: O) -> Self {
        Self { operator }
    }
}

impl<O> Listener<CartLifecycleEvent> for CartPersistenceListener<O>
where
    O: CartOperator,
{
    fn handle(&self, event_name: &str, event: &mut CartLifecycleEvent) -> ListenerResult {
        let ev = event
            .as_cart_event_mut()
            .ok_or_else(|| anyhow!("`{event_name}` expects a cart payload"))?;

        match event_name {
            CART_SAVE_INITIALIZE => {
                self.operator.refresh(ev.cart_mut());
                self.operator.save(ev.cart_mut())?;
            }
            CART_CLEAR_INITIALIZE => {
                self.operator.clear(ev.cart())?;
            }
            _ => {}
        }

        Ok(())
    }
}

/// Queues a success flash for the session on the `*.completed` events.
#[derive(Debug, Clone)]
pub struct FlashListener<F> {
    flashes: F,
    session: SessionId,
}

impl<F> FlashListener<F> {
    pub fn new(flashes: F, session: SessionId) -> Self {
        Self { flashes, session }
    }
}

impl<F> Listener<CartLifecycleEvent> for FlashListener<F>
where
    F: FlashStore,
{
    fn handle(&self, event_name: &str, _event: &mut CartLifecycleEvent) -> ListenerResult {
        let message = match event_name {
            CART_SAVE_COMPLETED => SAVED_MESSAGE,
            CART_CLEAR_COMPLETED => CLEARED_MESSAGE,
            _ => return Ok(()),
        };

        self.flashes.push(self.session, Flash::success(message))?;
        Ok(())
    }
}

/// Wire the default cart listeners for one session.
pub fn register_cart_listeners<O, F>(
    dispatcher: &SyncEventDispatcher<CartLifecycleEvent>,
    operator: O,
    flashes: F,
    session: SessionId,
) -> Result<(), DispatchError>
where
    O: CartOperator + 'static,
    F: FlashStore + 'static,
{
    let persistence: Arc<dyn Listener<CartLifecycleEvent>> =
        Arc::new(CartPersistenceListener::new(operator));
    dispatcher.add_listener(CART_SAVE_INITIALIZE, 0, persistence.clone())?;
    dispatcher.add_listener(CART_CLEAR_INITIALIZE, 0, persistence)?;

    let flash: Arc<dyn Listener<CartLifecycleEvent>> =
        Arc::new(FlashListener::new(flashes, session));
    dispatcher.add_listener(CART_SAVE_COMPLETED, 0, flash.clone())?;
    dispatcher.add_listener(CART_CLEAR_COMPLETED, 0, flash)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use cartkit_core::{CartId, Entity};
    use cartkit_events::EventDispatcher;

    use crate::events::{CartEvent, FlashEvent};
    use crate::flash::InMemoryFlashStore;
    use crate::model::{Cart, NewCartItem};
    use crate::operator::StoreCartOperator;
    use crate::store::{CartStore, InMemoryCartStore};

    struct Fixture {
        store: Arc<InMemoryCartStore>,
        flashes: Arc<InMemoryFlashStore>,
        session: SessionId,
        operator: StoreCartOperator<Arc<InMemoryCartStore>>,
        dispatcher: SyncEventDispatcher<CartLifecycleEvent>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryCartStore::new());
        let flashes = Arc::new(InMemoryFlashStore::new());
        let session = SessionId::new();
        let operator = StoreCartOperator::new(store.clone(), session, Duration::hours(1));
        let dispatcher = SyncEventDispatcher::new();
        register_cart_listeners(&dispatcher, operator.clone(), flashes.clone(), session).unwrap();
        Fixture {
            store,
            flashes,
            session,
            operator,
            dispatcher,
        }
    }

    fn cart_with_mug(op: &StoreCartOperator<Arc<InMemoryCartStore>>) -> Cart {
        let mut cart = Cart::new(CartId::new(), Utc::now());
        op.add_item(
            &mut cart,
            NewCartItem {
                sku: "mug".into(),
                name: "Mug".into(),
                quantity: 2,
                unit_price: 450,
            },
        )
        .unwrap();
        cart
    }

    #[test]
    fn save_initialize_refreshes_and_persists_the_cart() {
        let f = fixture();
        let cart = cart_with_mug(&f.operator);
        assert_eq!(cart.total(), 0);

        let mut event = CartLifecycleEvent::from(CartEvent::new(cart).with_fresh(true));
        f.dispatcher.dispatch(CART_SAVE_INITIALIZE, &mut event).unwrap();

        let saved = event.into_cart_event().unwrap().into_cart();
        assert_eq!(saved.total(), 900);
        assert_eq!(f.store.get(&f.session).unwrap(), Some(saved));
    }

    #[test]
    fn clear_initialize_removes_the_cart() {
        let f = fixture();
        let mut cart = cart_with_mug(&f.operator);
        f.operator.save(&mut cart).unwrap();

        let mut event = CartLifecycleEvent::from(CartEvent::new(cart));
        f.dispatcher.dispatch(CART_CLEAR_INITIALIZE, &mut event).unwrap();

        assert!(f.store.get(&f.session).unwrap().is_none());
    }

    #[test]
    fn completed_events_queue_flashes() {
        let f = fixture();

        f.dispatcher
            .dispatch(CART_SAVE_COMPLETED, &mut CartLifecycleEvent::from(FlashEvent::new()))
            .unwrap();
        f.dispatcher
            .dispatch(CART_CLEAR_COMPLETED, &mut CartLifecycleEvent::from(FlashEvent::new()))
            .unwrap();

        let messages: Vec<String> = f
            .flashes
            .drain(&f.session)
            .unwrap()
            .into_iter()
            .map(|fl| fl.message)
            .collect();
        assert_eq!(messages, vec![SAVED_MESSAGE, CLEARED_MESSAGE]);
    }

    #[test]
    fn persistence_listener_rejects_flash_payload() {
        let f = fixture();

        let err = f
            .dispatcher
            .dispatch(CART_SAVE_INITIALIZE, &mut CartLifecycleEvent::from(FlashEvent::new()))
            .unwrap_err();

        assert!(matches!(err, DispatchError::Listener { .. }));
        assert!(f.store.is_empty());
    }

    #[test]
    fn persisted_cart_keeps_its_identity() {
        let f = fixture();
        let cart = cart_with_mug(&f.operator);
        let id = *cart.id();

        let mut event = CartLifecycleEvent::from(CartEvent::new(cart).with_fresh(true));
        f.dispatcher.dispatch(CART_SAVE_INITIALIZE, &mut event).unwrap();

        let stored = f.store.get(&f.session).unwrap().unwrap();
        assert_eq!(*stored.id(), id);
    }
}
