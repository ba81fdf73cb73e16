//! Cart lifecycle event names and payloads.

use cartkit_events::Event;

use crate::model::Cart;

/// Fired before a submitted cart is persisted. Payload: [`CartEvent`] (fresh).
pub const CART_SAVE_INITIALIZE: &str = "cart.save.initialize";
/// Fired after `cart.save.initialize` listeners finished. Payload: [`FlashEvent`].
pub const CART_SAVE_COMPLETED: &str = "cart.save.completed";
/// Fired before the current cart is cleared. Payload: [`CartEvent`].
pub const CART_CLEAR_INITIALIZE: &str = "cart.clear.initialize";
/// Fired after `cart.clear.initialize` listeners finished. Payload: [`FlashEvent`].
pub const CART_CLEAR_COMPLETED: &str = "cart.clear.completed";

/// Carries the cart through a dispatch.
///
/// The event owns the cart while listeners run; take it back with
/// [`CartEvent::into_cart`] to see what they did to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
    cart: Cart,
    fresh: bool,
}

impl CartEvent {
    pub fn new(cart: Cart) -> Self {
        Self { cart, fresh: false }
    }

    /// Mark the cart as freshly submitted.
    pub fn with_fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn into_cart(self) -> Cart {
        self.cart
    }
}

/// Marker payload: "show the user a notification for this".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashEvent;

impl FlashEvent {
    pub fn new() -> Self {
        Self
    }
}

/// Everything that travels through the cart dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartLifecycleEvent {
    Cart(CartEvent),
    Flash(FlashEvent),
}

impl CartLifecycleEvent {
    pub fn as_cart_event(&self) -> Option<&CartEvent> {
        match self {
            CartLifecycleEvent::Cart(e) => Some(e),
            CartLifecycleEvent::Flash(_) => None,
        }
    }

    pub fn as_cart_event_mut(&mut self) -> Option<&mut CartEvent> {
        match self {
            CartLifecycleEvent::Cart(e) => Some(e),
            CartLifecycleEvent::Flash(_) => None,
        }
    }

    pub fn into_cart_event(self) -> Option<CartEvent> {
        match self {
            CartLifecycleEvent::Cart(e) => Some(e),
            CartLifecycleEvent::Flash(_) => None,
        }
    }
}

impl From<CartEvent> for CartLifecycleEvent {
    fn from(value: CartEvent) -> Self {
        CartLifecycleEvent::Cart(value)
    }
}

impl From<FlashEvent> for CartLifecycleEvent {
    fn from(value: FlashEvent) -> Self {
        CartLifecycleEvent::Flash(value)
    }
}

impl Event for CartLifecycleEvent {
    fn kind(&self) -> &'static str {
        match self {
            CartLifecycleEvent::Cart(_) => "cart",
            CartLifecycleEvent::Flash(_) => "flash",
        }
    }
}
