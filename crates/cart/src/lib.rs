//! Shopping cart domain module.
//!
//! The cart itself, where it is stored, how the "current" cart is resolved for a
//! session, the summary form, and the lifecycle events + listeners that actually
//! persist or clear carts. Controllers only ever signal intent through events;
//! the listeners in [`listeners`] do the work.

pub mod events;
pub mod flash;
pub mod form;
pub mod listeners;
pub mod model;
pub mod operator;
pub mod provider;
pub mod store;

pub use events::{
    CART_CLEAR_COMPLETED, CART_CLEAR_INITIALIZE, CART_SAVE_COMPLETED, CART_SAVE_INITIALIZE,
    CartEvent, CartLifecycleEvent, FlashEvent,
};
pub use flash::{Flash, FlashKind, FlashStore, InMemoryFlashStore};
pub use form::{
    CART_FORM, CartForm, CartFormBinder, FieldView, FormBinder, FormSubmission, FormView,
    MAX_QUANTITY, quantity_field_name,
};
pub use listeners::{CartPersistenceListener, FlashListener, register_cart_listeners};
pub use model::{Cart, CartItem, NewCartItem};
pub use operator::{CartOperator, StoreCartOperator};
pub use provider::{CartProvider, SessionCartProvider};
pub use store::{CartStore, InMemoryCartStore};
