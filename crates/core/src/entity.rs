//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Carts and cart items keep their identifier across quantity changes and
/// refreshes; two carts with equal contents are still different carts.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
