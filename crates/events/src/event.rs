/// A payload handed to listeners during a dispatch.
///
/// Events are:
/// - **named at dispatch time** (one payload type can travel under many names)
/// - **mutable while in flight** (listeners receive `&mut`)
/// - **short-lived** (created right before dispatch, dropped after)
pub trait Event: core::fmt::Debug + Send + Sync + 'static {
    /// Stable payload kind (e.g. "cart", "flash"), used in logs.
    fn kind(&self) -> &'static str;
}
