//! Values that can be dispatched on.

use crate::tag::TypeTag;
use std::{any::Any, rc::Rc, sync::Arc};

/// A value whose concrete runtime type can be inspected.
///
/// Implemented for every `'static` type, so callers simply coerce `&T` to
/// `&dyn Dispatchable`. The concrete type is recovered through the vtable,
/// which means `&dyn Dispatchable` always reports the original type, never
/// the trait object.
///
/// # Example
///
/// ```rust,ignore
/// let value: &dyn Dispatchable = &42_i64;
/// assert_eq!(value.type_tag(), TypeTag::of::<i64>());
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be dispatched on",
    label = "must be `'static`",
    note = "Only owned or `'static` data carries a runtime type identity."
)]
pub trait Dispatchable: Any + 'static {
    /// The concrete type of this value.
    fn type_tag(&self) -> TypeTag;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Dispatchable for T {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Dispatchable {
    /// Returns `true` if the concrete type is `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Look through `Box`, `Arc` and `Rc` wrappers around another
    /// `dyn Dispatchable`, down to the value they hold.
    ///
    /// `&Box<dyn Dispatchable>` coerces to `&dyn Dispatchable` as the box
    /// itself, so a heterogeneous `Vec<Box<dyn Dispatchable>>` would otherwise
    /// report `Box` for every element.
    pub fn concrete(&self) -> &dyn Dispatchable {
        let mut value = self;
        loop {
            value = if let Some(inner) = value.downcast_ref::<Box<dyn Dispatchable>>() {
                &**inner
            } else if let Some(inner) = value.downcast_ref::<Box<dyn Dispatchable + Send + Sync>>() {
                &**inner
            } else if let Some(inner) = value.downcast_ref::<Arc<dyn Dispatchable>>() {
                &**inner
            } else if let Some(inner) = value.downcast_ref::<Arc<dyn Dispatchable + Send + Sync>>() {
                &**inner
            } else if let Some(inner) = value.downcast_ref::<Rc<dyn Dispatchable>>() {
                &**inner
            } else {
                return value;
            };
        }
    }
}

impl std::fmt::Debug for dyn Dispatchable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispatchable").field(&self.type_tag()).finish()
    }
}
