//! Single dispatch on a bound method.
//!
//! A [`MethodDispatcher`] is shared by every receiver of type `S`. The
//! receiver is handed to the handler but never inspected: dispatch is always
//! computed on the value that follows it.

use crate::{
    cache::{CachePolicy, CacheStats},
    dispatcher::mismatch,
    engine::{Engine, EngineParts, Target},
    registry::{RegistrationInfo, RegistrationMeta},
};
use monodispatch_core::{
    DispatchError, Dispatchable, HandlerResult, MethodHandler, RegistrationError, TypeHierarchy,
    TypeKey, TypeTag,
};
use std::{any::Any, sync::Arc};

/// The handler trait object stored by a [`MethodDispatcher`].
pub type DynMethodHandler<S, A, R> = dyn MethodHandler<S, A, R>;

/// A type-dispatched method on receivers of type `S`.
///
/// # Example
///
/// ```rust,ignore
/// struct Inventory { name: String }
///
/// let stock = MethodDispatcher::<Inventory, u32, String>::new(|inv, _, qty| {
///     Ok(format!("{}: {qty} of something", inv.name))
/// });
/// stock.register_typed(|inv: &Inventory, item: &&str, qty| {
///     Ok(format!("{}: {qty} x {item}", inv.name))
/// })?;
///
/// let inv = Inventory { name: "corner".into() };
/// assert_eq!(stock.call_bound(&inv, &"Milk", 2)?, "corner: 2 x Milk");
/// ```
pub struct MethodDispatcher<S: ?Sized, A = (), R = ()> {
    engine: Engine<DynMethodHandler<S, A, R>>,
}

impl<S: ?Sized + 'static, A: 'static, R: 'static> MethodDispatcher<S, A, R> {
    /// Create a method dispatcher around its default handler.
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(&S, &dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        Self::builder(default).build()
    }

    /// Start configuring a method dispatcher around its default handler.
    pub fn builder<F>(default: F) -> MethodDispatcherBuilder<S, A, R>
    where
        F: Fn(&S, &dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        MethodDispatcherBuilder::from_handler(default)
    }

    /// Register a closure under `key`.
    pub fn register<F>(&self, key: impl Into<TypeKey>, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&S, &dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register_handler(key, handler)
    }

    /// Register any [`MethodHandler`] under `key`.
    pub fn register_handler<H>(
        &self,
        key: impl Into<TypeKey>,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        H: MethodHandler<S, A, R>,
    {
        self.register_with_meta(key, handler, RegistrationMeta::new())
    }

    /// Register a handler with metadata.
    pub fn register_with_meta<H>(
        &self,
        key: impl Into<TypeKey>,
        handler: H,
        meta: RegistrationMeta,
    ) -> Result<(), RegistrationError>
    where
        H: MethodHandler<S, A, R>,
    {
        self.engine.register(key.into(), Arc::new(handler), meta)
    }

    /// Register a handler written against the concrete value type `T`.
    pub fn register_typed<T, F>(&self, handler: F) -> Result<(), RegistrationError>
    where
        T: Any,
        F: Fn(&S, &T, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register(TypeKey::exact::<T>(), typed_method(handler))
    }

    /// Dispatch on `value` and run the selected handler with `receiver`.
    pub fn call_bound(
        &self,
        receiver: &S,
        value: &dyn Dispatchable,
        args: A,
    ) -> Result<R, DispatchError> {
        self.try_call_bound(receiver, Some(value), args)
    }

    /// Dispatch on an optional value.
    ///
    /// A bare receiver is not enough: `None` fails with
    /// [`DispatchError::MissingArgument`].
    pub fn try_call_bound(
        &self,
        receiver: &S,
        value: Option<&dyn Dispatchable>,
        args: A,
    ) -> Result<R, DispatchError> {
        let value = value.ok_or(DispatchError::MissingArgument)?.concrete();
        let target = self.engine.resolve(value.type_tag())?;
        target
            .handler()
            .call(receiver, value, args)
            .map_err(DispatchError::Handler)
    }

    /// The handler that would run for values of type `T`.
    pub fn resolve_type<T: ?Sized + 'static>(
        &self,
    ) -> Result<Target<DynMethodHandler<S, A, R>>, DispatchError> {
        self.resolve_tag(TypeTag::of::<T>())
    }

    /// The handler that would run for values of type `tag`.
    pub fn resolve_tag(
        &self,
        tag: TypeTag,
    ) -> Result<Target<DynMethodHandler<S, A, R>>, DispatchError> {
        self.engine.resolve(tag)
    }

    /// Snapshot of all registrations, ordered by sequence.
    pub fn registrations(&self) -> Vec<RegistrationInfo> {
        self.engine.registrations()
    }

    /// The hierarchy this dispatcher resolves against.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        self.engine.hierarchy()
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    /// Flush the resolution cache.
    pub fn clear_cache(&self) {
        self.engine.clear_cache();
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Engine<DynMethodHandler<S, A, R>> {
        &self.engine
    }
}

impl<S: ?Sized + 'static, A: 'static, R: 'static> std::fmt::Debug for MethodDispatcher<S, A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDispatcher")
            .field("receiver", &std::any::type_name::<S>())
            .field("registrations", &self.registrations())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`MethodDispatcher`].
pub struct MethodDispatcherBuilder<S: ?Sized, A, R> {
    parts: EngineParts<DynMethodHandler<S, A, R>>,
}

impl<S: ?Sized + 'static, A: 'static, R: 'static> MethodDispatcherBuilder<S, A, R> {
    /// Start from any [`MethodHandler`] as the default.
    pub fn from_handler<H: MethodHandler<S, A, R>>(default: H) -> Self {
        Self {
            parts: EngineParts::new(Arc::new(default)),
        }
    }

    /// Resolve against `hierarchy` instead of an empty one.
    pub fn hierarchy(mut self, hierarchy: impl Into<Arc<TypeHierarchy>>) -> Self {
        self.parts.hierarchy = hierarchy.into();
        self
    }

    /// Set the cache policy.
    pub fn cache(mut self, policy: CachePolicy) -> Self {
        self.parts.policy = policy;
        self
    }

    /// Register a closure under `key`.
    pub fn register<F>(self, key: impl Into<TypeKey>, handler: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&S, &dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register_with_meta(key, handler, RegistrationMeta::new())
    }

    /// Register a handler with metadata.
    pub fn register_with_meta<H>(
        mut self,
        key: impl Into<TypeKey>,
        handler: H,
        meta: RegistrationMeta,
    ) -> Result<Self, RegistrationError>
    where
        H: MethodHandler<S, A, R>,
    {
        self.parts.insert(key.into(), Arc::new(handler), meta)?;
        Ok(self)
    }

    /// Register a handler written against the concrete value type `T`.
    pub fn register_typed<T, F>(self, handler: F) -> Result<Self, RegistrationError>
    where
        T: Any,
        F: Fn(&S, &T, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register(TypeKey::exact::<T>(), typed_method(handler))
    }

    /// Build the dispatcher.
    pub fn build(self) -> MethodDispatcher<S, A, R> {
        MethodDispatcher {
            engine: self.parts.build(),
        }
    }
}

fn typed_method<S, T, A, R, F>(
    handler: F,
) -> impl Fn(&S, &dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static
where
    S: ?Sized,
    T: Any,
    F: Fn(&S, &T, A) -> HandlerResult<R> + Send + Sync + 'static,
{
    move |receiver: &S, value: &dyn Dispatchable, args: A| match value.downcast_ref::<T>() {
        Some(value) => handler(receiver, value, args),
        None => Err(mismatch::<T>(value).into()),
    }
}
