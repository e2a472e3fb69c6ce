//! Single dispatch on a free function.
//!
//! A [`Dispatcher`] plays the role of a generic function: it owns a default
//! handler plus any number of registered overloads, and [`Dispatcher::call`]
//! runs the one matching the runtime type of its first argument. Extra
//! arguments of type `A` are passed through unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! let describe = Dispatcher::<(), String>::new(|_, _| Ok("unknown".into()));
//! describe.register_typed(|n: &i64, _| Ok(format!("int:{n}")))?;
//!
//! assert_eq!(describe.call(&5_i64, ())?, "int:5");
//! assert_eq!(describe.call(&"x", ())?, "unknown");
//! ```

use crate::{
    cache::{CachePolicy, CacheStats},
    engine::{Engine, EngineParts, Target},
    registry::{RegistrationInfo, RegistrationMeta},
};
use monodispatch_core::{
    DispatchError, Dispatchable, Handler, HandlerResult, RegistrationError, TypeHierarchy,
    TypeKey, TypeTag,
};
use std::{any::Any, sync::Arc};

/// The handler trait object stored by a [`Dispatcher`].
pub type DynHandler<A, R> = dyn Handler<A, R>;

/// A type-dispatched function taking extra arguments `A` and returning `R`.
pub struct Dispatcher<A = (), R = ()> {
    engine: Engine<DynHandler<A, R>>,
}

impl<A: 'static, R: 'static> Dispatcher<A, R> {
    /// Create a dispatcher around its default handler, with an empty
    /// hierarchy and caching enabled.
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(&dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        Self::builder(default).build()
    }

    /// Start configuring a dispatcher around its default handler.
    pub fn builder<F>(default: F) -> DispatcherBuilder<A, R>
    where
        F: Fn(&dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        DispatcherBuilder::from_handler(default)
    }

    /// Register a closure under `key`.
    pub fn register<F>(&self, key: impl Into<TypeKey>, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register_handler(key, handler)
    }

    /// Register any [`Handler`] under `key`.
    pub fn register_handler<H>(
        &self,
        key: impl Into<TypeKey>,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        H: Handler<A, R>,
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
        H: Handler<A, R>,
    {
        self.engine.register(key.into(), Arc::new(handler), meta)
    }

    /// Register a handler written against the concrete type `T`.
    pub fn register_typed<T, F>(&self, handler: F) -> Result<(), RegistrationError>
    where
        T: Any,
        F: Fn(&T, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register(TypeKey::exact::<T>(), typed(handler))
    }

    /// Dispatch on `value` and run the selected handler.
    pub fn call(&self, value: &dyn Dispatchable, args: A) -> Result<R, DispatchError> {
        self.try_call(Some(value), args)
    }

    /// Dispatch on an optional value.
    ///
    /// Fails with [`DispatchError::MissingArgument`] when `value` is `None`;
    /// the default handler is not a fallback for a missing argument. Boxed
    /// and shared `dyn Dispatchable` values are unwrapped first, see
    /// [`concrete`](monodispatch_core::Dispatchable#method.concrete).
    pub fn try_call(&self, value: Option<&dyn Dispatchable>, args: A) -> Result<R, DispatchError> {
        let value = value.ok_or(DispatchError::MissingArgument)?.concrete();
        let target = self.engine.resolve(value.type_tag())?;
        target.handler().call(value, args).map_err(DispatchError::Handler)
    }

    /// The handler that would run for values of type `T`.
    pub fn resolve_type<T: ?Sized + 'static>(&self) -> Result<Target<DynHandler<A, R>>, DispatchError> {
        self.resolve_tag(TypeTag::of::<T>())
    }

    /// The handler that would run for values of type `tag`.
    pub fn resolve_tag(&self, tag: TypeTag) -> Result<Target<DynHandler<A, R>>, DispatchError> {
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
    pub fn engine(&self) -> &Engine<DynHandler<A, R>> {
        &self.engine
    }
}

impl<A: 'static, R: 'static> std::fmt::Debug for Dispatcher<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registrations", &self.registrations())
            .field("cache", &self.cache_stats())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Dispatcher`].
///
/// # Example
///
/// ```ignore
/// let serialize = Dispatcher::<(), Value>::builder(|v, _| Ok(Value::String(format!("{v:?}"))))
///     .hierarchy(hierarchy)
///     .register_typed(|s: &String, _| Ok(Value::String(s.clone())))?
///     .build();
/// ```
pub struct DispatcherBuilder<A, R> {
    parts: EngineParts<DynHandler<A, R>>,
}

impl<A: 'static, R: 'static> DispatcherBuilder<A, R> {
    /// Start from any [`Handler`] as the default.
    pub fn from_handler<H: Handler<A, R>>(default: H) -> Self {
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
        F: Fn(&dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static,
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
        H: Handler<A, R>,
    {
        self.parts.insert(key.into(), Arc::new(handler), meta)?;
        Ok(self)
    }

    /// Register a handler written against the concrete type `T`.
    pub fn register_typed<T, F>(self, handler: F) -> Result<Self, RegistrationError>
    where
        T: Any,
        F: Fn(&T, A) -> HandlerResult<R> + Send + Sync + 'static,
    {
        self.register(TypeKey::exact::<T>(), typed(handler))
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher<A, R> {
        Dispatcher {
            engine: self.parts.build(),
        }
    }
}

/// Wrap a handler over `&T` into one over `&dyn Dispatchable`.
fn typed<T, A, R, F>(handler: F) -> impl Fn(&dyn Dispatchable, A) -> HandlerResult<R> + Send + Sync + 'static
where
    T: Any,
    F: Fn(&T, A) -> HandlerResult<R> + Send + Sync + 'static,
{
    move |value: &dyn Dispatchable, args: A| match value.downcast_ref::<T>() {
        Some(value) => handler(value, args),
        None => Err(mismatch::<T>(value).into()),
    }
}

pub(crate) fn mismatch<T: Any>(value: &dyn Dispatchable) -> String {
    format!(
        "handler for `{}` received a `{}`",
        std::any::type_name::<T>(),
        value.type_tag()
    )
}
