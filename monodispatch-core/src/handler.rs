//! # Handlers
//!
//! A handler is the callable a dispatcher selects. It receives the dispatched
//! value as `&dyn Dispatchable` plus whatever extra arguments the caller
//! supplied, unchanged.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `|value: &dyn Dispatchable, args| Ok(...)`
//! 2. **Struct implementation**: `impl Handler<Args, Out> for MyHandler`
//! 3. **Typed**: `Dispatcher::register_typed::<T>(|value: &T, args| ...)`,
//!    which downcasts before calling
//!
//! The bound-method flavour, [`MethodHandler`], additionally receives the
//! receiver. Dispatch never looks at the receiver's type.

use crate::{dispatchable::Dispatchable, error::BoxError};

/// The result type every handler produces.
pub type HandlerResult<Out> = Result<Out, BoxError>;

/// A function selected by type-based dispatch.
///
/// Failures are returned as [`BoxError`] and travel back to the caller
/// untouched.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle dispatched values with arguments `{Args}`",
    label = "missing `Handler<{Args}, {Out}>` implementation",
    note = "Closures must have the shape `Fn(&dyn Dispatchable, {Args}) -> Result<{Out}, BoxError>`."
)]
pub trait Handler<Args, Out>: Send + Sync + 'static {
    /// Run the handler.
    fn call(&self, value: &dyn Dispatchable, args: Args) -> HandlerResult<Out>;
}

// Blanket impl for closures
impl<F, Args, Out> Handler<Args, Out> for F
where
    F: Fn(&dyn Dispatchable, Args) -> HandlerResult<Out> + Send + Sync + 'static,
{
    fn call(&self, value: &dyn Dispatchable, args: Args) -> HandlerResult<Out> {
        (self)(value, args)
    }
}

/// A handler for bound-method dispatch.
///
/// The receiver is threaded through; the value after it decides which
/// handler runs.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle method calls on `{Recv}` with arguments `{Args}`",
    label = "missing `MethodHandler<{Recv}, {Args}, {Out}>` implementation",
    note = "Closures must have the shape `Fn(&{Recv}, &dyn Dispatchable, {Args}) -> Result<{Out}, BoxError>`."
)]
pub trait MethodHandler<Recv: ?Sized, Args, Out>: Send + Sync + 'static {
    /// Run the handler.
    fn call(&self, receiver: &Recv, value: &dyn Dispatchable, args: Args) -> HandlerResult<Out>;
}

impl<F, Recv, Args, Out> MethodHandler<Recv, Args, Out> for F
where
    Recv: ?Sized,
    F: Fn(&Recv, &dyn Dispatchable, Args) -> HandlerResult<Out> + Send + Sync + 'static,
{
    fn call(&self, receiver: &Recv, value: &dyn Dispatchable, args: Args) -> HandlerResult<Out> {
        (self)(receiver, value, args)
    }
}
