//! Error types for monodispatch.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`MonodispatchError`] - Top-level error type for all operations
//! - [`RegistrationError`] - Configuration-phase errors from `register`
//! - [`DispatchError`] - Call-time errors from `call`

use thiserror::Error;

/// A boxed error type for handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all monodispatch operations.
#[derive(Error, Debug)]
pub enum MonodispatchError {
    /// A registration was rejected.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// A call could not be dispatched, or its handler failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors raised while registering handlers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The key collides with an existing entry that cannot be replaced silently.
    #[error("`{key}` conflicts with existing registration `{existing}`")]
    DuplicateKey {
        /// The rejected key.
        key: String,
        /// The key of the entry already in place.
        existing: String,
    },

    /// A union member is already covered by a different entry.
    #[error("union `{key}` would override `{member}`, already handled by `{existing}`")]
    AmbiguousUnion {
        /// The rejected union key.
        key: String,
        /// The member that is already covered.
        member: String,
        /// The key of the entry covering it.
        existing: String,
    },

    /// The default handler can only be declared when the dispatcher is built.
    #[error("registry is frozen: {0}")]
    RegistryFrozen(String),

    /// The key cannot be registered at all.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Errors raised while dispatching a call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Several equally specific entries match and none dominates.
    #[error("ambiguous dispatch for `{type_name}` between {}", .candidates.join(", "))]
    Ambiguous {
        /// The concrete type that was dispatched on.
        type_name: &'static str,
        /// The competing keys, in ancestry order.
        candidates: Vec<String>,
    },

    /// No value to dispatch on was supplied.
    #[error("dispatch requires at least one positional argument")]
    MissingArgument,

    /// The selected handler failed.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    /// The handler's own error, if this is a handler failure.
    pub fn into_handler_error(self) -> Option<BoxError> {
        match self {
            DispatchError::Handler(err) => Some(err),
            _ => None,
        }
    }
}

// Convenience conversions
impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Handler(err)
    }
}
