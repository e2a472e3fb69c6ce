//! # monodispatch - Type-Based Single Dispatch
//!
//! `monodispatch` turns a family of handlers into one generic function: the
//! handler that runs is chosen from the runtime type of the first argument.
//! Registrations can target one exact type, a union of types, or a structural
//! capability, and the most specific match always wins, independent of
//! registration order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use monodispatch::prelude::*;
//!
//! trait Animal {}
//! struct Dog;
//! struct Cat;
//!
//! let hierarchy = TypeHierarchy::builder()
//!     .declare(TypeDecl::of::<Dog>().extends::<dyn Animal>())
//!     .declare(TypeDecl::of::<Cat>().extends::<dyn Animal>())
//!     .build();
//!
//! let speak = Dispatcher::<(), String>::builder(|_, _| Ok("...".into()))
//!     .hierarchy(hierarchy)
//!     .register(TypeKey::exact::<dyn Animal>(), |_, _| Ok("some animal".into()))?
//!     .register_typed(|_: &Dog, _| Ok("woof".into()))?
//!     .build();
//!
//! assert_eq!(speak.call(&Dog, ())?, "woof");
//! assert_eq!(speak.call(&Cat, ())?, "some animal");
//! assert_eq!(speak.call(&42, ())?, "...");
//! ```
//!
//! ## Resolution Order
//!
//! 1. An entry for the exact concrete type
//! 2. The most specific registered supertype on the type's ancestry path
//! 3. The most refined structural capability the type satisfies
//! 4. The default handler
//!
//! Equally specific candidates raise [`DispatchError::Ambiguous`] instead of
//! falling back to registration order.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use monodispatch_core::{
    // Hierarchy
    AncestryPath,
    // Error types
    BoxError,
    // Keys
    Capability,
    Describe,
    DispatchError,
    // Values
    Dispatchable,
    // Handler
    Handler,
    HandlerResult,
    HierarchyBuilder,
    MethodHandler,
    MonodispatchError,
    Operation,
    RegistrationError,
    TypeDecl,
    TypeHierarchy,
    TypeKey,
    TypeTag,
    Universal,
    type_set,
};

// Dispatchers
pub use monodispatch_std::{
    cache::{CachePolicy, CacheStats},
    dispatcher::{Dispatcher, DispatcherBuilder},
    engine::Target,
    method::{MethodDispatcher, MethodDispatcherBuilder},
    registry::{RegistrationInfo, RegistrationMeta},
};

/// Registration table, resolver and engine internals.
pub mod dynamic {
    pub use monodispatch_std::{
        cache::ResolutionCache,
        engine::Engine,
        registry::{HandlerEntry, RegistrationTable},
        resolver::{Resolution, resolve},
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use monodispatch_std::testing::*;
}

/// Prelude module - common imports for monodispatch.
///
/// # Usage
///
/// ```rust,ignore
/// use monodispatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Keys
        Capability,
        Describe,
        DispatchError,
        // Values
        Dispatchable,
        // Dispatchers
        Dispatcher,
        Handler,
        HandlerResult,
        MethodDispatcher,
        RegistrationError,
        TypeDecl,
        TypeHierarchy,
        TypeKey,
        TypeTag,
        type_set,
    };
}

#[cfg(feature = "macros")]
pub use monodispatch_macros::Describe;
