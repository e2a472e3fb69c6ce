//! # monodispatch-std
//!
//! Standard implementation of the monodispatch engine.
//!
//! This crate provides:
//! - **Registration**: [`registry::RegistrationTable`] and its conflict rules
//! - **Resolution**: [`resolver::resolve`], exact then ancestry then structural
//! - **Caching**: [`cache::ResolutionCache`], keyed by concrete type
//! - **Entry points**: [`dispatcher::Dispatcher`] and [`method::MethodDispatcher`]
//! - **Testing**: recording and counting handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use monodispatch_core;

// Modules
pub mod cache;
pub mod dispatcher;
pub mod engine;
pub mod method;
pub mod registry;
pub mod resolver;
pub mod testing;
