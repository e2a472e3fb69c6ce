//! # monodispatch-core
//!
//! Core types for the monodispatch single-dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! libraries that only declare types or write handlers, without pulling in the
//! registry implementation from `monodispatch-std`.
//!
//! # Building Blocks
//!
//! ## Identity ([`TypeTag`], [`Dispatchable`])
//!
//! Every dispatched value is seen through `&dyn Dispatchable`, which reports
//! the value's concrete [`TypeTag`]. Tags also name abstract supertypes, most
//! conveniently as trait objects (`TypeTag::of::<dyn Animal>()`).
//!
//! ## Keys ([`TypeKey`], [`Capability`])
//!
//! What a handler is registered under: one exact type, a union of types, or a
//! structural capability (a set of `(name, arity)` operations).
//!
//! ## Hierarchy ([`TypeHierarchy`])
//!
//! The explicit supertype graph standing in for runtime inheritance. It yields
//! the [`AncestryPath`] the resolver walks and the operations used for
//! structural matching.
//!
//! ## Handlers ([`Handler`], [`MethodHandler`])
//!
//! The callables selected by dispatch. Closures work out of the box.
//!
//! # Error Types
//!
//! - [`MonodispatchError`] - Top-level error type
//! - [`RegistrationError`] - Configuration-phase errors
//! - [`DispatchError`] - Call-time errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatchable;
mod error;
mod handler;
mod hierarchy;
mod key;
mod tag;

// Re-exports
pub use dispatchable::Dispatchable;
pub use error::{BoxError, DispatchError, MonodispatchError, RegistrationError};
pub use handler::{Handler, HandlerResult, MethodHandler};
pub use hierarchy::{AncestryPath, Describe, HierarchyBuilder, TypeDecl, TypeHierarchy};
pub use key::{Capability, Operation, TypeKey};
pub use tag::{TypeTag, Universal};
