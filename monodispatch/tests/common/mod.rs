#![allow(dead_code)]

use monodispatch::{Dispatchable, HandlerResult, TypeDecl, TypeHierarchy};

// ============================================================================
// Test Type Hierarchy
// ============================================================================

pub trait Animal {}
pub trait Pet {}
pub trait Bird {}
pub trait Swimmer {}

#[derive(Debug, Clone)]
pub struct Dog {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Cat;

#[derive(Debug, Clone)]
pub struct Duck;

#[derive(Debug, Clone)]
pub struct Robot;

#[derive(Debug, Clone)]
pub struct Rock;

/// `Dog: Pet, Animal`, `Cat: Pet`, `Pet: Animal`, `Duck: Bird, Swimmer`,
/// `Bird: Animal`, `Swimmer: Animal`. `Robot` quacks without being a bird.
pub fn zoo() -> TypeHierarchy {
    TypeHierarchy::builder()
        .declare(
            TypeDecl::of::<Dog>()
                .extends::<dyn Pet>()
                .extends::<dyn Animal>()
                .exposes("bark", 0),
        )
        .declare(TypeDecl::of::<Cat>().extends::<dyn Pet>().exposes("meow", 0))
        .declare(TypeDecl::of::<dyn Pet>().extends::<dyn Animal>())
        .declare(
            TypeDecl::of::<Duck>()
                .extends::<dyn Bird>()
                .extends::<dyn Swimmer>()
                .exposes("quack", 0)
                .exposes("swim", 1),
        )
        .declare(TypeDecl::of::<dyn Bird>().extends::<dyn Animal>())
        .declare(TypeDecl::of::<dyn Swimmer>().extends::<dyn Animal>())
        .declare(TypeDecl::of::<Robot>().exposes("quack", 0))
        .build()
}

// ============================================================================
// Test Handlers
// ============================================================================

/// A handler returning a fixed label, for asserting which entry ran.
pub fn label(
    text: &'static str,
) -> impl Fn(&dyn Dispatchable, ()) -> HandlerResult<String> + Send + Sync + 'static {
    move |_, _| Ok(text.to_string())
}
