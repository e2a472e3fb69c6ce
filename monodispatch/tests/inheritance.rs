//! Dispatch through the declared type hierarchy.

use monodispatch::{DispatchError, Dispatcher, TypeKey, TypeTag};
use std::sync::Arc;

mod common;
use common::{Animal, Bird, Cat, Dog, Duck, Pet, Rock, Swimmer, label, zoo};

fn speak() -> Dispatcher<(), String> {
    Dispatcher::builder(label("default"))
        .hierarchy(zoo())
        .build()
}

#[test]
fn test_exact_beats_ancestor() {
    let speak = speak();
    speak
        .register(TypeKey::exact::<dyn Animal>(), label("animal"))
        .unwrap();
    speak
        .register_typed(|dog: &Dog, _| Ok(format!("{} says woof", dog.name)))
        .unwrap();

    let rex = Dog {
        name: "Rex".into(),
    };
    assert_eq!(speak.call(&rex, ()).unwrap(), "Rex says woof");
}

#[test]
fn test_ancestor_handles_unregistered_subtype() {
    let speak = speak();
    speak
        .register(TypeKey::exact::<dyn Animal>(), label("animal"))
        .unwrap();

    assert_eq!(speak.call(&Cat, ()).unwrap(), "animal");
    assert_eq!(speak.call(&Duck, ()).unwrap(), "animal");
    assert_eq!(speak.call(&Rock, ()).unwrap(), "default");
}

#[test]
fn test_registration_order_does_not_matter() {
    // Pet sits between Dog and Animal, so it wins however they were added.
    for pet_first in [true, false] {
        let speak = speak();
        let keys = if pet_first {
            [(TypeKey::exact::<dyn Pet>(), "pet"), (TypeKey::exact::<dyn Animal>(), "animal")]
        } else {
            [(TypeKey::exact::<dyn Animal>(), "animal"), (TypeKey::exact::<dyn Pet>(), "pet")]
        };
        for (key, text) in keys {
            speak.register(key, label(text)).unwrap();
        }

        let rex = Dog {
            name: "Rex".into(),
        };
        assert_eq!(speak.call(&rex, ()).unwrap(), "pet");
        assert_eq!(speak.call(&Cat, ()).unwrap(), "pet");
        assert_eq!(speak.call(&Duck, ()).unwrap(), "animal");
    }
}

#[test]
fn test_unrelated_supertypes_are_ambiguous() {
    let speak = speak();
    speak.register(TypeKey::exact::<dyn Bird>(), label("bird")).unwrap();
    speak
        .register(TypeKey::exact::<dyn Swimmer>(), label("swimmer"))
        .unwrap();

    match speak.call(&Duck, ()) {
        Err(DispatchError::Ambiguous {
            type_name,
            candidates,
        }) => {
            assert!(type_name.ends_with("Duck"));
            assert_eq!(candidates.len(), 2);
            assert!(candidates[0].ends_with("Bird"));
            assert!(candidates[1].ends_with("Swimmer"));
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    // The ambiguity is settled by registering the concrete type.
    speak.register_typed(|_: &Duck, _| Ok("duck".into())).unwrap();
    assert_eq!(speak.call(&Duck, ()).unwrap(), "duck");
}

#[test]
fn test_more_specific_supertype_wins_on_diamond() {
    let speak = speak();
    speak
        .register(TypeKey::exact::<dyn Animal>(), label("animal"))
        .unwrap();
    speak.register(TypeKey::exact::<dyn Bird>(), label("bird")).unwrap();

    assert_eq!(speak.call(&Duck, ()).unwrap(), "bird");
}

#[test]
fn test_ancestry_path_order() {
    let zoo = zoo();
    let path = zoo.ancestry(TypeTag::of::<Duck>());
    assert_eq!(
        path.into_vec(),
        vec![
            TypeTag::of::<Duck>(),
            TypeTag::of::<dyn Bird>(),
            TypeTag::of::<dyn Swimmer>(),
            TypeTag::of::<dyn Animal>(),
            TypeTag::root(),
        ]
    );

    let path = zoo.ancestry(TypeTag::of::<Dog>());
    assert_eq!(
        path.supertypes(),
        &[TypeTag::of::<dyn Pet>(), TypeTag::of::<dyn Animal>()]
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let speak = speak();
    speak
        .register(TypeKey::exact::<dyn Animal>(), label("animal"))
        .unwrap();

    let first = speak.resolve_type::<Cat>().unwrap();
    let second = speak.resolve_type::<Cat>().unwrap();
    assert!(Arc::ptr_eq(first.entry().unwrap(), second.entry().unwrap()));

    let stats = speak.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}
