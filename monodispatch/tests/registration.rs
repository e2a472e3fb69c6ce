//! Registration rules and cache coherence.

use monodispatch::{
    CachePolicy, Capability, Dispatcher, RegistrationError, TypeKey, TypeTag, testing::CountingHandler,
    type_set,
};

mod common;
use common::{Animal, Cat, label, zoo};

#[test]
fn test_exact_reregistration_replaces() {
    let d = Dispatcher::<(), String>::new(label("default"));
    d.register(TypeKey::exact::<i64>(), label("first")).unwrap();
    assert_eq!(d.call(&1_i64, ()).unwrap(), "first");

    d.register(TypeKey::exact::<i64>(), label("second")).unwrap();
    assert_eq!(d.call(&1_i64, ()).unwrap(), "second");
    assert_eq!(d.registrations().len(), 1);
}

#[test]
fn test_union_conflicts_are_all_or_nothing() {
    let d = Dispatcher::<(), String>::new(label("default"));
    d.register_typed(|_: &f64, _| Ok("float".into())).unwrap();

    let err = d.register(type_set![i64, f64], label("number")).unwrap_err();
    match &err {
        RegistrationError::AmbiguousUnion { member, .. } => assert_eq!(member, "f64"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(err.to_string(), "union `i64 | f64` would override `f64`, already handled by `f64`");

    // Neither member changed.
    assert_eq!(d.call(&1_i64, ()).unwrap(), "default");
    assert_eq!(d.call(&1.0_f64, ()).unwrap(), "float");
}

#[test]
fn test_exact_cannot_split_a_union() {
    let d = Dispatcher::<(), String>::new(label("default"));
    d.register(type_set![i64, f64], label("number")).unwrap();
    let err = d.register(TypeKey::exact::<i64>(), label("int")).unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicateKey { .. }));
    assert_eq!(d.call(&1_i64, ()).unwrap(), "number");
}

#[test]
fn test_default_is_frozen() {
    let d = Dispatcher::<(), String>::new(label("default"));
    let err = d
        .register(TypeKey::Exact(TypeTag::root()), label("any"))
        .unwrap_err();
    assert!(matches!(err, RegistrationError::RegistryFrozen(_)));

    let err = d
        .register(TypeKey::union([TypeTag::of::<u8>(), TypeTag::root()]), label("any"))
        .unwrap_err();
    assert!(matches!(err, RegistrationError::RegistryFrozen(_)));
    assert!(d.registrations().is_empty());
}

#[test]
fn test_capability_without_requirements_cannot_replace_default() {
    let d = Dispatcher::<(), String>::new(label("default"));
    let err = d
        .register(Capability::new("Anything"), label("everything"))
        .unwrap_err();
    assert!(matches!(err, RegistrationError::RegistryFrozen(_)));
    assert!(err.to_string().contains("Anything"));

    assert_eq!(d.call(&7_u8, ()).unwrap(), "default");
    assert_eq!(d.call(&"x", ()).unwrap(), "default");
    assert!(d.registrations().is_empty());
}

#[test]
fn test_cache_is_flushed_on_register() {
    let d = Dispatcher::<(), String>::builder(label("default"))
        .hierarchy(zoo())
        .build();

    // Cached as default first.
    assert_eq!(d.call(&Cat, ()).unwrap(), "default");
    assert_eq!(d.cache_stats().entries, 1);

    d.register(TypeKey::exact::<dyn Animal>(), label("animal"))
        .unwrap();
    assert_eq!(d.cache_stats().entries, 0);
    assert_eq!(d.cache_stats().invalidations, 1);
    assert_eq!(d.call(&Cat, ()).unwrap(), "animal");

    d.register_typed(|_: &Cat, _| Ok("cat".into())).unwrap();
    assert_eq!(d.call(&Cat, ()).unwrap(), "cat");
}

#[test]
fn test_disabled_cache_resolves_every_call() {
    let counter = CountingHandler::new();
    let d = Dispatcher::<(), ()>::builder(|_, _| Ok(()))
        .cache(CachePolicy::Disabled)
        .build();
    d.register_handler(TypeKey::exact::<u8>(), counter.clone())
        .unwrap();

    for _ in 0..3 {
        d.call(&1_u8, ()).unwrap();
    }
    assert_eq!(counter.count(), 3);

    let stats = d.cache_stats();
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 3);
}

#[test]
fn test_clear_cache() {
    let d = Dispatcher::<(), String>::new(label("default"));
    d.call(&1_u8, ()).unwrap();
    d.call(&1_u16, ()).unwrap();
    assert_eq!(d.cache_stats().entries, 2);

    d.clear_cache();
    assert_eq!(d.cache_stats().entries, 0);
}
