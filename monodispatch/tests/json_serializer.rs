//! An extensible JSON serializer built on a global dispatcher.
//!
//! Handlers for container types call back into the same dispatcher, so this
//! also checks that dispatch is re-entrant.

use lazy_static::lazy_static;
use monodispatch::{DispatchError, Dispatchable, Dispatcher, HandlerResult, TypeKey};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

#[derive(Debug)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug)]
struct Timestamp(u64);

struct Payload {
    timestamp: Timestamp,
    unique_ids: HashSet<u32>,
    user: User,
    simple_list: Vec<i64>,
}

struct Opaque;

lazy_static! {
    static ref SERIALIZE: Dispatcher<(), Value> = build_serializer();
}

fn serialize(value: &dyn Dispatchable) -> HandlerResult<Value> {
    SERIALIZE.call(value, ()).map_err(Into::into)
}

fn build_serializer() -> Dispatcher<(), Value> {
    let serializer = Dispatcher::<(), Value>::new(|v, _| Ok(Value::String(format!("<{}>", v.type_tag()))));
    serializer
        .register_typed(|n: &i64, _| Ok(json!(n)))
        .and_then(|_| serializer.register_typed(|n: &u64, _| Ok(json!(n))))
        .and_then(|_| serializer.register_typed(|s: &String, _| Ok(Value::String(s.clone()))))
        .and_then(|_| {
            serializer.register_typed(|t: &Timestamp, _| Ok(Value::String(format!("epoch+{}", t.0))))
        })
        .and_then(|_| {
            serializer.register_typed(|set: &HashSet<u32>, _| {
                let mut ids: Vec<_> = set.iter().copied().collect();
                ids.sort_unstable();
                Ok(json!(ids))
            })
        })
        .and_then(|_| {
            serializer.register_typed(|list: &Vec<i64>, _| {
                let items = list
                    .iter()
                    .map(|item| serialize(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            })
        })
        .and_then(|_| {
            serializer.register_typed(|user: &User, _| {
                Ok(json!({
                    "__type__": "User",
                    "id": serialize(&user.id)?,
                    "name": serialize(&user.name)?,
                }))
            })
        })
        .and_then(|_| {
            serializer.register_typed(|p: &Payload, _| {
                let mut map = Map::new();
                map.insert("timestamp".into(), serialize(&p.timestamp)?);
                map.insert("unique_ids".into(), serialize(&p.unique_ids)?);
                map.insert("user_info".into(), serialize(&p.user)?);
                map.insert("simple_list".into(), serialize(&p.simple_list)?);
                Ok(Value::Object(map))
            })
        })
        .unwrap_or_else(|err| panic!("serializer registration failed: {err}"));
    serializer
}

#[test]
fn test_serialize_mixed_payload() {
    let payload = Payload {
        timestamp: Timestamp(1_700_000_000),
        unique_ids: HashSet::from([3, 1, 2, 3, 2]),
        user: User {
            id: 42,
            name: "Alice".into(),
        },
        simple_list: vec![10, 20],
    };

    let value = SERIALIZE.call(&payload, ()).unwrap();
    assert_eq!(
        value,
        json!({
            "timestamp": "epoch+1700000000",
            "unique_ids": [1, 2, 3],
            "user_info": {"__type__": "User", "id": 42, "name": "Alice"},
            "simple_list": [10, 20],
        })
    );
}

#[test]
fn test_unknown_types_fall_back_to_description() {
    let value = SERIALIZE.call(&Opaque, ()).unwrap();
    let text = value.as_str().unwrap();
    assert!(text.starts_with('<') && text.ends_with("Opaque>"));
}

#[test]
fn test_serializer_can_be_extended() {
    // Registering on the global dispatcher changes later calls.
    SERIALIZE
        .register(TypeKey::exact::<bool>(), |v, _| {
            let b = v.downcast_ref::<bool>().ok_or("expected bool")?;
            Ok(Value::String(if *b { "yes" } else { "no" }.into()))
        })
        .unwrap();
    assert_eq!(SERIALIZE.call(&true, ()).unwrap(), json!("yes"));
}

#[test]
fn test_failing_fallback_is_reported() {
    let serializer = Dispatcher::<(), Value>::new(|_, _| Err("no fallback".into()));
    let err = serializer.call(&Opaque, ()).unwrap_err();
    assert!(matches!(err, DispatchError::Handler(_)));
}
