use serde::{Deserialize, Serialize};
use serde_spytext::{to_string, Error, Options, Registry};
use std::sync::Arc;
use std::thread;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename = "no.steria.spytest.serializer.EmptyClass")]
struct EmptyClass {}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename = "no.steria.spytest.serializer.ClassWithSimpleFields")]
struct ClassWithSimpleFields {
    stringval: Option<String>,
    intval: i32,
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register::<EmptyClass>("no.steria.spytest.serializer.EmptyClass")
        .register::<ClassWithSimpleFields>("no.steria.spytest.serializer.ClassWithSimpleFields")
        .register::<String>("String");
    registry
}

#[test]
fn test_returns_registered_type() {
    let text = to_string(&EmptyClass {}).unwrap();
    let decoded = registry().decode(&text).unwrap().unwrap();
    assert!(decoded.is::<EmptyClass>());
}

#[test]
fn test_round_trip_without_target() {
    let value = ClassWithSimpleFields {
        stringval: Some("pedro".to_string()),
        intval: 42,
    };
    let text = to_string(&value).unwrap();
    let decoded = registry().decode(&text).unwrap().unwrap();
    let cloned = decoded.downcast::<ClassWithSimpleFields>().unwrap();
    assert_eq!(*cloned, value);
}

#[test]
fn test_null_decodes_to_none() {
    assert!(registry().decode("<null>").unwrap().is_none());
    assert_eq!(registry().decode_as::<EmptyClass>("<null>").unwrap(), None);
}

#[test]
fn test_root_scalar_by_type_tag() {
    let text = to_string("abc").unwrap();
    assert_eq!(registry().decode_as::<String>(&text).unwrap().as_deref(), Some("abc"));
}

#[test]
fn test_unknown_type_name() {
    let err = registry().decode("<no.steria.Missing;a=1>").unwrap_err();
    assert!(matches!(err, Error::TypeResolution { ref name, .. } if name == "no.steria.Missing"));
}

#[test]
fn test_malformed_text() {
    assert!(matches!(
        registry().decode("no.steria.Missing"),
        Err(Error::Malformed { offset: 0, .. })
    ));
}

#[test]
fn test_registered_type_errors_propagate() {
    let err = registry()
        .decode("<no.steria.spytest.serializer.ClassWithSimpleFields;intval=x>")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
}

#[test]
fn test_registry_options_apply() {
    let mut registry = Registry::with_options(Options::new().with_max_depth(1));
    registry.register::<Vec<Vec<i32>>>("array");
    assert!(registry.decode("<array;1>").is_err());
    assert_eq!(
        registry.decode("<array;<array;1>>").unwrap_err(),
        Error::DepthLimitExceeded(1)
    );
}

#[test]
fn test_shared_across_threads() {
    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let text = format!(
                    "<no.steria.spytest.serializer.ClassWithSimpleFields;stringval=t{};intval={}>",
                    i, i
                );
                registry
                    .decode_as::<ClassWithSimpleFields>(&text)
                    .unwrap()
                    .unwrap()
                    .intval
            })
        })
        .collect();

    let mut results: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort();
    assert_eq!(results, vec![0, 1, 2, 3]);
}
