//! Property-based tests for navigation, mutation, and format parity.
//!
//! These tests use proptest to generate arbitrary documents and check that the
//! documented invariants hold for all of them.

use proptest::prelude::*;
use serde_json::Value;
use unstructured::api::{Data, ErrorKind, Kind, parse_json, parse_yaml};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        // Quarters print exactly in both notations.
        (-4_000i32..4_000).prop_map(|q| Value::from(f64::from(q) / 4.0)),
        "[a-z ]{0,8}".prop_map(Value::String),
    ]
}

fn document() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z~/]{0,5}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn escape_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

proptest! {
    /// Decoding serialized JSON gives the same tree as converting directly.
    #[test]
    fn json_text_round_trips(value in document()) {
        let text = serde_json::to_string(&value).unwrap();
        let parsed = parse_json(&text).unwrap();
        prop_assert_eq!(parsed, Data::from_raw(value));
    }

    /// The YAML rendering of a document parses equal to its JSON rendering.
    #[test]
    fn yaml_and_json_renderings_agree(value in document()) {
        let json_text = serde_json::to_string(&value).unwrap();
        let yaml_text = serde_yaml::to_string(&value).unwrap();
        prop_assert_eq!(parse_yaml(&yaml_text).unwrap(), parse_json(&json_text).unwrap());
    }

    /// Exactly one type test holds, and it matches `kind()`.
    #[test]
    fn exactly_one_type_holds(value in document()) {
        let data = Data::from_raw(value);
        let held: Vec<Kind> = Kind::ALL.into_iter().filter(|k| data.is_of_type(*k)).collect();
        prop_assert_eq!(held, vec![data.kind()]);
    }

    /// For objects, field access and single-token pointers agree on every key.
    #[test]
    fn fields_and_pointers_agree(value in document()) {
        let data = Data::from_raw(value);
        if data.is_object() {
            for key in data.as_object().keys() {
                let pointer = format!("/{}", escape_token(&key));
                prop_assert!(data.has_key(&key));
                prop_assert!(data.has_pointer(&pointer).unwrap());
                prop_assert_eq!(data.get_by_pointer(&pointer).unwrap(), data.get_field(&key));
            }
        }
    }

    /// Setting a field makes it readable, and leaves other fields alone.
    #[test]
    fn set_field_then_read_back(value in document(), key in "[a-z~/]{0,5}", new in scalar()) {
        let data = Data::from_raw(value);
        if data.is_object() {
            let before = data.to_json();
            data.set_field(key.clone(), new.clone()).unwrap();
            prop_assert_eq!(data.get_field(&key), Data::from_raw(new));
            for (other, old) in before.as_object().unwrap() {
                if *other != key {
                    prop_assert_eq!(data.get_field(other), Data::from_raw(old.clone()));
                }
            }
        } else {
            prop_assert_eq!(data.set_field(key, new).unwrap_err().kind(), ErrorKind::WrongShape);
        }
    }

    /// In-range `set_elem` writes one slot; out-of-range changes nothing.
    #[test]
    fn set_elem_respects_bounds(items in prop::collection::vec(scalar(), 0..8), index in 0usize..10, new in scalar()) {
        let data = Data::from_raw(Value::Array(items.clone()));
        let len = items.len();
        match data.set_elem(index, new.clone()) {
            Ok(()) => {
                prop_assert!(index < len);
                prop_assert_eq!(data.as_list()[index].clone(), Data::from_raw(new));
                prop_assert_eq!(data.as_list().len(), len);
            }
            Err(err) => {
                prop_assert!(index >= len);
                prop_assert_eq!(err.kind(), ErrorKind::OutOfBounds);
                prop_assert_eq!(data, Data::from_raw(Value::Array(items)));
            }
        }
    }

    /// Pointers without a leading "/" are always rejected as syntax errors.
    #[test]
    fn relative_pointers_are_rejected(value in document(), text in "[a-z0-9]{1,6}") {
        let data = Data::from_raw(value);
        prop_assert_eq!(data.has_pointer(&text).unwrap_err().kind(), ErrorKind::PointerSyntax);
    }
}
