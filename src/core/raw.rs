//! Purpose: Untyped storage for one parsed JSON/YAML fragment.
//! Exports: `RawValue`, `Map`, `List`.
//! Role: Backing representation behind `Data`; the serde boundary for decode and encode.
//! Invariants: Cloning is shallow; list and object containers are shared, never deep-copied.
//! Invariants: Equality is structural and ignores whether two trees share storage.
//! Invariants: Integral numbers within +/-2^53 encode as JSON integers, others as floats.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::core::kind::Kind;

pub type Map = BTreeMap<String, RawValue>;
pub type List = Vec<RawValue>;

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A parsed value in its untyped form.
///
/// Containers live behind `Rc<RefCell<_>>`, so every clone of a `List` or
/// `Object` refers to the same node. Scalars are plain values.
#[derive(Clone)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    List(Rc<RefCell<List>>),
    Object(Rc<RefCell<Map>>),
}

impl RawValue {
    pub fn object(map: Map) -> Self {
        RawValue::Object(Rc::new(RefCell::new(map)))
    }

    pub fn list(items: List) -> Self {
        RawValue::List(Rc::new(RefCell::new(items)))
    }

    pub fn kind(&self) -> Kind {
        match self {
            RawValue::Null => Kind::Null,
            RawValue::Bool(_) => Kind::Bool,
            RawValue::Number(_) => Kind::Number,
            RawValue::String(_) => Kind::String,
            RawValue::List(_) => Kind::List,
            RawValue::Object(_) => Kind::Object,
        }
    }

    /// True when both values are the same container node.
    ///
    /// Scalars never share storage, even when equal.
    pub fn shares_storage_with(&self, other: &RawValue) -> bool {
        match (self, other) {
            (RawValue::List(a), RawValue::List(b)) => Rc::ptr_eq(a, b),
            (RawValue::Object(a), RawValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Deep-copies the tree into the `serde_json` model.
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(value) => Value::Bool(*value),
            RawValue::Number(value) => match exact_integer(*value) {
                Some(int) => Value::from(int),
                None => serde_json::Number::from_f64(*value)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            RawValue::String(text) => Value::String(text.to_string()),
            RawValue::List(items) => Value::Array(items.borrow().iter().map(Self::to_json).collect()),
            RawValue::Object(map) => Value::Object(
                map.borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Negative zero stays a float so its sign survives re-encoding.
fn exact_integer(value: f64) -> Option<i64> {
    let negative_zero = value == 0.0 && value.is_sign_negative();
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER && !negative_zero {
        Some(value as i64)
    } else {
        None
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Number(a), RawValue::Number(b)) => a == b,
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::List(a), RawValue::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (RawValue::Object(a), RawValue::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("Null"),
            RawValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            RawValue::Number(value) => f.debug_tuple("Number").field(value).finish(),
            RawValue::String(text) => f.debug_tuple("String").field(text).finish(),
            RawValue::List(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            RawValue::Object(map) => f.debug_map().entries(map.borrow().iter()).finish(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawValue::Null => serializer.serialize_unit(),
            RawValue::Bool(value) => serializer.serialize_bool(*value),
            RawValue::Number(value) => match exact_integer(*value) {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*value),
            },
            RawValue::String(text) => serializer.serialize_str(text),
            RawValue::List(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            RawValue::Object(map) => {
                let map = map.borrow();
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<RawValue, E> {
        Ok(RawValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<RawValue, E> {
        Ok(RawValue::String(Rc::from(value)))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<RawValue, E> {
        Ok(RawValue::String(Rc::from(value)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawValue, D::Error> {
        RawValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValue, A::Error> {
        let mut items = List::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(item) = seq.next_element::<RawValue>()? {
            items.push(item);
        }
        Ok(RawValue::list(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawValue, A::Error> {
        let mut map = Map::new();
        // Duplicate keys: the last occurrence wins.
        while let Some((key, value)) = access.next_entry::<String, RawValue>()? {
            map.insert(key, value);
        }
        Ok(RawValue::object(map))
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(value) => RawValue::Bool(value),
            // `as_f64` only returns None under serde_json's arbitrary_precision feature.
            Value::Number(num) => RawValue::Number(num.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => RawValue::String(Rc::from(text)),
            Value::Array(items) => RawValue::list(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => RawValue::object(
                map.into_iter()
                    .map(|(key, value)| (key, RawValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::Number(value as f64)
                }
            }
        )*
    };
}

from_number!(i32, i64, u32, u64, usize, f32);

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(Rc::from(value))
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(Rc::from(value))
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::list(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<BTreeMap<String, T>> for RawValue {
    fn from(map: BTreeMap<String, T>) -> Self {
        RawValue::object(
            map.into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::RawValue;
    use crate::core::kind::Kind;
    use serde_json::json;

    #[test]
    fn clones_share_container_storage() {
        let list = RawValue::from(vec![1, 2, 3]);
        let alias = list.clone();
        assert!(list.shares_storage_with(&alias));

        if let RawValue::List(items) = &alias {
            items.borrow_mut()[0] = RawValue::from("changed");
        }
        assert_eq!(list.to_json(), json!(["changed", 2, 3]));
    }

    #[test]
    fn equality_ignores_aliasing() {
        let a = RawValue::from(json!({"a": 1, "b": [true, null]}));
        let b = RawValue::from(json!({"b": [true, null], "a": 1.0}));
        assert!(!a.shares_storage_with(&b));
        assert_eq!(a, b);
        assert_ne!(a, RawValue::from(json!({"a": 2, "b": [true, null]})));
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        let value: RawValue = serde_json::from_str("-0.0").expect("parses");
        assert_eq!(value.to_string(), "-0.0");
        let json = value.to_json();
        assert!(json.as_f64().expect("float").is_sign_negative());
        assert_eq!(RawValue::from(0.0).to_string(), "0");
    }

    #[test]
    fn scalars_never_share_storage() {
        let a = RawValue::from("x");
        assert!(!a.shares_storage_with(&a.clone()));
    }

    #[test]
    fn integral_numbers_encode_as_integers() {
        let value = RawValue::from(vec![RawValue::from(42.0), RawValue::from(1.5)]);
        assert_eq!(value.to_string(), "[42,1.5]");
        assert_eq!(RawValue::from(-3.0).to_string(), "-3");
        assert_eq!(RawValue::from(1e300).to_string(), "1e300");
        assert_eq!(RawValue::from(f64::NAN).to_string(), "null");
    }

    #[test]
    fn kind_follows_current_shape() {
        assert_eq!(RawValue::Null.kind(), Kind::Null);
        assert_eq!(RawValue::from(Some(true)).kind(), Kind::Bool);
        assert_eq!(RawValue::from(None::<bool>).kind(), Kind::Null);
        assert_eq!(RawValue::from(json!({})).kind(), Kind::Object);
    }

    #[test]
    fn deserialize_keeps_last_duplicate_key() {
        let value: RawValue = serde_json::from_str(r#"{"a":1,"a":2}"#).expect("parse");
        assert_eq!(value.to_json(), json!({"a": 2}));
    }
}
