//! Purpose: Normalize YAML documents into JSON bytes.
//! Exports: `to_json_bytes`, `ConversionError`.
//! Role: Front half of `parse_yaml`; the JSON decoder does the rest.
//! Invariants: Non-string scalar keys are stringified; null and collection keys are rejected.
//! Invariants: Tags are dropped in favour of the tagged value.
//! Invariants: Non-finite floats are rejected because JSON cannot encode them.
//! Invariants: Merge keys (`<<`) are applied; duplicate keys keep the last value.
//! Invariants: Integers wider than 64 bits become doubles, as they do on the JSON path.

use std::error::Error as StdError;
use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::core::error::{Error, ErrorKind};

#[derive(Debug)]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ConversionError {}

fn yaml_error(err: serde_yaml::Error) -> Error {
    Error::new(ErrorKind::Parse)
        .with_message(format!("yaml: {err}"))
        .with_source(err)
}

/// A YAML node decoded leniently: `serde_yaml::Value` rejects duplicate keys
/// and 128-bit integers, neither of which the JSON path refuses.
struct LenientNode(YamlValue);

impl<'de> Deserialize<'de> for LenientNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientVisitor).map(LenientNode)
    }
}

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = YamlValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<YamlValue, E> {
        Ok(YamlValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<YamlValue, E> {
        Ok(YamlValue::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<YamlValue, E> {
        Ok(YamlValue::Number(value.into()))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<YamlValue, E> {
        match i64::try_from(value) {
            Ok(int) => self.visit_i64(int),
            Err(_) => self.visit_f64(value as f64),
        }
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<YamlValue, E> {
        match u64::try_from(value) {
            Ok(int) => self.visit_u64(int),
            Err(_) => self.visit_f64(value as f64),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<YamlValue, E> {
        Ok(YamlValue::Number(value.into()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<YamlValue, E> {
        Ok(YamlValue::String(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<YamlValue, E> {
        Ok(YamlValue::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<YamlValue, E> {
        Ok(YamlValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<YamlValue, E> {
        Ok(YamlValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<YamlValue, D::Error> {
        LenientNode::deserialize(deserializer).map(|node| node.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<YamlValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LenientNode(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(YamlValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<YamlValue, A::Error> {
        let mut mapping = Mapping::new();
        while let Some(LenientNode(key)) = map.next_key()? {
            let LenientNode(value) = map.next_value()?;
            mapping.insert(key, value);
        }
        Ok(YamlValue::Mapping(mapping))
    }

    // Custom tags arrive as single-variant enums; the tag itself is dropped.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<YamlValue, A::Error> {
        let (_tag, variant): (String, _) = data.variant()?;
        variant.newtype_variant::<LenientNode>().map(|node| node.0)
    }
}

pub(crate) fn to_json_bytes(input: &str) -> Result<Vec<u8>, Error> {
    let LenientNode(mut document) = serde_yaml::from_str(input).map_err(yaml_error)?;
    document.apply_merge().map_err(yaml_error)?;
    let json = normalize(document).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("yaml: {err}"))
            .with_source(err)
    })?;
    serde_json::to_vec(&json).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(err.to_string())
            .with_source(err)
    })
}

fn normalize(value: YamlValue) -> Result<JsonValue, ConversionError> {
    let json = match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(value) => JsonValue::Bool(value),
        YamlValue::Number(num) => normalize_number(&num)?,
        YamlValue::String(text) => JsonValue::String(text),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .map(normalize)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(normalize_key(key)?, normalize(value)?);
            }
            JsonValue::Object(map)
        }
        YamlValue::Tagged(tagged) => normalize(tagged.value)?,
    };
    Ok(json)
}

fn normalize_number(num: &serde_yaml::Number) -> Result<JsonValue, ConversionError> {
    if let Some(int) = num.as_i64() {
        return Ok(JsonValue::from(int));
    }
    if let Some(int) = num.as_u64() {
        return Ok(JsonValue::from(int));
    }
    num.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .ok_or_else(|| ConversionError::new(format!("number `{num}` cannot be represented in JSON")))
}

fn normalize_key(key: YamlValue) -> Result<String, ConversionError> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Bool(value) => Ok(value.to_string()),
        YamlValue::Number(num) if num.is_nan() || num.is_infinite() => Err(ConversionError::new(
            format!("map key `{num}` cannot be represented in JSON"),
        )),
        YamlValue::Number(num) => Ok(num.to_string()),
        YamlValue::Tagged(tagged) => normalize_key(tagged.value),
        YamlValue::Null => Err(ConversionError::new("unsupported map key: null")),
        YamlValue::Sequence(_) => Err(ConversionError::new("unsupported map key: sequence")),
        YamlValue::Mapping(_) => Err(ConversionError::new("unsupported map key: mapping")),
    }
}

#[cfg(test)]
mod tests {
    use super::to_json_bytes;
    use crate::core::error::ErrorKind;
    use serde_json::{Value, json};

    fn convert(input: &str) -> Value {
        let bytes = to_json_bytes(input).expect("convert");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[test]
    fn flow_mapping_converts_to_object() {
        assert_eq!(
            convert("{name: fred, life: 42}"),
            json!({"name": "fred", "life": 42})
        );
    }

    #[test]
    fn scalar_keys_are_stringified() {
        assert_eq!(
            convert("1: one\ntrue: yes-ish\n2.5: float"),
            json!({"1": "one", "true": "yes-ish", "2.5": "float"})
        );
    }

    #[test]
    fn tags_are_dropped() {
        assert_eq!(convert("value: !custom 7"), json!({"value": 7}));
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(convert(""), Value::Null);
    }

    #[test]
    fn anchors_and_aliases_expand() {
        assert_eq!(
            convert("base: &b [1, 2]\ncopy: *b"),
            json!({"base": [1, 2], "copy": [1, 2]})
        );
    }

    #[test]
    fn merge_keys_are_applied() {
        assert_eq!(
            convert("base: &b {x: 1, z: 3}\nderived:\n  <<: *b\n  y: 2\n  z: 4"),
            json!({"base": {"x": 1, "z": 3}, "derived": {"x": 1, "y": 2, "z": 4}})
        );
    }

    #[test]
    fn merge_of_a_scalar_is_a_parse_error() {
        let err = to_json_bytes("a:\n  <<: 5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("parse error: yaml: "));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        assert_eq!(convert("a: 1\nb: 2\na: 3"), json!({"a": 3, "b": 2}));
        assert_eq!(convert(r#"{"a":1,"a":2}"#), json!({"a": 2}));
    }

    #[test]
    fn integers_beyond_64_bits_become_doubles() {
        assert_eq!(
            convert("big: 18446744073709551616\nsmall: -9223372036854775809"),
            json!({"big": 18446744073709551616.0_f64, "small": -9223372036854775809.0_f64})
        );
        assert_eq!(convert("max: 18446744073709551615"), json!({"max": u64::MAX}));
    }

    #[test]
    fn unrepresentable_values_are_parse_errors() {
        for input in ["x: .inf", "x: .nan", "? [a, b]\n: v", "~: v", "a: 1\n---\nb: 2"] {
            let err = to_json_bytes(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{input}");
            assert!(err.to_string().starts_with("parse error: yaml: "), "{input}");
        }
    }
}
