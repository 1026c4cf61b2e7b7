//! Purpose: Type-checked navigation and mutation over a `RawValue` tree.
//! Exports: `Data`, `ObjectRef`.
//! Role: The dynamic value handed to callers by `parse_json`/`parse_yaml`.
//! Invariants: Type tests inspect the current shape on every call; nothing is cached.
//! Invariants: Navigation never deep-copies; child handles alias the parent's containers.
//! Invariants: Wrong-shape reads panic (caller contract); wrong-shape writes return `Error`.
//! Notes: Built on `Rc`/`RefCell`, so `Data` is neither `Send` nor `Sync`.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::core::error::{Error, ErrorKind};
use crate::core::kind::Kind;
use crate::core::pointer::JsonPointer;
use crate::core::raw::{Map, RawValue};

/// A handle onto one node of a parsed document.
///
/// Cloning a `Data` is cheap and yields another handle onto the same node.
/// Use [`Data::to_json`] when an independent copy is needed.
#[derive(Clone, PartialEq)]
pub struct Data {
    raw: RawValue,
}

impl Data {
    pub fn from_raw(raw: impl Into<RawValue>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn kind(&self) -> Kind {
        self.raw.kind()
    }

    pub fn is_object(&self) -> bool {
        matches!(self.raw, RawValue::Object(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.raw, RawValue::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.raw, RawValue::Number(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.raw, RawValue::Bool(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.raw, RawValue::List(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.raw, RawValue::Null)
    }

    pub fn is_of_type(&self, kind: Kind) -> bool {
        match kind {
            Kind::Object => self.is_object(),
            Kind::String => self.is_string(),
            Kind::Number => self.is_number(),
            Kind::List => self.is_list(),
            Kind::Null => self.is_null(),
            Kind::Bool => self.is_bool(),
        }
    }

    /// String-tag form of [`Data::is_of_type`] for callers configured by text.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not one of the six known type tags. Parse the tag
    /// with `str::parse::<Kind>()` first to handle unknown tags gracefully.
    #[track_caller]
    pub fn is_of_type_named(&self, tag: &str) -> bool {
        match tag.parse::<Kind>() {
            Ok(kind) => self.is_of_type(kind),
            Err(_) => panic!("`{tag}` is not a type tag I recognise"),
        }
    }

    /// Live view of this object's fields.
    ///
    /// # Panics
    ///
    /// Panics unless [`Data::is_object`] holds.
    #[track_caller]
    pub fn as_object(&self) -> ObjectRef {
        match &self.raw {
            RawValue::Object(map) => ObjectRef { map: Rc::clone(map) },
            _ => self.wrong_shape(Kind::Object),
        }
    }

    #[track_caller]
    pub fn as_string(&self) -> &str {
        match &self.raw {
            RawValue::String(text) => &**text,
            _ => self.wrong_shape(Kind::String),
        }
    }

    #[track_caller]
    pub fn as_number(&self) -> f64 {
        match self.raw {
            RawValue::Number(value) => value,
            _ => self.wrong_shape(Kind::Number),
        }
    }

    #[track_caller]
    pub fn as_bool(&self) -> bool {
        match self.raw {
            RawValue::Bool(value) => value,
            _ => self.wrong_shape(Kind::Bool),
        }
    }

    /// One handle per element; container elements stay shared with this list.
    #[track_caller]
    pub fn as_list(&self) -> Vec<Data> {
        match &self.raw {
            RawValue::List(items) => items.borrow().iter().cloned().map(Data::from_raw).collect(),
            _ => self.wrong_shape(Kind::List),
        }
    }

    /// The underlying value, without any type checking.
    pub fn as_raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn into_raw(self) -> RawValue {
        self.raw
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.raw.to_json()
    }

    /// # Panics
    ///
    /// Panics unless [`Data::is_object`] holds.
    #[track_caller]
    pub fn has_key(&self, key: &str) -> bool {
        self.as_object().contains_key(key)
    }

    /// Returns the value stored under `key`. Shorthand: [`Data::f`].
    ///
    /// # Panics
    ///
    /// Panics if this is not an object or `key` is absent; check with
    /// [`Data::has_key`] when unsure.
    #[track_caller]
    pub fn get_field(&self, key: &str) -> Data {
        match self.as_object().get(key) {
            Some(raw) => Data::from_raw(raw),
            None => panic!("getting a non-existing field from a Data: `{key}`"),
        }
    }

    #[track_caller]
    pub fn f(&self, key: &str) -> Data {
        self.get_field(key)
    }

    /// Inserts or overwrites `key` on this object.
    pub fn set_field(&self, key: impl Into<String>, value: impl Into<RawValue>) -> Result<(), Error> {
        let RawValue::Object(map) = &self.raw else {
            return Err(self.mutation_error(Kind::Object, "set a field on it"));
        };
        map.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }

    /// Replaces the element at `index` of this list.
    pub fn set_elem(&self, index: usize, value: impl Into<RawValue>) -> Result<(), Error> {
        let RawValue::List(items) = &self.raw else {
            return Err(self.mutation_error(Kind::List, "set an element of it"));
        };
        let mut items = items.borrow_mut();
        let len = items.len();
        let Some(slot) = items.get_mut(index) else {
            return Err(Error::new(ErrorKind::OutOfBounds)
                .with_message(format!("index {index} is out of bounds for a list of length {len}")));
        };
        *slot = value.into();
        Ok(())
    }

    /// True if `pointer` addresses an existing location.
    ///
    /// Fails only when `pointer` is not valid RFC 6901 syntax.
    pub fn has_pointer(&self, pointer: &str) -> Result<bool, Error> {
        let pointer = JsonPointer::parse(pointer)?;
        Ok(pointer.resolve(&self.raw).is_some())
    }

    pub fn get_by_pointer(&self, pointer: &str) -> Result<Data, Error> {
        let parsed = JsonPointer::parse(pointer)?;
        self.resolve(&parsed)
    }

    pub fn resolve(&self, pointer: &JsonPointer) -> Result<Data, Error> {
        pointer
            .resolve(&self.raw)
            .map(Data::from_raw)
            .ok_or_else(|| {
                Error::new(ErrorKind::NotFound)
                    .with_message("nothing exists at this location")
                    .with_pointer(pointer.to_string())
            })
    }

    #[track_caller]
    fn wrong_shape(&self, expected: Kind) -> ! {
        panic!(
            "expected {} but this Data is {}; check with is_{expected}() first",
            with_article(expected),
            with_article(self.kind()),
        )
    }

    fn mutation_error(&self, expected: Kind, action: &str) -> Error {
        Error::new(ErrorKind::WrongShape)
            .with_message(format!(
                "this is not {}, so you can't {action}",
                with_article(expected)
            ))
            .with_hint(format!("The target is {}.", with_article(self.kind())))
    }
}

fn with_article(kind: Kind) -> String {
    match kind {
        Kind::Object => format!("an {kind}"),
        Kind::Null => kind.to_string(),
        _ => format!("a {kind}"),
    }
}

impl From<Data> for RawValue {
    fn from(data: Data) -> Self {
        data.raw
    }
}

impl From<&Data> for RawValue {
    fn from(data: &Data) -> Self {
        data.raw.clone()
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").field(&self.raw).finish()
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl Serialize for Data {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Live, shared view of an object's fields, as returned by [`Data::as_object`].
#[derive(Clone)]
pub struct ObjectRef {
    map: Rc<RefCell<Map>>,
}

impl ObjectRef {
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.borrow().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<RawValue> {
        self.map.borrow().get(key).cloned()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.map.borrow().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Data)> {
        self.map
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), Data::from_raw(value.clone())))
            .collect()
    }

    /// Inserts `value`, returning whatever was stored under `key` before.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.map.borrow_mut().insert(key.into(), value.into())
    }

    /// Borrows the underlying map for iteration without cloning.
    ///
    /// The borrow must be released before mutating the same object.
    pub fn borrow(&self) -> Ref<'_, Map> {
        self.map.borrow()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.borrow().iter()).finish()
    }
}
