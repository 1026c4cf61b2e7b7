//! Purpose: Navigate, inspect, and mutate schema-less JSON/YAML documents.
//! Exports: `api` (public surface), `core` (value model), `json` (decode boundary).
//! Role: Library crate backing the `unstructured` CLI, demos, and tests.
//! Invariants: Wrong-shape reads panic; data-dependent failures return `api::Error`.
//! Invariants: Values use `Rc`/`RefCell` and stay on the thread that parsed them.
//!
//! ```
//! use unstructured::{parse_yaml, parse_json};
//!
//! let doc = parse_yaml("{name: fred, life: 42}").unwrap();
//! assert_eq!(doc, parse_json(r#"{"name":"fred","life":42}"#).unwrap());
//!
//! let name = doc.get_by_pointer("/name").unwrap();
//! assert_eq!(name.as_string(), "fred");
//!
//! doc.set_field("name", "david").unwrap();
//! assert_eq!(doc.f("name").as_string(), "david");
//! ```
pub mod api;
pub mod core;
pub mod json;

pub use api::{Data, Error, ErrorKind, JsonPointer, Kind, RawValue, parse_json, parse_yaml};
