//! Purpose: Define the stable public Rust API boundary for unstructured data.
//! Exports: `Data`, `RawValue`, `Kind`, `JsonPointer`, errors, parse entrypoints, matchers.
//! Role: Public, additive-only surface; internal module layout stays private to callers.
//! Invariants: Everything a consumer needs is reachable from this module.

pub mod matchers;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::data::{Data, ObjectRef};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::kind::Kind;
pub use crate::core::pointer::JsonPointer;
pub use crate::core::raw::{List, Map, RawValue};
pub use crate::json::parse::{
    ParseFailureCategory, categorize_error, hint_for_error, parse_json, parse_yaml,
};
