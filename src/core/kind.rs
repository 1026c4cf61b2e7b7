//! Purpose: Name the six shapes a dynamic value can take.
//! Exports: `Kind`.
//! Role: Typed replacement for string tag dispatch in type tests and matchers.
//! Invariants: Tags are exactly `object`, `string`, `number`, `list`, `null`, `bool`.
//! Invariants: Parsing an unknown tag is a usage error, never a silent fallback.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    Object,
    String,
    Number,
    List,
    Null,
    Bool,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Object,
        Kind::String,
        Kind::Number,
        Kind::List,
        Kind::Null,
        Kind::Bool,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::List => "list",
            Kind::Null => "null",
            Kind::Bool => "bool",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("unrecognized type tag `{tag}`"))
                    .with_hint("Use one of: object, string, number, list, null, bool.")
            })
    }
}
