//! Purpose: Parse and resolve RFC 6901 JSON Pointers against a `RawValue` tree.
//! Exports: `JsonPointer`.
//! Role: Single implementation of pointer syntax used by `Data` and the CLI.
//! Invariants: The empty pointer addresses the root; any other pointer starts with `/`.
//! Invariants: `~1` decodes to `/` before `~0` decodes to `~`; any other `~` escape is invalid.
//! Invariants: Resolution returns shallow clones, so containers stay shared with the tree.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};
use crate::core::raw::RawValue;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(Error::new(ErrorKind::PointerSyntax)
                .with_message("JSON pointer must be empty or start with a \"/\"")
                .with_pointer(text));
        };
        let tokens = rest
            .split('/')
            .map(|raw| unescape_token(raw).map_err(|err| err.with_pointer(text)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Splits off the final reference token, returning the parent pointer.
    ///
    /// Returns `None` for the root pointer.
    pub fn split_last(&self) -> Option<(JsonPointer, &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((
            JsonPointer {
                tokens: parent.to_vec(),
            },
            last.as_str(),
        ))
    }

    /// Reads a reference token as a list index.
    ///
    /// Indexes are `0` or a decimal without leading zeros; `-` and signed
    /// forms never name an element.
    pub fn list_index(token: &str) -> Option<usize> {
        let valid = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && (token == "0" || !token.starts_with('0'));
        if !valid {
            return None;
        }
        token.parse().ok()
    }

    /// Walks the tree from `root`, returning the addressed value if present.
    pub fn resolve(&self, root: &RawValue) -> Option<RawValue> {
        let mut current = root.clone();
        for token in &self.tokens {
            let next = match &current {
                RawValue::Object(map) => map.borrow().get(token).cloned(),
                RawValue::List(items) => {
                    let index = Self::list_index(token)?;
                    items.borrow().get(index).cloned()
                }
                _ => None,
            };
            current = next?;
        }
        Some(current)
    }
}

impl FromStr for JsonPointer {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            f.write_str(&token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

fn unescape_token(raw: &str) -> Result<String, Error> {
    if !raw.contains('~') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            other => {
                let escape = other.map(|ch| format!("~{ch}")).unwrap_or_else(|| "~".to_string());
                return Err(Error::new(ErrorKind::PointerSyntax)
                    .with_message(format!("invalid escape `{escape}` in JSON pointer"))
                    .with_hint("Only `~0` (for `~`) and `~1` (for `/`) are valid escapes."));
            }
        }
    }
    Ok(out)
}
