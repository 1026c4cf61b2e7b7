//! Purpose: Provide the JSON and YAML decode entrypoints that produce `Data`.
//! Exports: `parse_json`, `parse_yaml`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json/serde_yaml usage details.
//! Invariants: YAML is normalized to JSON bytes and then decoded by the JSON path.
//! Invariants: Every decode failure is `ErrorKind::Parse` with the underlying error as source.
//! Notes: Categories are coarse on purpose; callers add domain context via `hint_for_error`.

use std::fmt;

use crate::core::data::Data;
use crate::core::error::{Error, ErrorKind};
use crate::core::raw::RawValue;
use crate::json::yaml;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    Yaml,
    Io,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Yaml => "yaml",
            ParseFailureCategory::Io => "io",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ParseFailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn parse_json(input: &str) -> Result<Data, Error> {
    parse_json_slice(input.as_bytes())
}

pub fn parse_yaml(input: &str) -> Result<Data, Error> {
    let bytes = yaml::to_json_bytes(input)?;
    parse_json_slice(&bytes)
}

fn parse_json_slice(input: &[u8]) -> Result<Data, Error> {
    serde_json::from_slice::<RawValue>(input)
        .map(Data::from_raw)
        .map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message(err.to_string())
                .with_source(err)
        })
}

pub fn categorize_error(err: &Error) -> ParseFailureCategory {
    if err.kind() != ErrorKind::Parse {
        return ParseFailureCategory::Unknown;
    }
    let Some(source) = std::error::Error::source(err) else {
        return ParseFailureCategory::Unknown;
    };
    if let Some(json) = source.downcast_ref::<serde_json::Error>() {
        return match json.classify() {
            serde_json::error::Category::Syntax => ParseFailureCategory::Syntax,
            serde_json::error::Category::Eof => ParseFailureCategory::Eof,
            serde_json::error::Category::Data => ParseFailureCategory::Data,
            serde_json::error::Category::Io => ParseFailureCategory::Io,
        };
    }
    if source.downcast_ref::<serde_yaml::Error>().is_some()
        || source.downcast_ref::<yaml::ConversionError>().is_some()
    {
        return ParseFailureCategory::Yaml;
    }
    ParseFailureCategory::Unknown
}

pub fn hint_for_error(err: &Error, context: &str) -> String {
    let category = categorize_error(err);
    let advice = match category {
        ParseFailureCategory::Syntax => "check for stray commas, unquoted keys, or mismatched brackets",
        ParseFailureCategory::Eof => "the input ended early; check for truncated content",
        ParseFailureCategory::Data => "a value could not be represented in the document model",
        ParseFailureCategory::Yaml => "the YAML is malformed or uses features JSON cannot express",
        ParseFailureCategory::Io => "the input could not be read",
        ParseFailureCategory::Unknown => "inspect the input for malformed content",
    };
    format!("parse category: {category}; context: {context}; {advice}")
}
