//! Purpose: Assertion adapters that judge a `Data` value in test suites.
//! Exports: `Matcher`, `HaveKey`, `HavePointer`, `BeOfType`, constructor fns, `expect`.
//! Role: Thin consumer of `Data`; uses only `has_key`, `has_pointer`, and type tests.
//! Invariants: Matchers never mutate the value they inspect.
//! Invariants: Matcher errors (bad pointer, wrong shape) fail the expectation either way.

use crate::core::data::Data;
use crate::core::error::{Error, ErrorKind};
use crate::core::kind::Kind;

const MAX_RENDERED_LEN: usize = 200;

pub trait Matcher {
    fn matches(&self, actual: &Data) -> Result<bool, Error>;
    fn failure_message(&self, actual: &Data) -> String;
    fn negated_failure_message(&self, actual: &Data) -> String;
}

#[derive(Clone, Debug)]
pub struct HaveKey {
    key: String,
}

pub fn have_key(key: impl Into<String>) -> HaveKey {
    HaveKey { key: key.into() }
}

impl Matcher for HaveKey {
    fn matches(&self, actual: &Data) -> Result<bool, Error> {
        if !actual.is_object() {
            return Err(Error::new(ErrorKind::WrongShape)
                .with_message(format!("not an object, so it can't have key `{}`", self.key)));
        }
        Ok(actual.has_key(&self.key))
    }

    fn failure_message(&self, actual: &Data) -> String {
        format!("expected '{}' to have key '{}'", render(actual), self.key)
    }

    fn negated_failure_message(&self, actual: &Data) -> String {
        format!("expected '{}' not to have key '{}'", render(actual), self.key)
    }
}

#[derive(Clone, Debug)]
pub struct HavePointer {
    pointer: String,
}

pub fn have_pointer(pointer: impl Into<String>) -> HavePointer {
    HavePointer {
        pointer: pointer.into(),
    }
}

impl Matcher for HavePointer {
    fn matches(&self, actual: &Data) -> Result<bool, Error> {
        actual.has_pointer(&self.pointer)
    }

    fn failure_message(&self, actual: &Data) -> String {
        format!(
            "expected '{}' to contain the pointer '{}'",
            render(actual),
            self.pointer
        )
    }

    fn negated_failure_message(&self, actual: &Data) -> String {
        format!(
            "expected '{}' not to contain the pointer '{}'",
            render(actual),
            self.pointer
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BeOfType {
    kind: Kind,
}

pub fn be_of_type(kind: Kind) -> BeOfType {
    BeOfType { kind }
}

pub fn be_an_object() -> BeOfType {
    be_of_type(Kind::Object)
}

pub fn be_a_string() -> BeOfType {
    be_of_type(Kind::String)
}

pub fn be_a_number() -> BeOfType {
    be_of_type(Kind::Number)
}

pub fn be_a_list() -> BeOfType {
    be_of_type(Kind::List)
}

pub fn be_a_bool() -> BeOfType {
    be_of_type(Kind::Bool)
}

pub fn be_null() -> BeOfType {
    be_of_type(Kind::Null)
}

impl Matcher for BeOfType {
    fn matches(&self, actual: &Data) -> Result<bool, Error> {
        Ok(actual.is_of_type(self.kind))
    }

    fn failure_message(&self, actual: &Data) -> String {
        match actual.kind() {
            Kind::Null => format!("expected a JSON {} -- got JSON null", self.kind),
            found => format!("expected a JSON {} -- got a JSON {found}", self.kind),
        }
    }

    fn negated_failure_message(&self, _actual: &Data) -> String {
        format!("got a JSON {}, but expected not to", self.kind)
    }
}

/// Starts an assertion on `actual`, in the style of `expect(x).to(matcher)`.
pub fn expect(actual: &Data) -> Expectation<'_> {
    Expectation { actual }
}

pub struct Expectation<'a> {
    actual: &'a Data,
}

impl Expectation<'_> {
    #[track_caller]
    pub fn to<M: Matcher>(&self, matcher: M) {
        match matcher.matches(self.actual) {
            Ok(true) => {}
            Ok(false) => panic!("{}", matcher.failure_message(self.actual)),
            Err(err) => panic!("matcher error: {err}"),
        }
    }

    #[track_caller]
    pub fn not_to<M: Matcher>(&self, matcher: M) {
        match matcher.matches(self.actual) {
            Ok(false) => {}
            Ok(true) => panic!("{}", matcher.negated_failure_message(self.actual)),
            Err(err) => panic!("matcher error: {err}"),
        }
    }
}

fn render(actual: &Data) -> String {
    let text = actual.to_string();
    if text.chars().count() <= MAX_RENDERED_LEN {
        return text;
    }
    let truncated: String = text.chars().take(MAX_RENDERED_LEN).collect();
    format!("{truncated}...")
}
