use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Parse,
    PointerSyntax,
    NotFound,
    WrongShape,
    OutOfBounds,
    Io,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal error",
            ErrorKind::Usage => "usage error",
            ErrorKind::Parse => "parse error",
            ErrorKind::PointerSyntax => "invalid pointer",
            ErrorKind::NotFound => "no such path",
            ErrorKind::WrongShape => "wrong shape",
            ErrorKind::OutOfBounds => "index out of bounds",
            ErrorKind::Io => "i/o error",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    pointer: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            pointer: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn pointer(&self) -> Option<&str> {
        self.pointer.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.label())?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(pointer) = &self.pointer {
            write!(f, " (pointer: {pointer:?})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Parse => 3,
        ErrorKind::PointerSyntax => 4,
        ErrorKind::NotFound => 5,
        ErrorKind::WrongShape => 6,
        ErrorKind::OutOfBounds => 7,
        ErrorKind::Io => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};
    use std::error::Error as _;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Parse, 3),
            (ErrorKind::PointerSyntax, 4),
            (ErrorKind::NotFound, 5),
            (ErrorKind::WrongShape, 6),
            (ErrorKind::OutOfBounds, 7),
            (ErrorKind::Io, 8),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn parse_errors_display_with_fixed_prefix() {
        let err = Error::new(ErrorKind::Parse).with_message("expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "parse error: expected value at line 1 column 1"
        );
    }

    #[test]
    fn pointer_is_rendered_after_message() {
        let err = Error::new(ErrorKind::NotFound)
            .with_message("nothing at this location")
            .with_pointer("/a/b");
        assert_eq!(
            err.to_string(),
            "no such path: nothing at this location (pointer: \"/a/b\")"
        );
        assert_eq!(err.pointer(), Some("/a/b"));
    }

    #[test]
    fn source_is_exposed_through_std_error() {
        let io = std::io::Error::other("disk on fire");
        let err = Error::new(ErrorKind::Io).with_source(io);
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "disk on fire");
    }
}
