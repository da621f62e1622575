//! The shared diagnostic record.
//!
//! Every failure in the pipeline -- lexical, syntactic, or semantic -- is
//! reported through one `ParseError` shape. There is no separate exception
//! hierarchy per stage; `ErrorKind` distinguishes the cause, but callers
//! only ever need to handle one record type.

use std::fmt;

use serde::Serialize;

/// A single diagnostic produced anywhere in the pipeline.
///
/// `file_path` is `None` for in-memory compilations that were not given a
/// virtual path, or for errors raised before any file context exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub file_path: Option<String>,
    pub line: u32,
    pub column: u32,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            file_path: None,
            line,
            column,
            kind,
        }
    }

    /// Attach (or overwrite) the file path this error belongs to.
    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_path {
            Some(path) => write!(f, "{path}:{}:{}: {}", self.line, self.column, self.message),
            None => write!(f, "{}:{}: {}", self.line, self.column, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// The cause of a `ParseError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    LexicalError,
    SyntaxError,
    DuplicateDeclaration,
    DuplicateField,
    DuplicateOrdinal,
    DuplicateMethod,
    DuplicateConstant,
    UnresolvedType,
    UnresolvedViewField,
    InvalidDefault,
    RequiredDefault,
    InvalidKeyType,
    InvalidStructDefault,
    IllegalInheritance,
    IllegalEventInput,
    ImportFailure,
    ResolutionDivergence,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::LexicalError => "LexicalError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::DuplicateDeclaration => "DuplicateDeclaration",
            ErrorKind::DuplicateField => "DuplicateField",
            ErrorKind::DuplicateOrdinal => "DuplicateOrdinal",
            ErrorKind::DuplicateMethod => "DuplicateMethod",
            ErrorKind::DuplicateConstant => "DuplicateConstant",
            ErrorKind::UnresolvedType => "UnresolvedType",
            ErrorKind::UnresolvedViewField => "UnresolvedViewField",
            ErrorKind::InvalidDefault => "InvalidDefault",
            ErrorKind::RequiredDefault => "RequiredDefault",
            ErrorKind::InvalidKeyType => "InvalidKeyType",
            ErrorKind::InvalidStructDefault => "InvalidStructDefault",
            ErrorKind::IllegalInheritance => "IllegalInheritance",
            ErrorKind::IllegalEventInput => "IllegalEventInput",
            ErrorKind::ImportFailure => "ImportFailure",
            ErrorKind::ResolutionDivergence => "ResolutionDivergence",
            ErrorKind::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_and_file() {
        let err = ParseError::new(ErrorKind::UnresolvedType, "no such type `Foo`", 3, 7)
            .with_file("a.bond");
        assert_eq!(err.to_string(), "a.bond:3:7: no such type `Foo`");
    }

    #[test]
    fn display_without_file() {
        let err = ParseError::new(ErrorKind::SyntaxError, "unexpected token", 1, 1);
        assert_eq!(err.to_string(), "1:1: unexpected token");
    }
}
