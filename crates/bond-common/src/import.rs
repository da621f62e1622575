//! Import resolution contract shared by the semantic analyzer (which walks
//! the import graph) and the parse facade (which supplies the resolver).
//!
//! The core never touches a filesystem or network directly:
//! a caller-supplied [`ImportResolver`] turns a relative import path into
//! canonical content. The default, file-backed resolver lives in
//! `bond-core`, one layer up, since `bond-common` has no I/O dependency.

use crate::diagnostics::ParseError;

/// The result of resolving one `import` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImport {
    /// Absolute, resolver-defined path used to dedupe the import graph
    /// Opaque to the core beyond `Eq + Hash`.
    pub canonical_path: String,
    pub content: String,
}

/// Supplies file content for `import` statements.
///
/// Implementors decide what "relative to the enclosing file" means --
/// typically filesystem-relative, but a virtual in-memory
/// resolver for tests is equally valid.
pub trait ImportResolver {
    /// Resolve `import_path`, written in the file at `from_path` (`None`
    /// for the root file of an in-memory compilation with no virtual
    /// path). Failure is surfaced to the caller as an `ImportFailure`
    /// diagnostic, never a panic.
    fn resolve(&self, from_path: Option<&str>, import_path: &str) -> Result<ResolvedImport, ParseError>;
}

/// An `ImportResolver` that resolves nothing: every import fails. Used by
/// `ParseOptions::ignore_imports` consumers and by tests that only care
/// about a single file's local declarations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullImportResolver;

impl ImportResolver for NullImportResolver {
    fn resolve(&self, _from_path: Option<&str>, import_path: &str) -> Result<ResolvedImport, ParseError> {
        Err(ParseError::new(
            crate::diagnostics::ErrorKind::ImportFailure,
            format!("no import resolver configured; cannot load `{import_path}`"),
            0,
            0,
        ))
    }
}
