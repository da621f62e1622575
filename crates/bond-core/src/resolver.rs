//! The default, file-backed [`ImportResolver`]: resolves an
//! `import "…"` path relative to the directory of the file that wrote it,
//! or the current working directory for the root file of a `parse_file`
//! compilation with no enclosing file yet.
//!
//! This is the only place in the workspace that touches a filesystem --
//! `bond-sema` only ever walks the graph an [`ImportResolver`] describes
//! Files are fully buffered and closed before semantic analysis proceeds,
//! which `read_to_string` gives for free.

use std::path::{Path, PathBuf};

use bond_common::diagnostics::{ErrorKind, ParseError};
use bond_common::import::{ImportResolver, ResolvedImport};

/// Resolves imports against the filesystem, canonicalizing each resolved
/// path so the import graph's cycle/idempotency tracking sees one
/// canonical key per physical file regardless of how many
/// different relative paths reach it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImportResolver;

impl FileImportResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ImportResolver for FileImportResolver {
    fn resolve(&self, from_path: Option<&str>, import_path: &str) -> Result<ResolvedImport, ParseError> {
        let base_dir: PathBuf = match from_path {
            Some(p) => Path::new(p).parent().map(Path::to_path_buf).unwrap_or_default(),
            None => std::env::current_dir().map_err(|err| {
                ParseError::new(ErrorKind::ImportFailure, format!("cannot determine current directory: {err}"), 0, 0)
            })?,
        };

        let candidate = base_dir.join(import_path);
        let canonical = std::fs::canonicalize(&candidate).map_err(|err| {
            ParseError::new(ErrorKind::ImportFailure, format!("cannot resolve import `{import_path}`: {err}"), 0, 0)
        })?;

        let content = std::fs::read_to_string(&canonical).map_err(|err| {
            ParseError::new(ErrorKind::ImportFailure, format!("cannot read `{}`: {err}", canonical.display()), 0, 0)
        })?;

        Ok(ResolvedImport {
            canonical_path: canonical.display().to_string(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_a_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("root.bond"), "import \"other.bond\";\n").unwrap();
        std::fs::write(dir.path().join("other.bond"), "namespace ns\nstruct A {}\n").unwrap();

        let resolver = FileImportResolver::new();
        let root_path = dir.path().join("root.bond").display().to_string();
        let resolved = resolver.resolve(Some(&root_path), "other.bond").unwrap();
        assert!(resolved.content.contains("struct A"));
    }

    #[test]
    fn missing_file_is_an_import_failure() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FileImportResolver::new();
        let root_path = dir.path().join("root.bond").display().to_string();
        let err = resolver.resolve(Some(&root_path), "missing.bond").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ImportFailure);
    }
}
