//! The Parse Facade: the one entry point application
//! code depends on.
//!
//! `bond-core` wires the pipeline -- lex (`bond-lexer`) -> parse
//! (`bond-parser`) -> build AST (`bond-ast`) -> semantic analysis and type
//! resolution (`bond-sema`) -- behind three constructors (`parse_file`,
//! `parse_string`, `parse_content`) and re-exports `bond-diff`'s
//! compatibility checker so a caller with two [`Ast`]s never needs to
//! depend on the component crates directly.

mod resolver;

pub use bond_ast::{BondFile, DeclArena, DeclId, Declaration};
pub use bond_common::cancel::CancellationToken;
pub use bond_common::diagnostics::{ErrorKind, ParseError};
pub use bond_common::import::{ImportResolver, NullImportResolver, ResolvedImport};
pub use bond_diff::{check_compatibility, ChangeCategory, SchemaChange};
pub use resolver::FileImportResolver;

use std::path::Path;

/// Options recognized by the facade.
///
/// This struct *is* the core's configuration surface -- there is no
/// `bond.toml` or environment-variable layer beneath it; a library core's
/// configuration is its API.
#[derive(Default, Clone)]
pub struct ParseOptions {
    /// When true, import statements are parsed but not loaded: semantic
    /// analysis and type resolution run best-effort against only the
    /// locally visible declarations. Used by compatibility diffing when
    /// loading imports would fail (e.g. an old git revision missing a
    /// sibling file that was added later).
    pub ignore_imports: bool,
    /// Cooperative cancellation, checked at import-loading boundaries --
    /// the only suspension points in an otherwise synchronous pipeline.
    pub cancellation: Option<CancellationToken>,
}

/// A fully built, type-resolved AST, together
/// with the declaration arena every `UserDefined` reference inside it
/// points into. Pass `ast.arena` to [`check_compatibility`] to diff two
/// compilations.
pub struct Ast {
    pub arena: DeclArena,
    pub root: BondFile,
}

/// The outcome of one [`parse_file`]/[`parse_string`]/[`parse_content`]
/// call.
///
/// `ast` is `None` when a lexical or grammar error prevented the pipeline
/// from producing anything trustworthy; it may be `Some` with `success ==
/// false` when everything parsed but semantic analysis or type resolution
/// found errors (a best-effort partial AST).
pub struct ParseResult {
    pub ast: Option<Ast>,
    pub errors: Vec<ParseError>,
    pub success: bool,
}

fn is_grammar_level(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::LexicalError | ErrorKind::SyntaxError)
}

/// Run the pipeline against already-loaded `content`, attributed to
/// `virtual_path`, resolving imports through `resolver`.
fn run(
    content: &str,
    virtual_path: Option<String>,
    resolver: &dyn ImportResolver,
    opts: &ParseOptions,
) -> ParseResult {
    let analyzed = bond_sema::analyze(
        content,
        virtual_path,
        resolver,
        opts.ignore_imports,
        opts.cancellation.as_ref(),
    );

    let halted = analyzed.cancelled || analyzed.errors.iter().any(|e| is_grammar_level(e.kind));
    let ast = if halted {
        None
    } else {
        Some(Ast { arena: analyzed.arena, root: analyzed.root })
    };

    ParseResult {
        success: !analyzed.cancelled && analyzed.errors.is_empty(),
        ast,
        errors: analyzed.errors,
    }
}

/// Parse, semantically analyze, and type-resolve the file at `path`,
/// following its imports relative to its own directory unless
/// `opts.ignore_imports` is set. Uses [`FileImportResolver`] unless
/// `resolver` overrides it.
pub fn parse_file(path: impl AsRef<Path>, resolver: Option<&dyn ImportResolver>, opts: ParseOptions) -> ParseResult {
    let path = path.as_ref();
    let default_resolver = FileImportResolver::new();
    let resolver = resolver.unwrap_or(&default_resolver);

    let canonical = match std::fs::canonicalize(path) {
        Ok(p) => p,
        Err(err) => {
            return ParseResult {
                ast: None,
                errors: vec![ParseError::new(
                    ErrorKind::ImportFailure,
                    format!("cannot read `{}`: {err}", path.display()),
                    0,
                    0,
                )],
                success: false,
            }
        }
    };

    let content = match std::fs::read_to_string(&canonical) {
        Ok(c) => c,
        Err(err) => {
            return ParseResult {
                ast: None,
                errors: vec![ParseError::new(
                    ErrorKind::ImportFailure,
                    format!("cannot read `{}`: {err}", canonical.display()),
                    0,
                    0,
                )
                .with_file(canonical.display().to_string())],
                success: false,
            }
        }
    };

    run(&content, Some(canonical.display().to_string()), resolver, &opts)
}

/// Parse, semantically analyze, and type-resolve `content` as an
/// in-memory compilation with no virtual path. Imports are not loaded
/// unless `resolver` is supplied explicitly (the default is
/// [`NullImportResolver`], since an in-memory file has no directory to
/// resolve relative imports against).
pub fn parse_string(content: &str, resolver: Option<&dyn ImportResolver>, opts: ParseOptions) -> ParseResult {
    let resolver = resolver.unwrap_or(&NullImportResolver);
    run(content, None, resolver, &opts)
}

/// Like [`parse_string`], but attributes `content` to `virtual_path` so
/// diagnostics and relative imports resolved by a caller-supplied
/// `resolver` can reference it.
pub fn parse_content(content: &str, virtual_path: &str, resolver: Option<&dyn ImportResolver>, opts: ParseOptions) -> ParseResult {
    let resolver = resolver.unwrap_or(&NullImportResolver);
    run(content, Some(virtual_path.to_string()), resolver, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_string_resolves_a_single_file_schema() {
        let result = parse_string(
            "namespace ns\nstruct Point { 0: required int32 x; 1: required int32 y; }\n",
            None,
            ParseOptions::default(),
        );
        assert!(result.success, "{:?}", result.errors);
        assert!(result.ast.is_some());
    }

    #[test]
    fn syntax_error_yields_null_ast() {
        let result = parse_string("namespace ns\nstruct {}\n", None, ParseOptions::default());
        assert!(!result.success);
        assert!(result.ast.is_none());
    }

    #[test]
    fn semantic_error_yields_partial_ast() {
        let result = parse_string("namespace ns\nstruct A { 1: Missing m; }\n", None, ParseOptions::default());
        assert!(!result.success);
        assert!(result.ast.is_some(), "a semantic-only failure should still return a best-effort AST");
    }

    #[test]
    fn ignore_imports_skips_unresolvable_import_statements() {
        let result = parse_string(
            "import \"missing.bond\";\nnamespace ns\nstruct A {}\n",
            None,
            ParseOptions { ignore_imports: true, ..Default::default() },
        );
        assert!(result.success, "{:?}", result.errors);
    }

    #[test]
    fn unresolved_import_is_reported_without_ignore_imports() {
        let result = parse_string(
            "import \"missing.bond\";\nnamespace ns\nstruct A {}\n",
            None,
            ParseOptions::default(),
        );
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::ImportFailure));
    }

    #[test]
    fn cancellation_before_import_loading_aborts_with_no_ast() {
        let token = CancellationToken::new();
        token.cancel();
        let result = parse_string(
            "import \"whatever.bond\";\nnamespace ns\nstruct A {}\n",
            None,
            ParseOptions { cancellation: Some(token), ..Default::default() },
        );
        assert!(!result.success);
        assert!(result.ast.is_none());
    }
}
