//! Semantic analyzer: import loading, the symbol
//! table, per-declaration validation, and multi-pass type resolution.
//!
//! This crate never touches a filesystem itself -- callers (`bond-core`)
//! supply an [`bond_common::import::ImportResolver`]; `bond-sema` only
//! walks the graph it describes.

mod loader;
mod resolve;
mod symtab;
mod validate;

use rustc_hash::FxHashMap;

use bond_ast::{BondFile, DeclArena};
use bond_common::cancel::CancellationToken;
use bond_common::diagnostics::{ErrorKind, ParseError};
use bond_common::import::ImportResolver;
use bond_common::span::{LineIndex, Span};

pub use symtab::{AliasScopes, SymbolTable};

/// Working state threaded through validation and resolution: the shared
/// declaration arena plus the symbol tables the loader built.
pub struct Analysis {
    pub arena: DeclArena,
    pub symbols: SymbolTable,
    pub aliases: AliasScopes,
    pub errors: Vec<ParseError>,
    pub line_indices: FxHashMap<Option<String>, LineIndex>,
}

impl Analysis {
    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span, file_path: Option<&str>) {
        let (line, column) = file_path
            .map(str::to_string)
            .and_then(|p| self.line_indices.get(&Some(p)))
            .or_else(|| self.line_indices.get(&None))
            .map(|idx| idx.line_col(span.start))
            .unwrap_or((0, 0));
        let mut err = ParseError::new(kind, message, line, column);
        if let Some(path) = file_path {
            err = err.with_file(path);
        }
        self.errors.push(err);
    }
}

/// The outcome of a full semantic analysis run, handed to `bond-core`'s
/// parse facade to turn into its own result shape.
pub struct AnalyzeResult {
    pub arena: DeclArena,
    pub root: BondFile,
    pub errors: Vec<ParseError>,
    pub cancelled: bool,
}

impl AnalyzeResult {
    pub fn success(&self) -> bool {
        !self.cancelled && self.errors.is_empty()
    }
}

/// Load `source` (and, unless `ignore_imports`, everything it transitively
/// imports through `resolver`), register every declaration, validate it,
/// and resolve its types. Mirrors `bond-parser::parse`'s shape: callers
/// always get back an arena and a root file, even when `errors` is
/// non-empty.
pub fn analyze(
    source: &str,
    virtual_path: Option<String>,
    resolver: &dyn ImportResolver,
    ignore_imports: bool,
    cancellation: Option<&CancellationToken>,
) -> AnalyzeResult {
    let mut loader = loader::Loader::new(resolver, ignore_imports, cancellation);
    let root = loader.load_root(source, virtual_path);
    let cancelled = loader.cancelled();

    let mut analysis = Analysis {
        arena: loader.arena,
        symbols: loader.symbols,
        aliases: loader.aliases,
        errors: loader.errors,
        line_indices: loader.line_indices,
    };

    if !cancelled {
        validate::run(&mut analysis);
        resolve::run(&mut analysis);
    }

    AnalyzeResult {
        arena: analysis.arena,
        root,
        errors: analysis.errors,
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_common::import::NullImportResolver;
    use bond_ast::{Declaration, Type};

    fn analyze_str(src: &str) -> AnalyzeResult {
        analyze(src, None, &NullImportResolver, false, None)
    }

    #[test]
    fn resolves_struct_reference_between_declarations() {
        let result = analyze_str("namespace ns\nstruct A { 1: B b; }\nstruct B { 1: int32 x; }\n");
        assert!(result.success(), "{:?}", result.errors);
        let a = result.root.declarations[0];
        let Declaration::Struct(a) = result.arena.get(a) else { panic!() };
        assert!(matches!(a.fields[0].ty, Type::UserDefined(..)));
    }

    #[test]
    fn unresolved_type_is_reported() {
        let result = analyze_str("namespace ns\nstruct A { 1: Missing b; }\n");
        assert!(!result.success());
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::UnresolvedType));
    }

    #[test]
    fn self_reference_resolves_through_synthesized_forward() {
        let result = analyze_str("namespace ns\nstruct Node { 1: optional Node next; }\n");
        assert!(result.success(), "{:?}", result.errors);
        let id = result.root.declarations[0];
        let Declaration::Struct(node) = result.arena.get(id) else { panic!() };
        match &node.fields[0].ty {
            Type::UserDefined(fwd_id, _) => {
                assert!(matches!(result.arena.get(*fwd_id), Declaration::Forward(f) if f.synthesized));
            }
            other => panic!("expected UserDefined forward, got {other:?}"),
        }
    }

    #[test]
    fn alias_chain_resolves_to_alias_declaration() {
        let result = analyze_str("namespace ns\nusing Id = int64;\nstruct A { 1: Id id; }\n");
        assert!(result.success(), "{:?}", result.errors);
        let a = result.root.declarations[1];
        let Declaration::Struct(a) = result.arena.get(a) else { panic!() };
        assert!(matches!(a.fields[0].ty, Type::UserDefined(..)));
    }

    #[test]
    fn duplicate_declaration_is_rejected() {
        let result = analyze_str("namespace ns\nstruct A {}\nstruct A {}\n");
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::DuplicateDeclaration));
    }

    #[test]
    fn forward_and_struct_reconcile() {
        let result = analyze_str("namespace ns\nstruct A;\nstruct B { 1: A a; }\nstruct A { 1: int32 x; }\n");
        assert!(!result.errors.iter().any(|e| e.kind == ErrorKind::DuplicateDeclaration), "{:?}", result.errors);
    }

    #[test]
    fn enum_without_default_requires_one() {
        let result = analyze_str("namespace ns\nenum Color { Red, Blue }\nstruct A { 1: Color c; }\n");
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::RequiredDefault));
    }

    #[test]
    fn set_with_invalid_key_type_is_rejected() {
        let result = analyze_str("namespace ns\nstruct Bad {}\nstruct A { 1: set<Bad> s; }\n");
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::InvalidKeyType));
    }
}
