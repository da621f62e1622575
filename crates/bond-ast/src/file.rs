//! A built, single-file AST: imports, namespaces, and the declarations it
//! owns (by id, into the shared [`crate::ids::DeclArena`]).

use bond_common::span::Span;

use crate::decl::NamespaceRef;
use crate::ids::DeclId;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Import {
    /// The string literal's unescaped text: a path relative to this file.
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NamespaceDecl {
    pub reference: NamespaceRef,
    pub span: Span,
}

/// A parsed and built Bond source file: imports precede namespaces, which
/// precede declarations; exactly this relative order is enforced by the
/// grammar, not re-checked here.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BondFile {
    pub imports: Vec<Import>,
    pub namespaces: Vec<NamespaceDecl>,
    /// Declarations this file owns, in source order, as ids into the
    /// compilation's shared arena.
    pub declarations: Vec<DeclId>,
    /// Canonical path this file was loaded from, or `None` for an
    /// in-memory compilation with no virtual path.
    pub path: Option<String>,
}

impl BondFile {
    pub fn namespace_refs(&self) -> impl Iterator<Item = &NamespaceRef> {
        self.namespaces.iter().map(|n| &n.reference)
    }
}
