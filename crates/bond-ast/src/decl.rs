//! Declarations: structs, enums, services, aliases, and forwards.

use bond_common::span::Span;

use crate::default::Default;
use crate::ty::Type;

/// A target-language tag on a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Lang {
    Cpp,
    Cs,
    Java,
}

impl Lang {
    pub fn from_tag(tag: &str) -> Option<Lang> {
        match tag {
            "cpp" => Some(Lang::Cpp),
            "cs" | "csharp" => Some(Lang::Cs),
            "java" => Some(Lang::Java),
            _ => None,
        }
    }
}

/// A namespace a declaration belongs to: a dotted name, optionally tagged
/// with a target language. A file may declare the same dotted name more
/// than once with different language tags; every declaration
/// in the file belongs to *all* of the file's namespaces.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NamespaceRef {
    pub name: String,
    pub lang: Option<Lang>,
}

/// Whether two namespace references identify the same namespace for symbol
/// lookup purposes: a language-qualified namespace on one
/// side matches an unqualified one on the other; if both are qualified,
/// the tags must agree.
pub fn namespaces_match(a: &NamespaceRef, b: &NamespaceRef) -> bool {
    if a.name != b.name {
        return false;
    }
    match (a.lang, b.lang) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Modifier {
    Optional,
    Required,
    RequiredOptional,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Field {
    pub ordinal: u16,
    pub modifier: Modifier,
    pub ty: Type,
    pub name: String,
    pub default: Option<Default>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EnumConstant {
    pub name: String,
    /// The literal value written in source, if any.
    pub explicit_value: Option<i64>,
    /// `previous + 1` (starting at 0) when `explicit_value` is `None`.
    pub effective_value: i64,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// A method's result or input shape: either nothing, a single
/// user struct, or a stream of a user struct.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum MethodType {
    Void,
    Unary(Type),
    Streaming(Type),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum MethodKind {
    Function { result: MethodType, input: MethodType },
    /// An event has no result; the input may not be `Streaming`.
    Event { input: MethodType },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Method {
    pub name: String,
    pub kind: MethodKind,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// The base struct name and projected field list of a `view_of` clause
/// Resolved against the base struct's fields by semantic
/// analysis; until resolved, a
/// view's `StructDecl::fields` is empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ViewOf {
    pub base_name: String,
    pub field_names: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StructDecl {
    pub name: String,
    pub namespaces: Vec<NamespaceRef>,
    pub type_params: Vec<String>,
    pub base: Option<Type>,
    pub fields: Vec<Field>,
    pub attributes: Vec<Attribute>,
    pub view_of: Option<ViewOf>,
    pub span: Span,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub namespaces: Vec<NamespaceRef>,
    pub constants: Vec<EnumConstant>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ServiceDecl {
    pub name: String,
    pub namespaces: Vec<NamespaceRef>,
    pub type_params: Vec<String>,
    pub base: Option<Type>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AliasDecl {
    pub name: String,
    pub namespaces: Vec<NamespaceRef>,
    pub type_params: Vec<String>,
    pub target: Type,
    pub span: Span,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ForwardDecl {
    pub name: String,
    pub namespaces: Vec<NamespaceRef>,
    pub type_params: Vec<String>,
    pub span: Span,
    pub file_path: Option<String>,
    /// `true` for a forward synthesized by the resolver to break a
    /// self-reference cycle, as opposed to one written
    /// directly in source.
    pub synthesized: bool,
}

/// Any declaration. A closed sum; every consumer is expected to
/// match exhaustively rather than add an open hierarchy.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Declaration {
    Struct(StructDecl),
    Enum(EnumDecl),
    Service(ServiceDecl),
    Alias(AliasDecl),
    Forward(ForwardDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Struct(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Service(d) => &d.name,
            Declaration::Alias(d) => &d.name,
            Declaration::Forward(d) => &d.name,
        }
    }

    pub fn namespaces(&self) -> &[NamespaceRef] {
        match self {
            Declaration::Struct(d) => &d.namespaces,
            Declaration::Enum(d) => &d.namespaces,
            Declaration::Service(d) => &d.namespaces,
            Declaration::Alias(d) => &d.namespaces,
            Declaration::Forward(d) => &d.namespaces,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Struct(d) => d.span,
            Declaration::Enum(d) => d.span,
            Declaration::Service(d) => d.span,
            Declaration::Alias(d) => d.span,
            Declaration::Forward(d) => d.span,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            Declaration::Struct(d) => d.file_path.as_deref(),
            Declaration::Enum(d) => d.file_path.as_deref(),
            Declaration::Service(d) => d.file_path.as_deref(),
            Declaration::Alias(d) => d.file_path.as_deref(),
            Declaration::Forward(d) => d.file_path.as_deref(),
        }
    }

    pub fn type_params(&self) -> &[String] {
        match self {
            Declaration::Struct(d) => &d.type_params,
            Declaration::Service(d) => &d.type_params,
            Declaration::Alias(d) => &d.type_params,
            Declaration::Forward(d) => &d.type_params,
            Declaration::Enum(_) => &[],
        }
    }

    /// A dotted "namespace.Name" string using the declaration's first
    /// namespace, for display purposes (diagnostics, `SchemaChange`
    /// locations). Symbol-table lookups use [`namespaces_match`] directly
    /// rather than this string, since a declaration may live in more than
    /// one namespace.
    pub fn qualified_name(&self) -> String {
        match self.namespaces().first() {
            Some(ns) => format!("{}.{}", ns.name, self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Struct(_) => "struct",
            Declaration::Enum(_) => "enum",
            Declaration::Service(_) => "service",
            Declaration::Alias(_) => "alias",
            Declaration::Forward(_) => "forward",
        }
    }
}
