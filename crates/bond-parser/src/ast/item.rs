//! Typed AST nodes for Bond IDL declarations, fields, methods and types.
//!
//! Covers: SourceFile, Import, Namespace, QualifiedName, AttrList, Attr,
//! ForwardDecl, AliasDecl, StructDecl, ViewOfClause, ViewFieldList,
//! StructBody, FieldDecl, DefaultValue, EnumDecl, EnumConstant,
//! ServiceDecl, MethodDecl, MethodParam, TypeParamList, TypeParam,
//! TypeRef, TypeArgList, MetaTypeRef.

use crate::ast::{ast_node, child_node, child_nodes, child_token, child_tokens, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        child_nodes(&self.syntax)
    }

    /// All top-level declarations, in source order.
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.syntax.children().filter_map(Declaration::cast)
    }
}

// ── Import / Namespace ───────────────────────────────────────────────────

ast_node!(Import, IMPORT_DECL);

impl Import {
    pub fn path_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::STRING_LITERAL)
    }
}

ast_node!(Namespace, NAMESPACE_DECL);

impl Namespace {
    /// The language tag token (`cpp`/`cs`/`csharp`/`java`), if one was
    /// written before the namespace name. Emitted as a bare `IDENT` token
    /// directly under `NAMESPACE_DECL`, distinct from the name's own
    /// `IDENT` tokens which live inside the nested `QUALIFIED_NAME`.
    pub fn lang_tag(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }
}

ast_node!(QualifiedName, QUALIFIED_NAME);

impl QualifiedName {
    pub fn segments(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        child_tokens(&self.syntax, SyntaxKind::IDENT)
    }

    /// The dotted text of the name, e.g. `"a.b.c"`.
    pub fn text(&self) -> String {
        self.segments()
            .map(|t| t.text().to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

// ── Attributes ───────────────────────────────────────────────────────────

ast_node!(AttrList, ATTR_LIST);

impl AttrList {
    pub fn attrs(&self) -> impl Iterator<Item = Attr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Attr, ATTR);

impl Attr {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    pub fn value_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::STRING_LITERAL)
    }
}

/// Find the `ATTR_LIST` immediately preceding `node`'s content within a
/// shared parent, if the grammar attached one.
pub fn attrs_of(node: &SyntaxNode) -> Option<AttrList> {
    child_node(node)
}

// ── Declaration enum ─────────────────────────────────────────────────────

/// Any top-level declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Forward(ForwardDecl),
    Alias(AliasDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Service(ServiceDecl),
}

impl Declaration {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FORWARD_DECL => ForwardDecl::cast(node).map(Declaration::Forward),
            SyntaxKind::ALIAS_DECL => AliasDecl::cast(node).map(Declaration::Alias),
            SyntaxKind::STRUCT_DECL => StructDecl::cast(node).map(Declaration::Struct),
            SyntaxKind::ENUM_DECL => EnumDecl::cast(node).map(Declaration::Enum),
            SyntaxKind::SERVICE_DECL => ServiceDecl::cast(node).map(Declaration::Service),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Declaration::Forward(d) => d.syntax(),
            Declaration::Alias(d) => d.syntax(),
            Declaration::Struct(d) => d.syntax(),
            Declaration::Enum(d) => d.syntax(),
            Declaration::Service(d) => d.syntax(),
        }
    }
}

// ── Forward / Alias ───────────────────────────────────────────────────────

ast_node!(ForwardDecl, FORWARD_DECL);

impl ForwardDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }
}

ast_node!(AliasDecl, ALIAS_DECL);

impl AliasDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn target(&self) -> Option<TypeRef> {
        child_node(&self.syntax)
    }
}

// ── Struct ───────────────────────────────────────────────────────────────

ast_node!(StructDecl, STRUCT_DECL);

impl StructDecl {
    pub fn attrs(&self) -> Option<AttrList> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    /// The base-type clause (`struct S : Base { ... }`), if present. This
    /// is the first `TYPE_REF` child, distinct from field types which
    /// live inside `STRUCT_BODY`.
    pub fn base(&self) -> Option<TypeRef> {
        self.syntax
            .children()
            .take_while(|n| n.kind() != SyntaxKind::STRUCT_BODY)
            .find_map(TypeRef::cast)
    }

    pub fn view_of(&self) -> Option<ViewOfClause> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<StructBody> {
        child_node(&self.syntax)
    }
}

ast_node!(ViewOfClause, VIEW_OF_CLAUSE);

impl ViewOfClause {
    pub fn base(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    pub fn field_names(&self) -> Vec<SyntaxToken> {
        child_node::<ViewFieldList>(&self.syntax)
            .map(|list| list.names().collect())
            .unwrap_or_default()
    }
}

ast_node!(ViewFieldList, VIEW_FIELD_LIST);

impl ViewFieldList {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        child_tokens(&self.syntax, SyntaxKind::IDENT)
    }
}

ast_node!(StructBody, STRUCT_BODY);

impl StructBody {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn attrs(&self) -> Option<AttrList> {
        child_node(&self.syntax)
    }

    pub fn ordinal_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::INT_LITERAL)
    }

    pub fn modifier(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::OPTIONAL_KW
                        | SyntaxKind::REQUIRED_KW
                        | SyntaxKind::REQUIRED_OPTIONAL_KW
                )
            })
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.syntax.children().find_map(FieldType::cast)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_tokens(&self.syntax, SyntaxKind::IDENT).last()
    }

    pub fn default(&self) -> Option<DefaultValue> {
        child_node(&self.syntax)
    }
}

/// A field's type: either an ordinary type reference or a meta type.
#[derive(Debug, Clone)]
pub enum FieldType {
    Type(TypeRef),
    Meta(MetaTypeRef),
}

impl FieldType {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TYPE_REF => TypeRef::cast(node).map(FieldType::Type),
            SyntaxKind::META_TYPE_REF => MetaTypeRef::cast(node).map(FieldType::Meta),
            _ => None,
        }
    }
}

ast_node!(MetaTypeRef, META_TYPE_REF);

impl MetaTypeRef {
    /// `name` or `full_name`.
    pub fn which(&self) -> Option<SyntaxToken> {
        child_tokens(&self.syntax, SyntaxKind::IDENT).last()
    }
}

ast_node!(DefaultValue, DEFAULT_VALUE);

impl DefaultValue {
    /// All tokens making up the default (an optional sign token followed
    /// by the literal, or a bare literal/identifier/`nothing`).
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
    }
}

// ── Enum ─────────────────────────────────────────────────────────────────

ast_node!(EnumDecl, ENUM_DECL);

impl EnumDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn constants(&self) -> impl Iterator<Item = EnumConstant> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(EnumConstant, ENUM_CONSTANT);

impl EnumConstant {
    pub fn attrs(&self) -> Option<AttrList> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// `true` if an explicit `-` preceded the value literal.
    pub fn is_negative(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::MINUS)
    }

    pub fn value_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::INT_LITERAL)
    }
}

// ── Service ──────────────────────────────────────────────────────────────

ast_node!(ServiceDecl, SERVICE_DECL);

impl ServiceDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    /// The base service's name (`service S : Base { ... }`), if present.
    /// Unlike a struct base, this isn't wrapped in a `TYPE_REF`: the
    /// grammar parses it as a bare `qualified_name type_args?` pair
    /// directly under `SERVICE_DECL`. Found as the first `QUALIFIED_NAME`
    /// child before any method.
    pub fn base(&self) -> Option<QualifiedName> {
        self.syntax
            .children()
            .take_while(|n| n.kind() != SyntaxKind::METHOD_DECL)
            .find_map(QualifiedName::cast)
    }

    /// The base service's actual type arguments, if the base is generic.
    pub fn base_type_args(&self) -> Option<TypeArgList> {
        self.syntax
            .children()
            .take_while(|n| n.kind() != SyntaxKind::METHOD_DECL)
            .find_map(TypeArgList::cast)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    pub fn attrs(&self) -> Option<AttrList> {
        child_node(&self.syntax)
    }

    /// `true` for an event method (`nothing Name(...)`, no response).
    pub fn is_event(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .take_while(|e| {
                e.as_token()
                    .map(|t| t.kind() != SyntaxKind::IDENT)
                    .unwrap_or(true)
            })
            .any(|e| e.as_token().is_some_and(|t| t.kind() == SyntaxKind::NOTHING_KW))
    }

    /// `true` if the result type is prefixed with `stream`.
    pub fn is_streaming(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::STREAM_KW)
    }

    pub fn result_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn param(&self) -> Option<MethodParam> {
        child_node(&self.syntax)
    }
}

ast_node!(MethodParam, METHOD_PARAM);

impl MethodParam {
    pub fn is_streaming(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::STREAM_KW)
    }

    pub fn param_type(&self) -> Option<TypeRef> {
        child_node(&self.syntax)
    }
}

// ── Type params / args / refs ────────────────────────────────────────────

ast_node!(TypeParamList, TYPE_PARAM_LIST);

impl TypeParamList {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }
}

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    /// The leading keyword token, if this is a primitive or container type.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .next()
    }

    /// The qualified name, if this is a user-defined type reference.
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    pub fn type_args(&self) -> Option<TypeArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeArgList, TYPE_ARG_LIST);

/// One type argument: either a nested type or a bare integer literal.
#[derive(Debug, Clone)]
pub enum TypeArg {
    Type(TypeRef),
    IntLiteral(SyntaxToken),
}

impl TypeArgList {
    pub fn args(&self) -> impl Iterator<Item = TypeArg> + '_ {
        self.syntax.children_with_tokens().filter_map(|e| match e {
            rowan::NodeOrToken::Node(n) => TypeRef::cast(n).map(TypeArg::Type),
            rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::INT_LITERAL => {
                Some(TypeArg::IntLiteral(t))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn walks_struct_field_and_default() {
        let result = parse("namespace ns\nstruct S { 0: optional int32 x = -5; }\n");
        assert!(result.ok(), "{:?}", result.errors());
        let file = SourceFile::cast(result.syntax()).unwrap();
        let decl = file.declarations().next().unwrap();
        let Declaration::Struct(s) = decl else {
            panic!("expected struct")
        };
        let field = s.body().unwrap().fields().next().unwrap();
        assert_eq!(field.name().unwrap().text(), "x");
        let default = field.default().unwrap();
        let texts: Vec<_> = default.tokens().map(|t| t.text().to_string()).collect();
        assert_eq!(texts, vec!["-", "5"]);
    }

    #[test]
    fn walks_enum_constants() {
        let result = parse("namespace ns\nenum E { A = -1, B }\n");
        assert!(result.ok(), "{:?}", result.errors());
        let file = SourceFile::cast(result.syntax()).unwrap();
        let decl = file.declarations().next().unwrap();
        let Declaration::Enum(e) = decl else {
            panic!("expected enum")
        };
        let constants: Vec<_> = e.constants().collect();
        assert_eq!(constants.len(), 2);
        assert!(constants[0].is_negative());
        assert!(!constants[1].is_negative());
    }

    #[test]
    fn walks_view_of_fields() {
        let result = parse(
            "namespace ns\nstruct Base { 0: required int32 a; 1: required int32 b; }\nstruct V view_of Base { a, b }\n",
        );
        assert!(result.ok(), "{:?}", result.errors());
        let file = SourceFile::cast(result.syntax()).unwrap();
        let view = file
            .declarations()
            .find_map(|d| match d {
                Declaration::Struct(s) if s.view_of().is_some() => Some(s),
                _ => None,
            })
            .unwrap();
        let clause = view.view_of().unwrap();
        assert_eq!(clause.base().unwrap().text(), "Base");
        let names: Vec<_> = clause.field_names().map(|t| t.text().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
