//! The AST Builder: CST -> typed, owned AST.
//!
//! Declarations are allocated into the caller's [`DeclArena`] as they're
//! built, so a multi-file compilation (driven by `bond-sema`) can build
//! each imported file against the same shared arena. Every named type
//! reference this stage can't resolve locally (everything except generic
//! parameters of the enclosing declaration) becomes `Type::UnresolvedUserType`;
//! resolving those against the symbol table is semantic analysis's job.

use std::collections::HashSet;

use bond_common::diagnostics::{ErrorKind, ParseError};
use bond_common::span::{LineIndex, Span};

use bond_parser::ast::item::{
    self, AliasDecl as PAlias, Declaration as PDecl, DefaultValue, EnumConstant as PEnumConstant,
    EnumDecl as PEnum, FieldDecl, FieldType, ForwardDecl as PForward, MethodDecl, MethodParam,
    ServiceDecl as PService, SourceFile, StructDecl as PStruct, TypeArg, TypeRef,
};
use bond_parser::ast::AstNode;
use bond_parser::{Parse, SyntaxKind};

use crate::decl::{
    Attribute, Declaration, EnumConstant, EnumDecl, Field, ForwardDecl, Lang, Method, MethodKind,
    MethodType, Modifier, NamespaceRef, ServiceDecl, StructDecl, ViewOf,
};
use crate::default::Default as Default_;
use crate::file::{BondFile, Import, NamespaceDecl};
use crate::ids::{DeclArena, DeclId};
use crate::literals::{parse_float_literal, parse_int_literal, parse_ordinal, unescape_string};
use crate::ty::Type;

/// Generic type-parameter names currently in scope while building one
/// declaration's types (its own parameter list). Bond has no nested
/// generic scopes: each declaration's scope is independent.
type GenericScope = HashSet<String>;

struct Builder<'a> {
    source: &'a str,
    file_path: Option<&'a str>,
    line_index: LineIndex,
    errors: Vec<ParseError>,
}

impl<'a> Builder<'a> {
    fn error(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        let (line, column) = self.line_index.line_col(span.start);
        let mut err = ParseError::new(kind, message, line, column);
        if let Some(path) = self.file_path {
            err = err.with_file(path);
        }
        self.errors.push(err);
    }
}

/// Build a single file's AST against `arena`, allocating its declarations
/// into it. `file_path` is attached to every declaration and every error
/// raised while building.
pub fn build_file(
    parse: &Parse,
    source: &str,
    file_path: Option<&str>,
    arena: &mut DeclArena,
) -> (BondFile, Vec<ParseError>) {
    let mut b = Builder {
        source,
        file_path,
        line_index: LineIndex::new(source),
        errors: Vec::new(),
    };

    let root = SourceFile::cast(parse.syntax()).expect("parse produced a SOURCE_FILE root");

    let imports = root
        .imports()
        .filter_map(|imp| {
            let tok = imp.path_token()?;
            Some(Import {
                path: unescape_string(tok.text()),
                span: node_span(imp.syntax()),
            })
        })
        .collect();

    let namespaces = root
        .namespaces()
        .map(|ns| {
            let lang = ns.lang_tag().and_then(|t| Lang::from_tag(t.text()));
            let name = ns.name().map(|n| n.text()).unwrap_or_default();
            NamespaceDecl {
                reference: NamespaceRef { name, lang },
                span: node_span(ns.syntax()),
            }
        })
        .collect();

    let file_namespaces: Vec<NamespaceRef> = root
        .namespaces()
        .map(|ns| NamespaceRef {
            name: ns.name().map(|n| n.text()).unwrap_or_default(),
            lang: ns.lang_tag().and_then(|t| Lang::from_tag(t.text())),
        })
        .collect();

    let mut declarations = Vec::new();
    for decl in root.declarations() {
        let id = b.build_declaration(decl, &file_namespaces, arena);
        declarations.push(id);
    }

    (
        BondFile {
            imports,
            namespaces,
            declarations,
            path: file_path.map(str::to_string),
        },
        b.errors,
    )
}

fn node_span(node: &bond_parser::SyntaxNode) -> Span {
    let r = node.text_range();
    Span::new(r.start().into(), r.end().into())
}

fn token_span(tok: &bond_parser::SyntaxToken) -> Span {
    let r = tok.text_range();
    Span::new(r.start().into(), r.end().into())
}

impl<'a> Builder<'a> {
    fn build_attrs(&mut self, attrs: Option<item::AttrList>) -> Vec<Attribute> {
        let Some(attrs) = attrs else {
            return Vec::new();
        };
        attrs
            .attrs()
            .map(|a| Attribute {
                name: a.name().map(|n| n.text()).unwrap_or_default(),
                value: a
                    .value_token()
                    .map(|t| unescape_string(t.text()))
                    .unwrap_or_default(),
                span: node_span(a.syntax()),
            })
            .collect()
    }

    fn build_declaration(
        &mut self,
        decl: PDecl,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        match decl {
            PDecl::Forward(f) => self.build_forward(f, namespaces, arena),
            PDecl::Alias(a) => self.build_alias(a, namespaces, arena),
            PDecl::Struct(s) => self.build_struct(s, namespaces, arena),
            PDecl::Enum(e) => self.build_enum(e, namespaces, arena),
            PDecl::Service(s) => self.build_service(s, namespaces, arena),
        }
    }

    fn type_param_names(params: Option<item::TypeParamList>) -> Vec<String> {
        params
            .map(|p| p.params().filter_map(|tp| tp.name().map(|t| t.text().to_string())).collect())
            .unwrap_or_default()
    }

    fn build_forward(
        &mut self,
        f: PForward,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        let type_params = Self::type_param_names(f.type_params());
        arena.alloc(Declaration::Forward(ForwardDecl {
            name: f.name().map(|t| t.text().to_string()).unwrap_or_default(),
            namespaces: namespaces.to_vec(),
            type_params,
            span: node_span(f.syntax()),
            file_path: self.file_path.map(str::to_string),
            synthesized: false,
        }))
    }

    fn build_alias(
        &mut self,
        a: PAlias,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        let type_params = Self::type_param_names(a.type_params());
        let scope: GenericScope = type_params.iter().cloned().collect();
        let target = a
            .target()
            .map(|t| self.build_type(&t, &scope))
            .unwrap_or(Type::UnresolvedUserType(String::new(), Vec::new()));
        arena.alloc(Declaration::Alias(crate::decl::AliasDecl {
            name: a.name().map(|t| t.text().to_string()).unwrap_or_default(),
            namespaces: namespaces.to_vec(),
            type_params,
            target,
            span: node_span(a.syntax()),
            file_path: self.file_path.map(str::to_string),
        }))
    }

    fn build_struct(
        &mut self,
        s: PStruct,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        let type_params = Self::type_param_names(s.type_params());
        let scope: GenericScope = type_params.iter().cloned().collect();
        let attributes = self.build_attrs(s.attrs());

        let view_of = s.view_of().map(|v| ViewOf {
            base_name: v.base().map(|n| n.text()).unwrap_or_default(),
            field_names: v.field_names().iter().map(|t| t.text().to_string()).collect(),
            span: node_span(v.syntax()),
        });

        let base = if view_of.is_some() {
            None
        } else {
            s.base().map(|t| self.build_type(&t, &scope))
        };

        let mut fields: Vec<Field> = if view_of.is_some() {
            Vec::new()
        } else {
            s.body()
                .map(|body| body.fields().map(|f| self.build_field(f, &scope)).collect())
                .unwrap_or_default()
        };
        fields.sort_by_key(|f| f.ordinal);

        arena.alloc(Declaration::Struct(StructDecl {
            name: s.name().map(|t| t.text().to_string()).unwrap_or_default(),
            namespaces: namespaces.to_vec(),
            type_params,
            base,
            fields,
            attributes,
            view_of,
            span: node_span(s.syntax()),
            file_path: self.file_path.map(str::to_string),
        }))
    }

    fn build_field(&mut self, f: FieldDecl, scope: &GenericScope) -> Field {
        let attributes = self.build_attrs(f.attrs());
        let span = node_span(f.syntax());

        let ordinal = f
            .ordinal_token()
            .and_then(|t| {
                let v = parse_ordinal(t.text());
                if v.is_none() {
                    self.error(
                        ErrorKind::SyntaxError,
                        format!("field ordinal `{}` out of range (0..65535)", t.text()),
                        token_span(&t),
                    );
                }
                v
            })
            .unwrap_or(0);

        let modifier = match f.modifier().map(|t| t.kind()) {
            Some(SyntaxKind::OPTIONAL_KW) => Modifier::Optional,
            Some(SyntaxKind::REQUIRED_KW) => Modifier::Required,
            Some(SyntaxKind::REQUIRED_OPTIONAL_KW) => Modifier::RequiredOptional,
            _ => Modifier::Optional,
        };

        let mut ty = match f.field_type() {
            Some(FieldType::Type(tr)) => self.build_type(&tr, scope),
            Some(FieldType::Meta(m)) => match m.which().as_ref().map(|t| t.text()) {
                Some("full_name") => Type::MetaFullName,
                _ => Type::MetaName,
            },
            None => Type::UnresolvedUserType(String::new(), Vec::new()),
        };

        let name = f.name().map(|t| t.text().to_string()).unwrap_or_default();
        let default = f.default().map(|d| self.build_default(&d));

        if matches!(default, Some(Default_::Nothing)) {
            ty = Type::Maybe(Box::new(ty));
        }

        Field {
            ordinal,
            modifier,
            ty,
            name,
            default,
            attributes,
            span,
        }
    }

    fn build_default(&mut self, d: &DefaultValue) -> Default_ {
        let tokens: Vec<_> = d.tokens().collect();
        if tokens.is_empty() {
            return Default_::Nothing;
        }
        if tokens[0].kind() == SyntaxKind::NOTHING_KW {
            return Default_::Nothing;
        }

        let (negative, lit) = if matches!(tokens[0].kind(), SyntaxKind::MINUS | SyntaxKind::PLUS) {
            (tokens[0].kind() == SyntaxKind::MINUS, tokens.get(1))
        } else {
            (false, tokens.first())
        };
        let Some(lit) = lit else {
            return Default_::Nothing;
        };

        match lit.kind() {
            SyntaxKind::INT_LITERAL => match parse_int_literal(lit.text(), negative) {
                Some(v) => Default_::Integer(v),
                None => {
                    self.error(
                        ErrorKind::InvalidDefault,
                        format!("integer default `{}` does not fit in 64 bits", lit.text()),
                        token_span(lit),
                    );
                    Default_::Integer(0)
                }
            },
            SyntaxKind::FLOAT_LITERAL => {
                Default_::Float(parse_float_literal(lit.text(), negative).unwrap_or(0.0))
            }
            SyntaxKind::STRING_LITERAL => Default_::String(unescape_string(lit.text())),
            SyntaxKind::IDENT => Default_::Enum(lit.text().to_string()),
            _ => Default_::Nothing,
        }
    }

    fn build_enum(
        &mut self,
        e: PEnum,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        let attributes = self.build_attrs(item::attrs_of(e.syntax()));
        let mut prev: i64 = -1;
        let constants = e
            .constants()
            .map(|c| {
                let built = self.build_enum_constant(c, prev);
                prev = built.effective_value;
                built
            })
            .collect();

        arena.alloc(Declaration::Enum(EnumDecl {
            name: e.name().map(|t| t.text().to_string()).unwrap_or_default(),
            namespaces: namespaces.to_vec(),
            constants,
            attributes,
            span: node_span(e.syntax()),
            file_path: self.file_path.map(str::to_string),
        }))
    }

    fn build_enum_constant(&mut self, c: PEnumConstant, prev_effective: i64) -> EnumConstant {
        let attributes = self.build_attrs(c.attrs());
        let explicit_value = c.value_token().and_then(|t| parse_int_literal(t.text(), c.is_negative()));
        let effective_value = explicit_value.unwrap_or(prev_effective + 1);
        EnumConstant {
            name: c.name().map(|t| t.text().to_string()).unwrap_or_default(),
            explicit_value,
            effective_value,
            attributes,
            span: node_span(c.syntax()),
        }
    }

    fn build_service(
        &mut self,
        s: PService,
        namespaces: &[NamespaceRef],
        arena: &mut DeclArena,
    ) -> DeclId {
        let type_params = Self::type_param_names(s.type_params());
        let scope: GenericScope = type_params.iter().cloned().collect();
        let attributes = self.build_attrs(item::attrs_of(s.syntax()));

        let base = s.base().map(|qn| {
            let args = s
                .base_type_args()
                .map(|l| l.args().map(|a| self.build_type_arg(a, &scope)).collect())
                .unwrap_or_default();
            Type::UnresolvedUserType(qn.text(), args)
        });

        let methods = s.methods().map(|m| self.build_method(m, &scope)).collect();

        arena.alloc(Declaration::Service(ServiceDecl {
            name: s.name().map(|t| t.text().to_string()).unwrap_or_default(),
            namespaces: namespaces.to_vec(),
            type_params,
            base,
            methods,
            attributes,
            span: node_span(s.syntax()),
            file_path: self.file_path.map(str::to_string),
        }))
    }

    fn build_method(&mut self, m: MethodDecl, scope: &GenericScope) -> Method {
        let attributes = self.build_attrs(m.attrs());
        let name = m.name().map(|t| t.text().to_string()).unwrap_or_default();
        let span = node_span(m.syntax());

        let input = match m.param() {
            None => MethodType::Void,
            Some(p) => self.build_method_param(p, scope),
        };

        let kind = if m.is_event() {
            MethodKind::Event { input }
        } else {
            let result = self.build_method_result(&m, scope);
            MethodKind::Function { result, input }
        };

        Method { name, kind, attributes, span }
    }

    fn build_method_result(&mut self, m: &MethodDecl, scope: &GenericScope) -> MethodType {
        match m.result_type() {
            Some(tr) => {
                if tr.keyword().map(|k| k.kind() == SyntaxKind::VOID_KW).unwrap_or(false) {
                    MethodType::Void
                } else {
                    let ty = self.build_type(&tr, scope);
                    if m.is_streaming() {
                        MethodType::Streaming(ty)
                    } else {
                        MethodType::Unary(ty)
                    }
                }
            }
            None => MethodType::Void,
        }
    }

    fn build_method_param(&mut self, p: MethodParam, scope: &GenericScope) -> MethodType {
        match p.param_type() {
            Some(tr) => {
                let ty = self.build_type(&tr, scope);
                if p.is_streaming() {
                    MethodType::Streaming(ty)
                } else {
                    MethodType::Unary(ty)
                }
            }
            None => MethodType::Void,
        }
    }

    fn build_type(&mut self, tr: &TypeRef, scope: &GenericScope) -> Type {
        if let Some(kw) = tr.keyword() {
            if let Some(prim) = primitive_from_kind(kw.kind()) {
                return prim;
            }
            if kw.kind() == SyntaxKind::VOID_KW {
                return Type::Void;
            }
            if is_container_kind(kw.kind()) {
                let args: Vec<Type> = tr
                    .type_args()
                    .map(|l| l.args().map(|a| self.build_type_arg(a, scope)).collect())
                    .unwrap_or_default();
                return self.build_container(kw.kind(), args, node_span(tr.syntax()));
            }
        }

        if let Some(name) = tr.name() {
            let text = name.text();
            let has_args = tr.type_args().is_some();
            if !has_args && !text.contains('.') && scope.contains(&text) {
                return Type::TypeParameter(text);
            }
            let args = tr
                .type_args()
                .map(|l| l.args().map(|a| self.build_type_arg(a, scope)).collect())
                .unwrap_or_default();
            return Type::UnresolvedUserType(text, args);
        }

        Type::UnresolvedUserType(String::new(), Vec::new())
    }

    fn build_type_arg(&mut self, arg: TypeArg, scope: &GenericScope) -> Type {
        match arg {
            TypeArg::Type(tr) => self.build_type(&tr, scope),
            TypeArg::IntLiteral(tok) => match parse_int_literal(tok.text(), false) {
                Some(v) => Type::IntTypeArg(v),
                None => {
                    self.error(
                        ErrorKind::SyntaxError,
                        format!("integer type argument `{}` out of range", tok.text()),
                        token_span(&tok),
                    );
                    Type::IntTypeArg(0)
                }
            },
        }
    }

    fn build_container(&mut self, kind: SyntaxKind, mut args: Vec<Type>, span: Span) -> Type {
        let want = if kind == SyntaxKind::MAP_KW { 2 } else { 1 };
        if args.len() != want {
            self.error(
                ErrorKind::SyntaxError,
                format!("expected {want} type argument(s), found {}", args.len()),
                span,
            );
            args.resize_with(want, || Type::UnresolvedUserType(String::new(), Vec::new()));
        }
        let mut it = args.into_iter();
        match kind {
            SyntaxKind::LIST_KW => Type::List(Box::new(it.next().unwrap())),
            SyntaxKind::VECTOR_KW => Type::Vector(Box::new(it.next().unwrap())),
            SyntaxKind::SET_KW => Type::Set(Box::new(it.next().unwrap())),
            SyntaxKind::MAP_KW => {
                let k = it.next().unwrap();
                let v = it.next().unwrap();
                Type::Map(Box::new(k), Box::new(v))
            }
            SyntaxKind::NULLABLE_KW => Type::Nullable(Box::new(it.next().unwrap())),
            SyntaxKind::BONDED_KW => Type::Bonded(Box::new(it.next().unwrap())),
            _ => unreachable!("not a container keyword"),
        }
    }
}

fn primitive_from_kind(kind: SyntaxKind) -> Option<Type> {
    Some(match kind {
        SyntaxKind::INT8_KW => Type::Int8,
        SyntaxKind::INT16_KW => Type::Int16,
        SyntaxKind::INT32_KW => Type::Int32,
        SyntaxKind::INT64_KW => Type::Int64,
        SyntaxKind::UINT8_KW => Type::Uint8,
        SyntaxKind::UINT16_KW => Type::Uint16,
        SyntaxKind::UINT32_KW => Type::Uint32,
        SyntaxKind::UINT64_KW => Type::Uint64,
        SyntaxKind::FLOAT_KW => Type::Float,
        SyntaxKind::DOUBLE_KW => Type::Double,
        SyntaxKind::BOOL_KW => Type::Bool,
        SyntaxKind::STRING_KW => Type::String,
        SyntaxKind::WSTRING_KW => Type::WString,
        SyntaxKind::BLOB_KW => Type::Blob,
        _ => return None,
    })
}

fn is_container_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::LIST_KW
            | SyntaxKind::VECTOR_KW
            | SyntaxKind::SET_KW
            | SyntaxKind::MAP_KW
            | SyntaxKind::NULLABLE_KW
            | SyntaxKind::BONDED_KW
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(src: &str) -> (BondFile, DeclArena, Vec<ParseError>) {
        let parse = bond_parser::parse(src);
        assert!(parse.ok(), "{:?}", parse.errors());
        let mut arena = DeclArena::new();
        let (file, errors) = build_file(&parse, src, Some("t.bond"), &mut arena);
        (file, arena, errors)
    }

    #[test]
    fn builds_struct_fields_sorted_by_ordinal() {
        let (file, arena, errors) = build(
            "namespace ns\nstruct S { 1: required int32 b; 0: required int32 a; }\n",
        );
        assert!(errors.is_empty());
        let Declaration::Struct(s) = arena.get(file.declarations[0]) else {
            panic!()
        };
        assert_eq!(s.fields[0].name, "a");
        assert_eq!(s.fields[1].name, "b");
    }

    #[test]
    fn wraps_nothing_default_in_maybe() {
        let (file, arena, _errors) = build(
            "namespace ns\nstruct S { 0: optional nullable<int32> x = nothing; }\n",
        );
        let Declaration::Struct(s) = arena.get(file.declarations[0]) else {
            panic!()
        };
        assert!(matches!(s.fields[0].ty, Type::Maybe(_)));
        assert_eq!(s.fields[0].default, Some(Default_::Nothing));
    }

    #[test]
    fn generic_param_becomes_type_parameter() {
        let (file, arena, _errors) = build("namespace ns\nstruct Box<T> { 0: required T value; }\n");
        let Declaration::Struct(s) = arena.get(file.declarations[0]) else {
            panic!()
        };
        assert_eq!(s.fields[0].ty, Type::TypeParameter("T".to_string()));
    }

    #[test]
    fn named_type_becomes_unresolved() {
        let (file, arena, _errors) =
            build("namespace ns\nstruct Other {}\nstruct S { 0: required Other o; }\n");
        let Declaration::Struct(s) = arena.get(file.declarations[1]) else {
            panic!()
        };
        assert_eq!(s.fields[0].ty, Type::UnresolvedUserType("Other".to_string(), vec![]));
    }

    #[test]
    fn enum_implicit_values_increment() {
        let (file, arena, _errors) = build("namespace ns\nenum E { A = 1, B, C = 10, D }\n");
        let Declaration::Enum(e) = arena.get(file.declarations[0]) else {
            panic!()
        };
        let values: Vec<_> = e.constants.iter().map(|c| c.effective_value).collect();
        assert_eq!(values, vec![1, 2, 10, 11]);
    }

    #[test]
    fn view_of_struct_has_no_local_fields() {
        let (file, arena, _errors) = build(
            "namespace ns\nstruct Base { 0: required int32 a; }\nstruct V view_of Base { a }\n",
        );
        let Declaration::Struct(v) = arena.get(file.declarations[1]) else {
            panic!()
        };
        assert!(v.fields.is_empty());
        assert!(v.view_of.is_some());
        assert_eq!(v.view_of.as_ref().unwrap().base_name, "Base");
    }

    #[test]
    fn service_base_is_captured() {
        let (file, arena, _errors) =
            build("namespace ns\nservice Base {}\nservice S : Base {}\n");
        let Declaration::Service(s) = arena.get(file.declarations[1]) else {
            panic!()
        };
        assert_eq!(
            s.base,
            Some(Type::UnresolvedUserType("Base".to_string(), vec![]))
        );
    }

    #[test]
    fn vector_and_list_element_types() {
        let (file, arena, _errors) =
            build("namespace ns\nstruct S { 0: required vector<int32> v; 1: required map<string, int32> m; }\n");
        let Declaration::Struct(s) = arena.get(file.declarations[0]) else {
            panic!()
        };
        assert_eq!(s.fields[0].ty, Type::Vector(Box::new(Type::Int32)));
        assert_eq!(
            s.fields[1].ty,
            Type::Map(Box::new(Type::String), Box::new(Type::Int32))
        );
    }

    #[test]
    fn alias_chain_builds() {
        let (file, arena, _errors) = build("namespace ns\nusing Inner = string;\nusing Outer = Inner;\n");
        let Declaration::Alias(outer) = arena.get(file.declarations[1]) else {
            panic!()
        };
        assert_eq!(
            outer.target,
            Type::UnresolvedUserType("Inner".to_string(), vec![])
        );
    }

    #[test]
    fn method_kinds_distinguish_function_and_event() {
        let (file, arena, _errors) = build(
            "namespace ns\nstruct Req {}\nstruct Resp {}\nservice S {\n  Resp Call(Req);\n  nothing Notify(Req);\n}\n",
        );
        let Declaration::Service(s) = arena.get(file.declarations[2]) else {
            panic!()
        };
        assert!(matches!(s.methods[0].kind, MethodKind::Function { .. }));
        assert!(matches!(s.methods[1].kind, MethodKind::Event { .. }));
    }
}
