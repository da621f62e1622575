//! Grammar rules for the Bond IDL surface.
//!
//! One function per production. Each function assumes it is called with
//! the parser positioned at the start of its production and leaves it
//! positioned just past the end.

use super::{starts_declaration, MarkOpened, Parser};
use crate::syntax_kind::SyntaxKind;

/// `bond := import* namespace+ declaration*`
pub(crate) fn parse_file(p: &mut Parser) {
    let root = p.open();

    while p.at(SyntaxKind::IMPORT_KW) {
        parse_import(p);
    }

    while p.at(SyntaxKind::NAMESPACE_KW) {
        parse_namespace(p);
    }

    while !p.at(SyntaxKind::EOF) {
        parse_declaration(p);
        if p.has_error() {
            break;
        }
    }

    while !p.at(SyntaxKind::EOF) {
        p.advance();
    }
    p.advance(); // EOF

    p.close(root, SyntaxKind::SOURCE_FILE);
}

/// `import := 'import' string_literal ';'?`
fn parse_import(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IMPORT_KW);
    p.expect(SyntaxKind::STRING_LITERAL);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::IMPORT_DECL);
}

/// `namespace := 'namespace' lang? qualified_name ';'?`
///
/// The language tag (`cpp`/`cs`/`csharp`/`java`) lexes as a plain `Ident`
/// (the grammar note); it is only a tag when followed by another `Ident`
/// that starts the qualified name. We emit it as a bare token directly
/// under `NAMESPACE_DECL` (not wrapped in `QUALIFIED_NAME`) so the AST
/// builder can tell it apart from the namespace name itself.
fn parse_namespace(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::NAMESPACE_KW);
    if p.at(SyntaxKind::IDENT) && is_lang_tag(p.current_text()) && p.nth(1) == SyntaxKind::IDENT {
        p.advance();
    }
    parse_qualified_name(p);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::NAMESPACE_DECL);
}

fn is_lang_tag(text: &str) -> bool {
    matches!(text, "cpp" | "cs" | "csharp" | "java")
}

/// `ident ('.' ident)*`
fn parse_qualified_name(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IDENT);
    while p.at(SyntaxKind::DOT) {
        p.advance();
        p.expect(SyntaxKind::IDENT);
    }
    p.close(m, SyntaxKind::QUALIFIED_NAME);
}

/// `[QualifiedName("stringLiteral")]`, zero or more, wrapped in an
/// `ATTR_LIST` node applying to the next declaration/field/method.
fn parse_opt_attr_list(p: &mut Parser) {
    if !p.at(SyntaxKind::L_BRACKET) {
        return;
    }
    let m = p.open();
    while p.at(SyntaxKind::L_BRACKET) {
        parse_attr(p);
    }
    p.close(m, SyntaxKind::ATTR_LIST);
}

fn parse_attr(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    parse_qualified_name(p);
    p.expect(SyntaxKind::L_PAREN);
    p.expect(SyntaxKind::STRING_LITERAL);
    p.expect(SyntaxKind::R_PAREN);
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ATTR);
}

/// `declaration := forward | alias | struct | enum | service`
fn parse_declaration(p: &mut Parser) {
    let m = p.open();
    parse_opt_attr_list(p);

    match p.current() {
        SyntaxKind::STRUCT_KW => parse_struct_or_forward(p, m),
        SyntaxKind::ENUM_KW => parse_enum(p, m),
        SyntaxKind::SERVICE_KW => parse_service(p, m),
        SyntaxKind::USING_KW => parse_alias(p, m),
        _ => {
            p.error(&format!(
                "expected a declaration (`struct`, `enum`, `service`, or `using`), found `{}`",
                p.current_text()
            ));
            while !p.at(SyntaxKind::EOF) && !starts_declaration(p.current()) {
                p.advance();
            }
            p.close(m, SyntaxKind::ERROR_NODE);
        }
    }
}

/// `forward := 'struct' ident type_params? ';'`
/// `struct  := attrs? 'struct' ident type_params? (view | def)`
fn parse_struct_or_forward(p: &mut Parser, m: MarkOpened) {
    p.advance(); // 'struct'
    p.expect(SyntaxKind::IDENT);
    parse_opt_type_params(p);

    if p.eat(SyntaxKind::SEMICOLON) {
        p.close(m, SyntaxKind::FORWARD_DECL);
        return;
    }

    if p.at(SyntaxKind::VIEW_OF_KW) {
        parse_view_of_clause(p);
        p.eat(SyntaxKind::SEMICOLON);
        p.close(m, SyntaxKind::STRUCT_DECL);
        return;
    }

    if p.eat(SyntaxKind::COLON) {
        parse_type(p);
    }
    parse_struct_body(p);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::STRUCT_DECL);
}

/// `view := 'view_of' qualified_name '{' ident (sep ident)* sep? '}' ';'?`
fn parse_view_of_clause(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::VIEW_OF_KW);
    parse_qualified_name(p);
    p.expect(SyntaxKind::L_BRACE);
    let fields = p.open();
    if !p.at(SyntaxKind::R_BRACE) {
        p.expect(SyntaxKind::IDENT);
        while p.at(SyntaxKind::COMMA) || p.at(SyntaxKind::SEMICOLON) {
            p.advance();
            if p.at(SyntaxKind::R_BRACE) {
                break;
            }
            p.expect(SyntaxKind::IDENT);
        }
    }
    p.close(fields, SyntaxKind::VIEW_FIELD_LIST);
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::VIEW_OF_CLAUSE);
}

/// `def := (':' user_type)? '{' (field ';')* '}' ';'?` -- the base-type
/// clause is parsed by the caller; this handles only the brace body.
fn parse_struct_body(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        parse_field(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::STRUCT_BODY);
}

/// `field := attrs? int ':' modifier? field_type ident ('=' default)?`
fn parse_field(p: &mut Parser) {
    let m = p.open();
    parse_opt_attr_list(p);
    p.expect(SyntaxKind::INT_LITERAL);
    p.expect(SyntaxKind::COLON);
    if p.at_any(&[
        SyntaxKind::OPTIONAL_KW,
        SyntaxKind::REQUIRED_KW,
        SyntaxKind::REQUIRED_OPTIONAL_KW,
    ]) {
        p.advance();
    }
    parse_field_type(p);
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::EQ) {
        parse_default(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::FIELD_DECL);
}

/// A field type is either an ordinary `type` or a compiler-intrinsic meta
/// type (`bond_meta::name` / `bond_meta::full_name`), accepted only here,
/// never as a generic argument.
fn parse_field_type(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT)
        && p.current_text() == "bond_meta"
        && p.nth(1) == SyntaxKind::COLON_COLON
    {
        let m = p.open();
        p.advance(); // bond_meta
        p.advance(); // ::
        p.expect(SyntaxKind::IDENT); // name | full_name
        p.close(m, SyntaxKind::META_TYPE_REF);
    } else {
        parse_type(p);
    }
}

fn is_primitive_kw(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::INT8_KW
            | SyntaxKind::INT16_KW
            | SyntaxKind::INT32_KW
            | SyntaxKind::INT64_KW
            | SyntaxKind::UINT8_KW
            | SyntaxKind::UINT16_KW
            | SyntaxKind::UINT32_KW
            | SyntaxKind::UINT64_KW
            | SyntaxKind::FLOAT_KW
            | SyntaxKind::DOUBLE_KW
            | SyntaxKind::BOOL_KW
            | SyntaxKind::STRING_KW
            | SyntaxKind::WSTRING_KW
            | SyntaxKind::BLOB_KW
    )
}

fn is_container_kw(kind: SyntaxKind) -> bool {
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

/// A type reference: a primitive keyword, a container parameterized by
/// one or two type arguments, or a (possibly generic) qualified user
/// type name. Wrapped uniformly in a `TYPE_REF` node; the AST builder
/// disambiguates by the kind of the first child.
fn parse_type(p: &mut Parser) {
    let m = p.open();
    match p.current() {
        k if is_primitive_kw(k) => p.advance(),
        k if is_container_kw(k) => {
            p.advance();
            parse_type_arg_list(p);
        }
        SyntaxKind::IDENT => {
            parse_qualified_name(p);
            if p.at(SyntaxKind::LT) {
                parse_type_arg_list(p);
            }
        }
        SyntaxKind::VOID_KW => p.advance(),
        _ => p.advance_with_error(&format!("expected a type, found `{}`", p.current_text())),
    }
    p.close(m, SyntaxKind::TYPE_REF);
}

/// `'<' type_arg (',' type_arg)* '>'`. A type argument is either a
/// nested `type` or a bare integer literal (`IntTypeArg`, e.g. a
/// fixed-width generic parameter).
fn parse_type_arg_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::LT);
    parse_type_arg(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_type_arg(p);
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::TYPE_ARG_LIST);
}

fn parse_type_arg(p: &mut Parser) {
    if p.at(SyntaxKind::INT_LITERAL) {
        p.advance();
    } else {
        parse_type(p);
    }
}

/// `'<' ident (',' ident)* '>'`
fn parse_opt_type_params(p: &mut Parser) {
    if !p.at(SyntaxKind::LT) {
        return;
    }
    let m = p.open();
    p.advance();
    parse_type_param(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_type_param(p);
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::TYPE_PARAM_LIST);
}

fn parse_type_param(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IDENT);
    p.close(m, SyntaxKind::TYPE_PARAM);
}

/// `default` literal. A leading sign is a separate token folded into the
/// literal by the AST builder.
fn parse_default(p: &mut Parser) {
    let m = p.open();
    match p.current() {
        SyntaxKind::PLUS | SyntaxKind::MINUS => {
            p.advance();
            if p.at(SyntaxKind::INT_LITERAL) || p.at(SyntaxKind::FLOAT_LITERAL) {
                p.advance();
            } else {
                p.error("expected a numeric literal after sign");
            }
        }
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::IDENT
        | SyntaxKind::NOTHING_KW => p.advance(),
        _ => p.advance_with_error(&format!(
            "expected a default value, found `{}`",
            p.current_text()
        )),
    }
    p.close(m, SyntaxKind::DEFAULT_VALUE);
}

/// `enum := attrs? 'enum' ident '{' constant (sep constant)* sep? '}' ';'?`
fn parse_enum(p: &mut Parser, m: MarkOpened) {
    p.advance(); // 'enum'
    p.expect(SyntaxKind::IDENT);
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        parse_enum_constant(p);
        if !p.eat(SyntaxKind::COMMA) {
            p.eat(SyntaxKind::SEMICOLON);
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::ENUM_DECL);
}

/// `constant := attrs? ident ('=' ('+' | '-')? int)?`
fn parse_enum_constant(p: &mut Parser) {
    let m = p.open();
    parse_opt_attr_list(p);
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::EQ) {
        if p.at(SyntaxKind::PLUS) || p.at(SyntaxKind::MINUS) {
            p.advance();
        }
        p.expect(SyntaxKind::INT_LITERAL);
    }
    p.close(m, SyntaxKind::ENUM_CONSTANT);
}

/// `service := attrs? 'service' ident type_params? (':' service_type)?
///             '{' method* '}' ';'?`
fn parse_service(p: &mut Parser, m: MarkOpened) {
    p.advance(); // 'service'
    p.expect(SyntaxKind::IDENT);
    parse_opt_type_params(p);
    if p.eat(SyntaxKind::COLON) {
        parse_qualified_name(p);
        if p.at(SyntaxKind::LT) {
            parse_type_arg_list(p);
        }
    }
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        parse_method(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::SERVICE_DECL);
}

/// `method := attrs? ((result_type | 'nothing') ident '(' param? ')') ';'?`
///
/// `result_type` is `void`, a plain `type`, or `stream` followed by a
/// type (a method's result is Void, a unary user struct, or a stream).
fn parse_method(p: &mut Parser) {
    let m = p.open();
    parse_opt_attr_list(p);

    if p.at(SyntaxKind::NOTHING_KW) {
        p.advance();
    } else {
        if p.at(SyntaxKind::STREAM_KW) {
            p.advance();
        }
        parse_type(p);
    }

    p.expect(SyntaxKind::IDENT);
    p.expect(SyntaxKind::L_PAREN);
    if !p.at(SyntaxKind::R_PAREN) {
        parse_method_param(p);
    }
    p.expect(SyntaxKind::R_PAREN);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::METHOD_DECL);
}

fn parse_method_param(p: &mut Parser) {
    let m = p.open();
    if p.at(SyntaxKind::STREAM_KW) {
        p.advance();
    }
    parse_type(p);
    p.close(m, SyntaxKind::METHOD_PARAM);
}

/// `alias := 'using' ident type_params? '=' type ';'`
fn parse_alias(p: &mut Parser, m: MarkOpened) {
    p.advance(); // 'using'
    p.expect(SyntaxKind::IDENT);
    parse_opt_type_params(p);
    p.expect(SyntaxKind::EQ);
    parse_type(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::ALIAS_DECL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_lexer::Lexer;

    fn parse(src: &str) -> (crate::cst::SyntaxNode, Vec<bond_common::diagnostics::ParseError>) {
        let tokens = Lexer::tokenize(src);
        let mut parser = Parser::new(tokens, src);
        parse_file(&mut parser);
        let (green, errors) = parser.build_tree();
        (crate::cst::SyntaxNode::new_root(green), errors)
    }

    #[test]
    fn parses_minimal_struct() {
        let (root, errors) = parse(
            "namespace ns\nstruct Point { 0: required int32 x; 1: required int32 y; }\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        let structs: Vec<_> = root
            .children()
            .filter(|n| n.kind() == SyntaxKind::STRUCT_DECL)
            .collect();
        assert_eq!(structs.len(), 1);
    }

    #[test]
    fn parses_forward_declaration() {
        let (root, errors) =
            parse("namespace ns\nstruct Node;\nstruct Tree { 0: optional Node child; }\n");
        assert!(errors.is_empty(), "{errors:?}");
        let kinds: Vec<_> = root.children().map(|n| n.kind()).collect();
        assert!(kinds.contains(&SyntaxKind::FORWARD_DECL));
        assert!(kinds.contains(&SyntaxKind::STRUCT_DECL));
    }

    #[test]
    fn parses_alias_chain() {
        let (_root, errors) = parse("namespace ns\nusing Inner = string;\nusing Outer = Inner;\n");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_enum_with_explicit_and_implicit_values() {
        let (root, errors) = parse("namespace ns\nenum Color { Red = 1, Green, Blue = 10 }\n");
        assert!(errors.is_empty(), "{errors:?}");
        let e = root
            .children()
            .find(|n| n.kind() == SyntaxKind::ENUM_DECL)
            .unwrap();
        let constants: Vec<_> = e
            .children()
            .filter(|n| n.kind() == SyntaxKind::ENUM_CONSTANT)
            .collect();
        assert_eq!(constants.len(), 3);
    }

    #[test]
    fn parses_service_with_function_and_event() {
        let src = "namespace ns\nstruct Req {}\nstruct Resp {}\nservice S {\n    Resp Call(Req);\n    nothing Notify(Req);\n}\n";
        let (_root, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_generic_struct_and_container_types() {
        let src = "namespace ns\nstruct Box<T> { 0: required T value; }\nstruct Holder { 0: required vector<int32> xs; 1: required map<string, int32> m; }\n";
        let (_root, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_view_of_clause() {
        let src = "namespace ns\nstruct Base { 0: required int32 a; 1: required int32 b; }\nstruct V view_of Base { a, b }\n";
        let (_root, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_attribute_on_struct_and_field() {
        let src = r#"namespace ns
[Attr("x")]
struct S {
    [Attr("y")]
    0: required int32 a;
}
"#;
        let (_root, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_negative_enum_value_and_default() {
        let src = "namespace ns\nenum E { A = -1 }\nstruct S { 0: optional int32 x = -5; }\n";
        let (_root, errors) = parse(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn parses_language_qualified_namespace() {
        let (root, errors) = parse("namespace cpp ns.sub\nstruct S {}\n");
        assert!(errors.is_empty(), "{errors:?}");
        let ns = root
            .children()
            .find(|n| n.kind() == SyntaxKind::NAMESPACE_DECL)
            .unwrap();
        // The lang tag is a bare IDENT token directly under NAMESPACE_DECL,
        // not wrapped in QUALIFIED_NAME.
        let has_bare_ident_token = ns
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::IDENT && t.text() == "cpp");
        assert!(has_bare_ident_token);
    }

    #[test]
    fn reports_syntax_error_on_malformed_struct() {
        let (_root, errors) = parse("namespace ns\nstruct S { 0 required int32 x; }\n");
        assert!(!errors.is_empty());
    }
}
