use bond_common::token::TokenKind;
use bond_lexer::Lexer;

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::tokenize(src).into_iter().map(|t| t.kind).collect()
}

fn non_trivia_kinds(src: &str) -> Vec<TokenKind> {
    Lexer::tokenize(src)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn tokenizes_a_minimal_struct_declaration() {
    let src = "namespace example\n\nstruct Point {\n    0: required int32 x;\n    1: required int32 y;\n}\n";
    assert_eq!(
        non_trivia_kinds(src),
        vec![
            TokenKind::Namespace,
            TokenKind::Ident,
            TokenKind::Struct,
            TokenKind::Ident,
            TokenKind::LBrace,
            TokenKind::IntLiteral,
            TokenKind::Colon,
            TokenKind::Required,
            TokenKind::Int32,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::IntLiteral,
            TokenKind::Colon,
            TokenKind::Required,
            TokenKind::Int32,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_alias_declaration() {
    assert_eq!(
        non_trivia_kinds("using Id = int64;"),
        vec![
            TokenKind::Using,
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Int64,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_attribute() {
    assert_eq!(
        non_trivia_kinds(r#"[Foo("bar")]"#),
        vec![
            TokenKind::LBracket,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::StringLiteral,
            TokenKind::RParen,
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_service_method_with_stream() {
    assert_eq!(
        non_trivia_kinds("service S { stream Foo bar(Foo); }"),
        vec![
            TokenKind::Service,
            TokenKind::Ident,
            TokenKind::LBrace,
            TokenKind::Stream,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_meta_field_type() {
    assert_eq!(
        non_trivia_kinds("bond_meta::full_name"),
        vec![
            TokenKind::Ident,
            TokenKind::ColonColon,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_escape_variants_lex_as_one_token() {
    for src in [
        r#""plain""#,
        r#""with \" escape""#,
        r#""hex \x41""#,
        r#""unicode é""#,
        r#""octal \101""#,
    ] {
        assert_eq!(kinds(src), vec![TokenKind::StringLiteral, TokenKind::Eof], "{src}");
    }
}

#[test]
fn block_comment_does_not_nest() {
    // The inner `/*` is just text; the first `*/` ends the comment.
    let toks = kinds("/* outer /* inner */ struct");
    assert_eq!(toks[0], TokenKind::BlockComment);
    // Remaining text " struct" still lexes as whitespace + Struct.
    assert!(toks.contains(&TokenKind::Struct));
}

#[test]
fn generic_type_params_lex_with_angle_brackets() {
    assert_eq!(
        non_trivia_kinds("struct Box<T> { 0: required T value; }"),
        vec![
            TokenKind::Struct,
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Ident,
            TokenKind::Gt,
            TokenKind::LBrace,
            TokenKind::IntLiteral,
            TokenKind::Colon,
            TokenKind::Required,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}
