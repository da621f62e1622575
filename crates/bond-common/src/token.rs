use serde::Serialize;

use crate::span::Span;

/// A token produced by the Bond lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the Bond IDL grammar.
///
/// Keywords are the structural vocabulary of the grammar. Primitive type
/// names lex as their own keyword variants rather than generic identifiers
/// so the parser can distinguish them from user type names without a
/// symbol-table lookup. Language tags (`cpp`, `cs`, `csharp`, `java`) are
/// *not* keywords -- they lex as plain `Ident` and are classified
/// contextually by the parser immediately after `namespace`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // ── Structural keywords ────────────────────────────────────────────
    Import,
    Namespace,
    Using,
    Struct,
    Enum,
    Service,
    ViewOf,
    Optional,
    Required,
    RequiredOptional,
    Void,
    Stream,
    Nothing,
    Value,

    // ── Primitive type keywords ────────────────────────────────────────
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    Bool,
    StringKw,
    Wstring,
    Blob,
    List,
    Vector,
    Set,
    Map,
    Nullable,
    Bonded,

    // ── Identifiers and literals ───────────────────────────────────────
    Ident,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    // ── Punctuation ────────────────────────────────────────────────────
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `+` (only meaningful as a sign prefix on a numeric literal)
    Plus,
    /// `-` (only meaningful as a sign prefix on a numeric literal)
    Minus,

    // ── Trivia (hidden channel) ────────────────────────────────────────
    Whitespace,
    LineComment,
    BlockComment,

    // ── Special ────────────────────────────────────────────────────────
    /// A malformed token (unterminated string, bad escape, stray byte).
    /// The lexer never raises; the parser layer turns these into
    /// `ParseError`s.
    Error,
    Eof,
}

impl TokenKind {
    /// Whether this token kind belongs to the hidden channel: whitespace
    /// and comments, routed past the grammar parser's lookahead but kept
    /// in the token stream so a lossless CST remains possible.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Classify an identifier-shaped lexeme as a keyword, or `None` if it is an
/// ordinary identifier. Keywords are matched case-sensitively.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    Some(match s {
        "import" => TokenKind::Import,
        "namespace" => TokenKind::Namespace,
        "using" => TokenKind::Using,
        "struct" => TokenKind::Struct,
        "enum" => TokenKind::Enum,
        "service" => TokenKind::Service,
        "view_of" => TokenKind::ViewOf,
        "optional" => TokenKind::Optional,
        "required" => TokenKind::Required,
        "required_optional" => TokenKind::RequiredOptional,
        "void" => TokenKind::Void,
        "stream" => TokenKind::Stream,
        "nothing" => TokenKind::Nothing,
        "value" => TokenKind::Value,
        "int8" => TokenKind::Int8,
        "int16" => TokenKind::Int16,
        "int32" => TokenKind::Int32,
        "int64" => TokenKind::Int64,
        "uint8" => TokenKind::Uint8,
        "uint16" => TokenKind::Uint16,
        "uint32" => TokenKind::Uint32,
        "uint64" => TokenKind::Uint64,
        "float" => TokenKind::Float,
        "double" => TokenKind::Double,
        "bool" => TokenKind::Bool,
        "string" => TokenKind::StringKw,
        "wstring" => TokenKind::Wstring,
        "blob" => TokenKind::Blob,
        "list" => TokenKind::List,
        "vector" => TokenKind::Vector,
        "set" => TokenKind::Set,
        "map" => TokenKind::Map,
        "nullable" => TokenKind::Nullable,
        "bonded" => TokenKind::Bonded,
        _ => return None,
    })
}

/// Case-insensitive primitive-name lookup used when a single-segment type
/// reference that isn't a generic parameter is resolved: a case-variant of
/// a primitive type name (e.g. `String`) is folded to the canonical
/// primitive rather than left as an unresolved user type.
pub fn primitive_name_ci(s: &str) -> Option<&'static str> {
    Some(match s.to_ascii_lowercase().as_str() {
        "int8" => "int8",
        "int16" => "int16",
        "int32" => "int32",
        "int64" => "int64",
        "uint8" => "uint8",
        "uint16" => "uint16",
        "uint32" => "uint32",
        "uint64" => "uint64",
        "float" => "float",
        "double" => "double",
        "bool" => "bool",
        "string" => "string",
        "wstring" => "wstring",
        "blob" => "blob",
        _ => return None,
    })
}
