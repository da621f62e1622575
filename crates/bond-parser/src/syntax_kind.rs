//! SyntaxKind enum for the Bond CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser, one per
//! grammar production.

use bond_common::token::TokenKind;

/// Every kind of syntax element in the Bond CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node
/// kinds represent parser-produced tree nodes. The first two values are
/// sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Structural keyword tokens ──────────────────────────────────────
    IMPORT_KW,
    NAMESPACE_KW,
    USING_KW,
    STRUCT_KW,
    ENUM_KW,
    SERVICE_KW,
    VIEW_OF_KW,
    OPTIONAL_KW,
    REQUIRED_KW,
    REQUIRED_OPTIONAL_KW,
    VOID_KW,
    STREAM_KW,
    NOTHING_KW,
    VALUE_KW,

    // ── Primitive type keyword tokens ──────────────────────────────────
    INT8_KW,
    INT16_KW,
    INT32_KW,
    INT64_KW,
    UINT8_KW,
    UINT16_KW,
    UINT32_KW,
    UINT64_KW,
    FLOAT_KW,
    DOUBLE_KW,
    BOOL_KW,
    STRING_KW,
    WSTRING_KW,
    BLOB_KW,
    LIST_KW,
    VECTOR_KW,
    SET_KW,
    MAP_KW,
    NULLABLE_KW,
    BONDED_KW,

    // ── Identifier and literal tokens ───────────────────────────────────
    IDENT,
    INT_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,

    // ── Punctuation tokens ──────────────────────────────────────────────
    L_BRACE,
    R_BRACE,
    L_BRACKET,
    R_BRACKET,
    L_PAREN,
    R_PAREN,
    LT,
    GT,
    SEMICOLON,
    COLON,
    COLON_COLON,
    COMMA,
    DOT,
    EQ,
    PLUS,
    MINUS,

    // ── Trivia tokens ────────────────────────────────────────────────────
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // ── Special tokens ───────────────────────────────────────────────────
    ERROR_TOKEN,
    EOF,

    // ── Composite node kinds ─────────────────────────────────────────────
    /// The whole file: `import* namespace+ declaration*`.
    SOURCE_FILE,
    IMPORT_DECL,
    NAMESPACE_DECL,
    QUALIFIED_NAME,
    ATTR,
    ATTR_LIST,
    FORWARD_DECL,
    ALIAS_DECL,
    STRUCT_DECL,
    VIEW_OF_CLAUSE,
    VIEW_FIELD_LIST,
    STRUCT_BODY,
    FIELD_DECL,
    DEFAULT_VALUE,
    ENUM_DECL,
    ENUM_CONSTANT,
    SERVICE_DECL,
    METHOD_DECL,
    METHOD_PARAM,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    TYPE_ARG_LIST,
    /// A type reference: primitive keyword, container (`list<T>`, `map<K,V>`,
    /// `nullable<T>`, `bonded<T>`), or a (possibly generic) user-defined
    /// name. Disambiguated by the AST builder, not the grammar parser.
    TYPE_REF,
    META_TYPE_REF,
}

impl SyntaxKind {
    /// Whether this kind is a trivia token (whitespace or comment).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    /// Whether this kind is a token (leaf), as opposed to a composite node.
    pub fn is_token(&self) -> bool {
        (*self as u16) <= (SyntaxKind::EOF as u16)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Import => SyntaxKind::IMPORT_KW,
            TokenKind::Namespace => SyntaxKind::NAMESPACE_KW,
            TokenKind::Using => SyntaxKind::USING_KW,
            TokenKind::Struct => SyntaxKind::STRUCT_KW,
            TokenKind::Enum => SyntaxKind::ENUM_KW,
            TokenKind::Service => SyntaxKind::SERVICE_KW,
            TokenKind::ViewOf => SyntaxKind::VIEW_OF_KW,
            TokenKind::Optional => SyntaxKind::OPTIONAL_KW,
            TokenKind::Required => SyntaxKind::REQUIRED_KW,
            TokenKind::RequiredOptional => SyntaxKind::REQUIRED_OPTIONAL_KW,
            TokenKind::Void => SyntaxKind::VOID_KW,
            TokenKind::Stream => SyntaxKind::STREAM_KW,
            TokenKind::Nothing => SyntaxKind::NOTHING_KW,
            TokenKind::Value => SyntaxKind::VALUE_KW,
            TokenKind::Int8 => SyntaxKind::INT8_KW,
            TokenKind::Int16 => SyntaxKind::INT16_KW,
            TokenKind::Int32 => SyntaxKind::INT32_KW,
            TokenKind::Int64 => SyntaxKind::INT64_KW,
            TokenKind::Uint8 => SyntaxKind::UINT8_KW,
            TokenKind::Uint16 => SyntaxKind::UINT16_KW,
            TokenKind::Uint32 => SyntaxKind::UINT32_KW,
            TokenKind::Uint64 => SyntaxKind::UINT64_KW,
            TokenKind::Float => SyntaxKind::FLOAT_KW,
            TokenKind::Double => SyntaxKind::DOUBLE_KW,
            TokenKind::Bool => SyntaxKind::BOOL_KW,
            TokenKind::StringKw => SyntaxKind::STRING_KW,
            TokenKind::Wstring => SyntaxKind::WSTRING_KW,
            TokenKind::Blob => SyntaxKind::BLOB_KW,
            TokenKind::List => SyntaxKind::LIST_KW,
            TokenKind::Vector => SyntaxKind::VECTOR_KW,
            TokenKind::Set => SyntaxKind::SET_KW,
            TokenKind::Map => SyntaxKind::MAP_KW,
            TokenKind::Nullable => SyntaxKind::NULLABLE_KW,
            TokenKind::Bonded => SyntaxKind::BONDED_KW,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::FloatLiteral => SyntaxKind::FLOAT_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::ColonColon => SyntaxKind::COLON_COLON,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::LineComment => SyntaxKind::LINE_COMMENT,
            TokenKind::BlockComment => SyntaxKind::BLOCK_COMMENT,
            TokenKind::Error => SyntaxKind::ERROR_TOKEN,
            TokenKind::Eof => SyntaxKind::EOF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn trivia_kinds_identified() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::LINE_COMMENT.is_trivia());
        assert!(SyntaxKind::BLOCK_COMMENT.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
        assert!(!SyntaxKind::STRUCT_KW.is_trivia());
        assert!(!SyntaxKind::SOURCE_FILE.is_trivia());
    }

    #[test]
    fn token_kind_maps_to_syntax_kind() {
        assert_eq!(SyntaxKind::from(TokenKind::Struct), SyntaxKind::STRUCT_KW);
        assert_eq!(SyntaxKind::from(TokenKind::Ident), SyntaxKind::IDENT);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::EOF);
    }

    #[test]
    fn composite_node_kinds_exist() {
        let kinds = [
            SyntaxKind::SOURCE_FILE,
            SyntaxKind::IMPORT_DECL,
            SyntaxKind::NAMESPACE_DECL,
            SyntaxKind::FORWARD_DECL,
            SyntaxKind::ALIAS_DECL,
            SyntaxKind::STRUCT_DECL,
            SyntaxKind::VIEW_OF_CLAUSE,
            SyntaxKind::STRUCT_BODY,
            SyntaxKind::FIELD_DECL,
            SyntaxKind::ENUM_DECL,
            SyntaxKind::ENUM_CONSTANT,
            SyntaxKind::SERVICE_DECL,
            SyntaxKind::METHOD_DECL,
            SyntaxKind::TYPE_REF,
            SyntaxKind::TYPE_PARAM_LIST,
            SyntaxKind::TYPE_ARG_LIST,
            SyntaxKind::ATTR,
            SyntaxKind::QUALIFIED_NAME,
            SyntaxKind::DEFAULT_VALUE,
        ];
        assert!(kinds.len() >= 15);
    }
}
