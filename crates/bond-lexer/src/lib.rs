//! Bond lexer -- tokenizer for the Bond IDL grammar.

mod cursor;

use bond_common::token::{keyword_from_str, Token, TokenKind};
use cursor::Cursor;

/// The Bond lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or
/// collect them into a `Vec`. Whitespace and comments are emitted as
/// trivia tokens on the hidden channel rather than dropped, so a lossless
/// CST remains possible for an external formatter; the grammar parser's
/// lookahead skips them.
///
/// The lexer never raises an error itself: unterminated strings and
/// invalid escapes lex to a single `Error` token spanning what was
/// consumed, and the parser layer turns those into `ParseError`s.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(start),
            '/' if self.cursor.peek_next() == Some('/') => self.lex_line_comment(start),
            '/' if self.cursor.peek_next() == Some('*') => self.lex_block_comment(start),

            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '<' => self.single_char_token(TokenKind::Lt, start),
            '>' => self.single_char_token(TokenKind::Gt, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            '=' => self.single_char_token(TokenKind::Eq, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),

            ':' => {
                self.cursor.advance();
                if self.cursor.peek() == Some(':') {
                    self.cursor.advance();
                    Token::new(TokenKind::ColonColon, start, self.cursor.pos())
                } else {
                    Token::new(TokenKind::Colon, start, self.cursor.pos())
                }
            }

            '"' => self.lex_string(start),
            'L' if self.cursor.peek_next() == Some('"') => {
                self.cursor.advance();
                self.lex_string(start)
            }

            c if c.is_ascii_digit() => self.lex_number(start),
            c if is_ident_start(c) => self.lex_ident_or_keyword(start),

            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    fn lex_whitespace(&mut self, start: u32) -> Token {
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
        Token::new(TokenKind::Whitespace, start, self.cursor.pos())
    }

    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c != '\n');
        Token::new(TokenKind::LineComment, start, self.cursor.pos())
    }

    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            match self.cursor.peek() {
                None => break,
                Some('*') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        Token::new(TokenKind::BlockComment, start, self.cursor.pos())
    }

    /// String literal lexing: `\\ \" \' \b \t \n \f \r`,
    /// `\xHH`, `\uHHHH`, `\UHHHHHHHH`, and octal `\NNN` escapes. Unescaping
    /// itself happens in the AST builder (component C); here we only need
    /// to find the matching closing quote without being fooled by an
    /// escaped quote.
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '"'
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    // Unterminated string -- lexes to a single Error token.
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('"') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLiteral, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some() {
                        self.cursor.advance();
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Integer (`0x…` or decimal) and float literals.
    fn lex_number(&mut self, start: u32) -> Token {
        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_next(), Some('x') | Some('X'))
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            return Token::new(TokenKind::IntLiteral, start, self.cursor.pos());
        }

        self.cursor.eat_while(|c| c.is_ascii_digit());

        let mut is_float = false;
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        Token::new(
            if is_float {
                TokenKind::FloatLiteral
            } else {
                TokenKind::IntLiteral
            },
            start,
            self.cursor.pos(),
        )
    }

    fn lex_ident_or_keyword(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, end)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("struct Foo"),
            vec![
                TokenKind::Struct,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_namespace_and_import() {
        assert_eq!(
            kinds("import \"a.bond\";"),
            vec![
                TokenKind::Import,
                TokenKind::Whitespace,
                TokenKind::StringLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_hex_and_decimal_integers() {
        assert_eq!(kinds("0x1F"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
        assert_eq!(kinds("42"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lexes_float_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
        assert_eq!(kinds("1e10"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escape() {
        let toks = Lexer::tokenize(r#""a\"b""#);
        assert_eq!(toks[0].kind, TokenKind::StringLiteral);
        assert_eq!(toks[0].span, bond_common::span::Span::new(0, 6));
    }

    #[test]
    fn unterminated_string_is_error_token() {
        assert_eq!(kinds("\"abc"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn lexes_wide_string_prefix() {
        let toks = Lexer::tokenize(r#"L"hi""#);
        assert_eq!(toks[0].kind, TokenKind::StringLiteral);
    }

    #[test]
    fn lexes_comments_as_trivia() {
        assert_eq!(
            kinds("// hi\n/* block */struct"),
            vec![
                TokenKind::LineComment,
                TokenKind::BlockComment,
                TokenKind::Struct,
                TokenKind::Eof
            ]
        );
        assert!(TokenKind::LineComment.is_trivia());
        assert!(TokenKind::BlockComment.is_trivia());
    }

    #[test]
    fn lexes_colon_colon_for_meta_fields() {
        assert_eq!(
            kinds("bond_meta::name"),
            vec![
                TokenKind::Ident,
                TokenKind::ColonColon,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_generic_angle_brackets() {
        assert_eq!(
            kinds("vector<int32>"),
            vec![
                TokenKind::Vector,
                TokenKind::Lt,
                TokenKind::Int32,
                TokenKind::Gt,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }
}
