//! Event-based parser for Bond IDL.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction (matklad's event-based approach, as in
//! rust-analyzer).
//!
//! Bond has no newline-significant syntax: statements are terminated by
//! `;`/`{}` so there is no
//! delimiter-depth tracking here. Whitespace and comments are always
//! trivia and are always skipped by lookahead, but still emitted into the
//! tree via `advance()` so the CST remains lossless.

pub(crate) mod items;

use bond_common::span::Span;
use bond_common::token::{Token, TokenKind};

use crate::syntax_kind::SyntaxKind;

/// A parser event. Events are collected during parsing and later converted
/// into a rowan green tree by [`Parser::build_tree`].
#[derive(Debug)]
enum Event {
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// An opaque marker for a completed (opened and closed) CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser for Bond source code.
pub(crate) struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    errors: Vec<bond_common::diagnostics::ParseError>,
    /// First-error-wins: once set, `parse_source_file` stops descending
    /// into further declarations (the grammar failure mode).
    has_error: bool,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            has_error: false,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut pos = self.pos;
        let mut remaining = n;
        loop {
            pos = self.skip_to_significant(pos);
            if pos >= self.tokens.len() {
                return SyntaxKind::EOF;
            }
            if remaining == 0 {
                return SyntaxKind::from(self.tokens[pos].kind.clone());
            }
            remaining -= 1;
            pos += 1;
        }
    }

    /// Text of the Nth significant token ahead (`nth_text(0)` == `current_text()`).
    pub(crate) fn nth_text(&self, n: usize) -> &str {
        let mut pos = self.pos;
        let mut remaining = n;
        loop {
            pos = self.skip_to_significant(pos);
            if pos >= self.tokens.len() {
                return "";
            }
            if remaining == 0 {
                let span = &self.tokens[pos].span;
                return &self.source[span.start as usize..span.end as usize];
            }
            remaining -= 1;
            pos += 1;
        }
    }

    pub(crate) fn current_text(&self) -> &str {
        self.nth_text(0)
    }

    pub(crate) fn current_span(&self) -> Span {
        let pos = self.skip_to_significant(self.pos);
        if pos < self.tokens.len() {
            self.tokens[pos].span
        } else {
            let end = self.source.len() as u32;
            Span::new(end, end)
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    // ── Mutation: node management ──────────────────────────────────────

    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot_kind, .. } = &mut self.events[m.index] {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    pub(crate) fn advance(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    pub(crate) fn advance_with_error(&mut self, message: &str) {
        let m = self.open();
        self.error(message);
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, emit an error and return false.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!(
                "expected {:?}, found {:?} (`{}`)",
                kind,
                self.current(),
                self.current_text()
            ));
            false
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        let (line, column) = bond_common::span::LineIndex::new(self.source).line_col(span.start);
        self.errors.push(bond_common::diagnostics::ParseError::new(
            bond_common::diagnostics::ErrorKind::SyntaxError,
            message,
            line,
            column,
        ));
        self.has_error = true;
    }

    pub(crate) fn has_error(&self) -> bool {
        self.has_error
    }

    fn skip_to_significant(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.tokens[pos].kind.is_trivia() {
            pos += 1;
        }
        pos
    }

    // ── Tree building ──────────────────────────────────────────────────

    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<bond_common::diagnostics::ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        let mut i = 0;
        while i < self.events.len() {
            match self.events[i] {
                Event::Open { kind, forward_parent } => {
                    if forward_parent.is_some() {
                        forward_parents.clear();
                        let mut current = i;
                        loop {
                            let (fk, fp) = match self.events[current] {
                                Event::Open { kind, forward_parent } => (kind, forward_parent),
                                _ => unreachable!(),
                            };
                            forward_parents.push((current, fk));
                            match fp {
                                Some(next) => current = next,
                                None => break,
                            }
                        }
                        for &(fp_idx, _) in forward_parents.iter().skip(1) {
                            if let Event::Open { ref mut kind, ref mut forward_parent } =
                                self.events[fp_idx]
                            {
                                *kind = SyntaxKind::TOMBSTONE;
                                *forward_parent = None;
                            }
                        }
                        if let Event::Open { ref mut forward_parent, .. } = self.events[i] {
                            *forward_parent = None;
                        }
                        for &(_, fk) in forward_parents.iter().rev() {
                            if fk != SyntaxKind::TOMBSTONE {
                                builder.start_node(rowan::SyntaxKind(fk as u16));
                            }
                        }
                    } else if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => {
                    builder.finish_node();
                }
                Event::Advance => {
                    if token_pos < self.tokens.len() {
                        let token = &self.tokens[token_pos];
                        let syntax_kind = SyntaxKind::from(token.kind.clone());
                        let text = &self.source[token.span.start as usize..token.span.end as usize];
                        builder.token(rowan::SyntaxKind(syntax_kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
            i += 1;
        }

        (builder.finish(), self.errors)
    }
}

/// Keywords that start a declaration, used for error-recovery resync:
/// on a malformed declaration, skip ahead to the next one of these or
/// `}`/`;`.
pub(crate) fn starts_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::STRUCT_KW
            | SyntaxKind::ENUM_KW
            | SyntaxKind::SERVICE_KW
            | SyntaxKind::USING_KW
            | SyntaxKind::L_BRACKET
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_lexer::Lexer;

    #[test]
    fn smoke_test_parser_produces_green_node() {
        let source = "namespace x";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        let ns = parser.open();
        parser.advance(); // namespace
        parser.advance(); // x
        parser.close(ns, SyntaxKind::NAMESPACE_DECL);
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty());
        let root_node = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(root_node.kind(), SyntaxKind::SOURCE_FILE);
        let children: Vec<_> = root_node.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), SyntaxKind::NAMESPACE_DECL);
    }

    #[test]
    fn trivia_is_always_skipped_by_lookahead() {
        let source = "namespace /* c */ x";
        let tokens = Lexer::tokenize(source);
        let parser = Parser::new(tokens, source);
        assert_eq!(parser.current(), SyntaxKind::NAMESPACE_KW);
        assert_eq!(parser.nth(1), SyntaxKind::IDENT);
    }

    #[test]
    fn expect_records_error_on_mismatch() {
        let source = "namespace";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);
        assert!(parser.expect(SyntaxKind::NAMESPACE_KW));
        assert!(!parser.expect(SyntaxKind::IDENT));
        assert!(parser.has_error());
    }
}
