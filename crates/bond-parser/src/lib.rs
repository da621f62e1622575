//! Grammar parser: produces a rowan-based lossless CST for Bond IDL source.
//!
//! This crate turns the token stream from `bond-lexer` into a concrete
//! syntax tree using `rowan`. The CST keeps every token, including
//! whitespace and comments, so a hypothetical external formatter could
//! round-trip source text exactly; the compiler core itself only walks
//! the significant nodes.

pub mod ast;
pub mod cst;
mod parser;
pub mod syntax_kind;

pub use bond_common::diagnostics::ParseError;
pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use syntax_kind::SyntaxKind;

/// Result of parsing one Bond source file.
///
/// Holds the green tree (the immutable, cheap-to-clone CST) and any
/// syntax errors encountered. Error recovery wraps unparsable spans in
/// `ERROR_NODE` rather than aborting, so a `Parse` with `errors()`
/// non-empty still has a usable (partial) tree.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Syntax errors encountered while parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a Bond source file into a CST.
///
/// Lexes `source`, parses the resulting token stream, and returns a
/// [`Parse`] holding the syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    let tokens = bond_lexer::Lexer::tokenize(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::items::parse_file(&mut p);
    let (green, errors) = p.build_tree();
    Parse { green, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trivial_file() {
        let result = parse("namespace ns\nstruct S {}\n");
        assert!(result.ok(), "{:?}", result.errors());
        assert_eq!(result.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn reports_errors_without_panicking() {
        let result = parse("namespace ns\nstruct {}\n");
        assert!(!result.ok());
        // The tree is still usable even though it contains an ERROR_NODE.
        let _ = result.syntax();
    }
}
