//! Literal unescaping and parsing shared by the AST Builder.

/// Unescape a string literal's raw source text, including the surrounding
/// quotes and an optional leading `L` wide-string prefix (discarded here).
///
/// Supports `\\ \" \' \b \t \n \f \r`, `\xHH`, `\uHHHH`, `\UHHHHHHHH`, and
/// octal `\NNN` escapes. Malformed escapes are passed through
/// literally rather than rejected -- the lexer already turned genuinely
/// unterminated strings into `Error` tokens before this ever runs.
pub fn unescape_string(raw: &str) -> String {
    let raw = raw.strip_prefix('L').unwrap_or(raw);
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('b') => out.push('\u{8}'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\u{c}'),
            Some('r') => out.push('\r'),
            Some('x') => push_hex_escape(&mut chars, &mut out, 2),
            Some('u') => push_hex_escape(&mut chars, &mut out, 4),
            Some('U') => push_hex_escape(&mut chars, &mut out, 8),
            Some(d) if d.is_digit(8) => {
                let mut value = d.to_digit(8).unwrap();
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if let Some(ch) = char::from_u32(value) {
                    out.push(ch);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn push_hex_escape(chars: &mut std::iter::Peekable<std::str::Chars>, out: &mut String, max_digits: usize) {
    let mut value: u32 = 0;
    let mut consumed = 0;
    while consumed < max_digits {
        match chars.peek().and_then(|c| c.to_digit(16)) {
            Some(digit) => {
                value = value * 16 + digit;
                chars.next();
                consumed += 1;
            }
            None => break,
        }
    }
    if let Some(ch) = char::from_u32(value) {
        out.push(ch);
    }
}

/// Parse an integer literal (decimal or `0x…`), applying an optional
/// leading sign. Returns `None` on overflow of a signed 64-bit integer.
pub fn parse_int_literal(text: &str, negative: bool) -> Option<i64> {
    let unsigned: u64 = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()?
    } else {
        text.parse().ok()?
    };
    if negative {
        // i64::MIN has a magnitude one greater than i64::MAX; handle it
        // explicitly rather than overflowing through `as i64`.
        if unsigned == (i64::MAX as u64) + 1 {
            Some(i64::MIN)
        } else {
            i64::try_from(unsigned).ok().map(|v| -v)
        }
    } else {
        i64::try_from(unsigned).ok()
    }
}

/// Parse a field ordinal: must fit in an unsigned 16-bit integer.
pub fn parse_ordinal(text: &str) -> Option<u16> {
    parse_int_literal(text, false).and_then(|v| u16::try_from(v).ok())
}

/// Parse a float literal, applying an optional leading sign.
pub fn parse_float_literal(text: &str, negative: bool) -> Option<f64> {
    let value: f64 = text.parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_basic_escapes() {
        assert_eq!(unescape_string(r#""a\"b""#), "a\"b");
        assert_eq!(unescape_string(r#""a\nb""#), "a\nb");
    }

    #[test]
    fn unescapes_wide_string_prefix() {
        assert_eq!(unescape_string(r#"L"hi""#), "hi");
    }

    #[test]
    fn unescapes_hex_and_unicode_escapes() {
        assert_eq!(unescape_string(r#""\x41""#), "A");
        assert_eq!(unescape_string(r#""A""#), "A");
        assert_eq!(unescape_string(r#""\U00000041""#), "A");
    }

    #[test]
    fn unescapes_octal() {
        assert_eq!(unescape_string(r#""\101""#), "A");
    }

    #[test]
    fn parses_decimal_and_hex_integers() {
        assert_eq!(parse_int_literal("42", false), Some(42));
        assert_eq!(parse_int_literal("0x1F", false), Some(31));
        assert_eq!(parse_int_literal("42", true), Some(-42));
    }

    #[test]
    fn parses_ordinal_range() {
        assert_eq!(parse_ordinal("65535"), Some(65535));
        assert_eq!(parse_ordinal("65536"), None);
    }

    #[test]
    fn parses_float_with_sign() {
        assert_eq!(parse_float_literal("3.14", false), Some(3.14));
        assert_eq!(parse_float_literal("5", true), Some(-5.0));
    }
}
