//! Numeric literal values

use super::core::{Attribute, Token, TokenKind};

/// Parse the numeric value a number token denotes.
///
/// Returns `None` for non-number tokens, version strings and literals flagged
/// [Attribute::Invalid].
pub fn literal(token: &Token) -> Option<f64> {
    if token.attr == Attribute::Invalid {
        return None;
    }
    let digits: String = token.content.chars().filter(|c| *c != '_').collect();
    match token.kind {
        TokenKind::Number => digits.parse::<f64>().ok(),
        TokenKind::NumberFloat | TokenKind::NumberExp => {
            let trimmed = digits.strip_suffix('.').unwrap_or(&digits);
            trimmed.parse::<f64>().ok()
        }
        TokenKind::NumberHex => radix(strip_prefix(&digits, &["0x", "0X"]), 16),
        TokenKind::NumberBinary => radix(strip_prefix(&digits, &["0b", "0B"]), 2),
        TokenKind::NumberOctal => radix(strip_prefix(&digits, &["0o", "0O", "0"]), 8),
        _ => None,
    }
}

fn strip_prefix<'a>(digits: &'a str, prefixes: &[&str]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| digits.strip_prefix(prefix))
        .unwrap_or(digits)
}

fn radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return Some(0.0);
    }
    u128::from_str_radix(digits, radix).ok().map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1, 1, 0)
    }

    #[test]
    fn test_based_literals() {
        assert_eq!(literal(&number(TokenKind::NumberBinary, "0b1110011")), Some(115.0));
        assert_eq!(literal(&number(TokenKind::NumberHex, "0xFF")), Some(255.0));
        assert_eq!(literal(&number(TokenKind::NumberOctal, "0755")), Some(493.0));
        assert_eq!(literal(&number(TokenKind::NumberOctal, "0o17")), Some(15.0));
    }

    #[test]
    fn test_decimal_and_float() {
        assert_eq!(literal(&number(TokenKind::Number, "1_000")), Some(1000.0));
        assert_eq!(literal(&number(TokenKind::NumberFloat, "1.5")), Some(1.5));
        assert_eq!(literal(&number(TokenKind::NumberFloat, "3.")), Some(3.0));
        assert_eq!(literal(&number(TokenKind::NumberExp, "1e3")), Some(1000.0));
    }

    #[test]
    fn test_invalid_and_version_have_no_value() {
        let invalid = number(TokenKind::NumberOctal, "089").with_attr(Attribute::Invalid);
        assert_eq!(literal(&invalid), None);
        assert_eq!(literal(&number(TokenKind::NumberVersion, "v1.2.3")), None);
        assert_eq!(literal(&number(TokenKind::Word, "foo")), None);
    }
}
