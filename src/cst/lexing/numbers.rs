//! Numeric literals

use super::cursor::Mark;
use super::tokenizer::Tokenizer;
use crate::cst::token::{Attribute, Token, TokenKind};

fn run(rest: &str, from: usize, accept: impl Fn(u8) -> bool) -> usize {
    rest.as_bytes()[from.min(rest.len())..]
        .iter()
        .take_while(|b| accept(**b))
        .count()
}

fn is_digit_or_underscore(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

// Exponent length at `from`: `e`, optional sign, at least one digit.
fn exponent_len(rest: &str, from: usize) -> usize {
    let bytes = rest.as_bytes();
    if !matches!(bytes.get(from), Some(b'e' | b'E')) {
        return 0;
    }
    let mut len = 1;
    if matches!(bytes.get(from + len), Some(b'+' | b'-')) {
        len += 1;
    }
    if !bytes.get(from + len).is_some_and(u8::is_ascii_digit) {
        return 0;
    }
    len + run(rest, from + len, is_digit_or_underscore)
}

/// Classify the number at the start of `rest`: its kind, byte length and attribute.
pub fn scan_number_text(rest: &str) -> (TokenKind, usize, Attribute) {
    let bytes = rest.as_bytes();
    let flag = |invalid: bool| if invalid { Attribute::Invalid } else { Attribute::None };

    if bytes.first() == Some(&b'0') {
        match bytes.get(1) {
            Some(b'x' | b'X') => {
                let len = 2 + run(rest, 2, |b| b.is_ascii_alphanumeric() || b == b'_');
                let invalid = rest[2..len].bytes().any(|b| !b.is_ascii_hexdigit() && b != b'_');
                return (TokenKind::NumberHex, len, flag(invalid));
            }
            Some(b'b' | b'B') => {
                let len = 2 + run(rest, 2, |b| b.is_ascii_alphanumeric() || b == b'_');
                let invalid = rest[2..len].bytes().any(|b| !matches!(b, b'0' | b'1' | b'_'));
                return (TokenKind::NumberBinary, len, flag(invalid));
            }
            Some(b'o' | b'O') => {
                let len = 2 + run(rest, 2, is_digit_or_underscore);
                let invalid = rest[2..len].bytes().any(|b| matches!(b, b'8' | b'9'));
                return (TokenKind::NumberOctal, len, flag(invalid));
            }
            Some(b) if b.is_ascii_digit() => {
                let len = 1 + run(rest, 1, is_digit_or_underscore);
                let invalid = rest[1..len].bytes().any(|b| matches!(b, b'8' | b'9'));
                return (TokenKind::NumberOctal, len, flag(invalid));
            }
            _ => {}
        }
    }

    let mut len = run(rest, 0, is_digit_or_underscore);
    let mut kind = TokenKind::Number;

    if bytes.get(len) == Some(&b'.') {
        match bytes.get(len + 1) {
            // Range operator
            Some(b'.') => return (kind, len, Attribute::None),
            Some(b) if b.is_ascii_digit() => {
                len += 1 + run(rest, len + 1, is_digit_or_underscore);
                kind = TokenKind::NumberFloat;
                if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
                    while bytes.get(len) == Some(&b'.')
                        && bytes.get(len + 1).is_some_and(u8::is_ascii_digit)
                    {
                        len += 1 + run(rest, len + 1, is_digit_or_underscore);
                    }
                    return (TokenKind::NumberVersion, len, Attribute::None);
                }
            }
            Some(b'e' | b'E') if len > 0 && exponent_len(rest, len + 1) > 0 => {
                len += 1;
                kind = TokenKind::NumberFloat;
            }
            None | Some(b' ' | b'\t' | b'\r' | b'\n' | b';' | b')' | b',' | b']' | b'}')
                if len > 0 =>
            {
                len += 1;
                kind = TokenKind::NumberFloat;
            }
            _ => {}
        }
    }

    let exponent = exponent_len(rest, len);
    if exponent > 0 {
        len += exponent;
        kind = TokenKind::NumberExp;
    }
    (kind, len.max(1), Attribute::None)
}

impl Tokenizer<'_> {
    pub(super) fn scan_number(&mut self, start: Mark) -> Token {
        let (kind, len, attr) = scan_number_text(self.cursor.rest());
        let text = self.cursor.bump(len);
        self.token(kind, text, start).with_attr(attr)
    }
}
