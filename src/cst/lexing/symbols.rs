//! Sigiled variables, casts and magic variables

use super::context::Expect;
use super::cursor::Mark;
use super::tokenizer::Tokenizer;
use crate::cst::classify;
use crate::cst::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:::)?[\p{Alphabetic}_]\w*(?:::\w+)*(?:::)?|^::").unwrap());

static CARET_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\^\w+\}").unwrap());

fn ident_len(text: &str) -> Option<usize> {
    IDENT_REGEX.find(text).map(|m| m.end())
}

fn starts_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '{' || c == '$' || c == ':'
}

/// Kind and byte length of the `$`-sigiled thing at the start of `rest`.
pub fn scalar_len(rest: &str) -> (TokenKind, usize) {
    let after = &rest[1..];
    let mut chars = after.chars();
    let first = chars.next();
    let second = chars.next();

    match first {
        Some('#') => {
            let tail = &after[1..];
            if tail.starts_with('{') || tail.starts_with('$') {
                (TokenKind::Cast, 2)
            } else if let Some(len) = ident_len(tail) {
                (TokenKind::ArrayIndex, 2 + len)
            } else {
                (TokenKind::Magic, 2)
            }
        }
        Some('{') => match CARET_NAME_REGEX.find(after) {
            Some(m) => (TokenKind::Magic, 1 + m.end()),
            None => (TokenKind::Cast, 1),
        },
        Some('^') if second.is_some_and(|c| c.is_ascii_uppercase() || "[]^_?\\".contains(c)) => {
            (TokenKind::Magic, 3)
        }
        Some('$') => {
            if second.is_some_and(starts_name) {
                (TokenKind::Cast, 1)
            } else {
                (TokenKind::Magic, 2)
            }
        }
        Some(c) if c.is_ascii_digit() => {
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            (TokenKind::Magic, 1 + digits)
        }
        Some(_) if ident_len(after).is_some() => {
            let len = ident_len(after).unwrap_or(0);
            let kind = if &after[..len] == "_" {
                TokenKind::Magic
            } else {
                TokenKind::Symbol
            };
            (kind, 1 + len)
        }
        Some(c) if classify::is_magic_punctuation(c) => (TokenKind::Magic, 1 + c.len_utf8()),
        _ => (TokenKind::Cast, 1),
    }
}

/// Kind and byte length of the `@`-sigiled thing at the start of `rest`.
pub fn array_len(rest: &str) -> (TokenKind, usize) {
    let after = &rest[1..];
    if let Some(m) = CARET_NAME_REGEX.find(after) {
        return (TokenKind::Magic, 1 + m.end());
    }
    if let Some(len) = ident_len(after) {
        let kind = if &after[..len] == "_" {
            TokenKind::Magic
        } else {
            TokenKind::Symbol
        };
        return (kind, 1 + len);
    }
    match after.chars().next() {
        Some('-' | '+') if !after[1..].starts_with(|c: char| c.is_alphanumeric() || c == '$') => {
            (TokenKind::Magic, 2)
        }
        _ => (TokenKind::Cast, 1),
    }
}

impl Tokenizer<'_> {
    pub(super) fn scan_sigil(&mut self, start: Mark, sigil: char) -> Token {
        let rest = self.cursor.rest();
        let (kind, len) = if sigil == '$' {
            scalar_len(rest)
        } else {
            array_len(rest)
        };
        let text = self.cursor.bump(len);
        self.token(kind, text, start)
    }

    /// `%hash`, `&code` or `*glob`, or a cast using one of those sigils. `None` when
    /// the character reads as an operator here.
    pub(super) fn scan_glob_sigil(&mut self, start: Mark, sigil: char) -> Option<Token> {
        let rest = self.cursor.rest();
        let after = &rest[1..];
        let next = after.chars().next()?;
        let (kind, len) = if let Some(len) = ident_len(after) {
            (TokenKind::Symbol, 1 + len)
        } else if sigil == '%' && CARET_NAME_REGEX.is_match(after) {
            let len = CARET_NAME_REGEX.find(after).map(|m| m.end()).unwrap_or(0);
            (TokenKind::Magic, 1 + len)
        } else if next == '$' || next == '{' {
            (TokenKind::Cast, 1)
        } else if sigil == '%'
            && self.context.expects() == Expect::Operand
            && matches!(next, '+' | '-' | '!')
            && !after[1..].starts_with(|c: char| c.is_alphanumeric() || c == '$' || c == '(')
        {
            (TokenKind::Magic, 2)
        } else {
            return None;
        };
        let text = self.cursor.bump(len);
        Some(self.token(kind, text, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("$foo;", TokenKind::Symbol, "$foo")]
    #[case("$Foo::bar ", TokenKind::Symbol, "$Foo::bar")]
    #[case("$::x", TokenKind::Symbol, "$::x")]
    #[case("$_ ", TokenKind::Magic, "$_")]
    #[case("$1)", TokenKind::Magic, "$1")]
    #[case("$#array", TokenKind::ArrayIndex, "$#array")]
    #[case("$#{$r}", TokenKind::Cast, "$#")]
    #[case("$#$r", TokenKind::Cast, "$#")]
    #[case("$# ", TokenKind::Magic, "$#")]
    #[case("${^WARNING_BITS}", TokenKind::Magic, "${^WARNING_BITS}")]
    #[case("$^W", TokenKind::Magic, "$^W")]
    #[case("$$ref", TokenKind::Cast, "$")]
    #[case("$$;", TokenKind::Magic, "$$")]
    #[case("${name}", TokenKind::Cast, "$")]
    #[case("$@;", TokenKind::Magic, "$@")]
    #[case("$/ ", TokenKind::Magic, "$/")]
    fn test_scalars(#[case] input: &str, #[case] kind: TokenKind, #[case] text: &str) {
        let (found, len) = scalar_len(input);
        assert_eq!((found, &input[..len]), (kind, text));
    }

    #[rstest]
    #[case("@list", TokenKind::Symbol, "@list")]
    #[case("@_;", TokenKind::Magic, "@_")]
    #[case("@$ref", TokenKind::Cast, "@")]
    #[case("@{$ref}", TokenKind::Cast, "@")]
    #[case("@{^CAPTURE}", TokenKind::Magic, "@{^CAPTURE}")]
    #[case("@-)", TokenKind::Magic, "@-")]
    fn test_arrays(#[case] input: &str, #[case] kind: TokenKind, #[case] text: &str) {
        let (found, len) = array_len(input);
        assert_eq!((found, &input[..len]), (kind, text));
    }

    #[test]
    fn test_glob_sigils_in_operand_position() {
        let tokens: Vec<_> = Tokenizer::new("(%h, &f, *STDOUT, %$r, %+)")
            .all_tokens()
            .unwrap()
            .into_iter()
            .filter(|t| t.significant())
            .map(|t| (t.kind, t.content))
            .collect();
        let sigiled: Vec<_> = tokens
            .iter()
            .filter(|(kind, _)| matches!(kind, TokenKind::Symbol | TokenKind::Cast | TokenKind::Magic))
            .map(|(kind, content)| (*kind, content.as_str()))
            .collect();
        assert_eq!(
            sigiled,
            vec![
                (TokenKind::Symbol, "%h"),
                (TokenKind::Symbol, "&f"),
                (TokenKind::Symbol, "*STDOUT"),
                (TokenKind::Cast, "%"),
                (TokenKind::Symbol, "$r"),
                (TokenKind::Magic, "%+"),
            ]
        );
    }
}
