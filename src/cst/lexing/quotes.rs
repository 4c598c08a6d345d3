//! Delimited literals: quotes, quote-like operators and regexps
//!
//!     All of them share one section scanner. A section starts after its opening
//!     delimiter and ends at the matching close; bracket delimiters nest, any
//!     delimiter can be escaped with a backslash, and a section may span lines.
//!     Running out of input inside a section leaves it incomplete and the token
//!     flagged [Attribute::Damaged].
//!
//!     Substitution and transliteration have two sections. With bracket delimiters
//!     the second section has its own delimiters and may be separated from the first
//!     by whitespace (`s {a} {b}`); otherwise the closing delimiter of the first
//!     section opens the second (`s/a/b/`).

use super::cursor::Mark;
use super::tokenizer::Tokenizer;
use crate::cst::token::{Attribute, Delimited, Section, Token, TokenDetail, TokenKind};

/// Closing delimiter for an opening one.
pub fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

fn quote_like_kind(word: &str) -> Option<(TokenKind, usize, bool)> {
    // kind, section count, takes modifiers
    let entry = match word {
        "q" => (TokenKind::QuoteLiteral, 1, false),
        "qq" => (TokenKind::QuoteInterpolate, 1, false),
        "qw" => (TokenKind::QuoteLikeWords, 1, false),
        "qx" => (TokenKind::QuoteLikeCommand, 1, false),
        "qr" => (TokenKind::QuoteLikeRegexp, 1, true),
        "m" => (TokenKind::RegexpMatch, 1, true),
        "s" => (TokenKind::RegexpSubstitute, 2, true),
        "tr" | "y" => (TokenKind::RegexpTransliterate, 2, true),
        _ => return None,
    };
    Some(entry)
}

impl Tokenizer<'_> {
    /// `'...'`, `"..."` or `` `...` ``.
    pub(super) fn scan_quote(&mut self, start: Mark, quote: char) -> Token {
        let kind = match quote {
            '\'' => TokenKind::QuoteSingle,
            '"' => TokenKind::QuoteDouble,
            _ => TokenKind::QuoteLikeBacktick,
        };
        let mut content = String::from(self.cursor.bump(1));
        let section = self.scan_section(quote, quote, &mut content);
        let end = content.len();
        self.delimited_token(kind, content, start, 0, vec![section], end..end)
    }

    /// A bare `/.../` match.
    pub(super) fn scan_match(&mut self, start: Mark) -> Token {
        let mut content = String::from(self.cursor.bump(1));
        let section = self.scan_section('/', '/', &mut content);
        let modifiers = if section.complete {
            self.scan_modifiers(&mut content)
        } else {
            content.len()..content.len()
        };
        self.delimited_token(TokenKind::RegexpMatch, content, start, 0, vec![section], modifiers)
    }

    /// The quote-like operator whose word is the first `word_len` bytes of the rest of
    /// the line. `None` when what follows the word cannot be a delimiter, in which case
    /// nothing is consumed.
    pub(super) fn scan_quote_like(&mut self, start: Mark, word_len: usize) -> Option<Token> {
        let rest = self.cursor.rest();
        let (kind, section_count, takes_modifiers) = quote_like_kind(&rest[..word_len])?;
        let after = &rest[word_len..];
        let blanks = after.len() - after.trim_start_matches([' ', '\t']).len();
        let open = after[blanks..].chars().next()?;
        let rejected = match open {
            '\n' | '\r' => true,
            c if c.is_alphanumeric() || c == '_' => true,
            ')' => true,
            '#' | '=' | ',' | ';' => blanks > 0,
            _ => false,
        };
        if rejected {
            return None;
        }

        let mut content = String::from(self.cursor.bump(word_len + blanks));
        content.push_str(self.cursor.bump(open.len_utf8()));
        let close = closing(open);
        let first = self.scan_section(open, close, &mut content);
        let mut complete = first.complete;
        let mut sections = vec![first];

        if section_count == 2 && complete {
            let second = if open != close {
                self.skip_section_gap(&mut content);
                match self.cursor.peek() {
                    Some(open) => {
                        content.push_str(self.cursor.bump(open.len_utf8()));
                        self.scan_section(open, closing(open), &mut content)
                    }
                    None => Section {
                        start: content.len(),
                        len: 0,
                        open,
                        close,
                        complete: false,
                    },
                }
            } else {
                self.scan_section(open, close, &mut content)
            };
            complete = second.complete;
            sections.push(second);
        }

        let modifiers = if takes_modifiers && complete {
            self.scan_modifiers(&mut content)
        } else {
            content.len()..content.len()
        };
        Some(self.delimited_token(kind, content, start, word_len, sections, modifiers))
    }

    /// Scan one section body; the opening delimiter has already been consumed.
    pub(super) fn scan_section(&mut self, open: char, close: char, content: &mut String) -> Section {
        let start = content.len();
        let nests = open != close;
        let mut depth = 0usize;
        loop {
            if self.cursor.at_eol() {
                if !self.cursor.advance_line() {
                    return Section {
                        start,
                        len: content.len() - start,
                        open,
                        close,
                        complete: false,
                    };
                }
                continue;
            }
            let rest = self.cursor.rest();
            let mut escaped = false;
            let mut found = None;
            for (i, c) in rest.char_indices() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == close {
                    if depth == 0 {
                        found = Some(i);
                        break;
                    }
                    depth -= 1;
                } else if nests && c == open {
                    depth += 1;
                }
            }
            match found {
                Some(i) => {
                    content.push_str(self.cursor.bump(i));
                    let len = content.len() - start;
                    content.push_str(self.cursor.bump(close.len_utf8()));
                    return Section {
                        start,
                        len,
                        open,
                        close,
                        complete: true,
                    };
                }
                None => content.push_str(self.cursor.bump_line()),
            }
        }
    }

    // Whitespace, possibly spanning lines, between two bracketed sections.
    fn skip_section_gap(&mut self, content: &mut String) {
        loop {
            if self.cursor.at_eol() {
                if !self.cursor.advance_line() {
                    return;
                }
                continue;
            }
            let rest = self.cursor.rest();
            let blanks = rest.len() - rest.trim_start().len();
            if blanks == 0 {
                return;
            }
            content.push_str(self.cursor.bump(blanks));
        }
    }

    fn scan_modifiers(&mut self, content: &mut String) -> std::ops::Range<usize> {
        let len = self
            .cursor
            .rest()
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        let from = content.len();
        content.push_str(self.cursor.bump(len));
        from..content.len()
    }

    fn delimited_token(
        &self,
        kind: TokenKind,
        content: String,
        start: Mark,
        operator_len: usize,
        sections: Vec<Section>,
        modifiers: std::ops::Range<usize>,
    ) -> Token {
        let damaged = sections.iter().any(|s| !s.complete);
        let token = self.token(kind, content, start).with_detail(TokenDetail::Delimited(Delimited {
            operator_len,
            sections,
            modifiers,
        }));
        if damaged {
            token.with_attr(Attribute::Damaged)
        } else {
            token
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::lexing::Tokenizer;
    use crate::cst::token::{Attribute, Token, TokenKind};

    fn first_significant(source: &str) -> Token {
        Tokenizer::new(source)
            .all_tokens()
            .unwrap()
            .into_iter()
            .find(|t| t.significant())
            .unwrap()
    }

    #[test]
    fn test_simple_quotes() {
        let token = first_significant(r#""a \" b" . 1"#);
        assert_eq!(token.kind, TokenKind::QuoteDouble);
        assert_eq!(token.content, r#""a \" b""#);
        assert_eq!(token.string(), Some(r#"a \" b"#));

        let token = first_significant("'it''s'");
        assert_eq!(token.content, "'it'");
    }

    #[test]
    fn test_substitution_with_nested_braces() {
        let token = first_significant("s{a}{if($1){foo()}};");
        assert_eq!(token.kind, TokenKind::RegexpSubstitute);
        assert_eq!(token.content, "s{a}{if($1){foo()}}");
        assert_eq!(token.section(0), Some("a"));
        assert_eq!(token.section(1), Some("if($1){foo()}"));
        assert_eq!(token.modifiers(), "");
    }

    #[test]
    fn test_substitution_shared_delimiter_and_modifiers() {
        let token = first_significant("s/foo/bar/gi;");
        assert_eq!(token.content, "s/foo/bar/gi");
        assert_eq!(token.section(0), Some("foo"));
        assert_eq!(token.section(1), Some("bar"));
        assert_eq!(token.modifiers(), "gi");
    }

    #[test]
    fn test_bracketed_sections_with_gap() {
        let token = first_significant("tr [a-z]\n   [A-Z];");
        assert_eq!(token.kind, TokenKind::RegexpTransliterate);
        assert_eq!(token.content, "tr [a-z]\n   [A-Z]");
        assert_eq!(token.section(1), Some("A-Z"));
    }

    #[test]
    fn test_quote_words_across_lines() {
        let token = first_significant("qw(\n  a b\n  c\n);");
        assert_eq!(token.kind, TokenKind::QuoteLikeWords);
        assert_eq!(token.string(), Some("\n  a b\n  c\n"));
        assert_eq!(token.newlines(), 3);
    }

    #[test]
    fn test_truncated_literal_is_damaged() {
        let token = first_significant("q{never closed\n");
        assert_eq!(token.kind, TokenKind::QuoteLiteral);
        assert_eq!(token.attr, Attribute::Damaged);
        assert_eq!(token.content, "q{never closed\n");
        assert!(!token.sections()[0].complete);
    }

    #[test]
    fn test_quote_word_without_delimiter() {
        let token = first_significant("s => 1");
        assert_eq!(token.kind, TokenKind::Word);
        let token = first_significant("y\n");
        assert_eq!(token.kind, TokenKind::Word);
    }

    #[test]
    fn test_bare_match_modifiers() {
        let token = first_significant("/a+b/xms;");
        assert_eq!(token.kind, TokenKind::RegexpMatch);
        assert_eq!(token.section(0), Some("a+b"));
        assert_eq!(token.modifiers(), "xms");
    }
}
