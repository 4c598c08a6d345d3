//! Barewords and everything that starts like one
//!
//!     A letter or underscore starts a word, but the word may turn out to be a label,
//!     a word operator (`eq`, `and`), the repetition operator `x`, a version string
//!     (`v5.36.0`), a quote-like operator (`qw(...)`, `s{..}{..}`) or the `__END__`
//!     / `__DATA__` separator. Words forced to stay plain (hash keys, method names,
//!     sub names, fat-comma operands) skip all of those checks.

use super::context::Expect;
use super::cursor::Mark;
use super::error::TokenizeError;
use super::tokenizer::Tokenizer;
use super::zones::Zone;
use crate::cst::classify;
use crate::cst::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Alphabetic}_]\w*(?:::\w+)*(?:::)?").unwrap());

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v\d+(?:\.\d+)+").unwrap());

static REPEAT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^x\d+$").unwrap());

/// Byte length of the word at the start of `rest`.
pub fn word_len(rest: &str) -> usize {
    WORD_REGEX.find(rest).map(|m| m.end()).unwrap_or(0)
}

fn skip_blanks(text: &str) -> &str {
    text.trim_start_matches([' ', '\t'])
}

impl Tokenizer<'_> {
    pub(super) fn scan_word(&mut self, start: Mark) -> Result<Token, TokenizeError> {
        let rest = self.cursor.rest();

        if let Some(m) = VERSION_REGEX.find(rest) {
            let tail = &rest[m.end()..];
            if !tail.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
                let text = self.cursor.bump(m.end());
                return Ok(self.token(TokenKind::NumberVersion, text, start));
            }
        }

        let len = word_len(rest).max(1);
        let word = &rest[..len];
        let after = &rest[len..];
        let forced = self.forced_word(after);

        if matches!(word, "__END__" | "__DATA__") && self.context.at_statement_start() {
            self.zone = if word == "__END__" { Zone::End } else { Zone::Data };
            debug!(line = start.line, zone = ?self.zone, "switching zone");
            let text = self.cursor.bump(len);
            return Ok(self.token(TokenKind::Separator, text, start));
        }

        if !forced {
            if let Some(token) = self.scan_label(start, word, after) {
                return Ok(token);
            }
            if let Some(token) = self.scan_word_operator(start, word, after) {
                return Ok(token);
            }
            if classify::is_quote_like(word) {
                if let Some(token) = self.scan_quote_like(start, len) {
                    return Ok(token);
                }
            }
        }

        let text = self.cursor.bump(len);
        Ok(self.token(TokenKind::Word, text, start))
    }

    // Positions where a word can only be a plain name.
    fn forced_word(&self, after: &str) -> bool {
        skip_blanks(after).starts_with("=>")
            || self.context.after_arrow()
            || self.context.after_sub_keyword()
            || (self.context.after_open_curly() && skip_blanks(after).starts_with('}'))
    }

    fn scan_label(&mut self, start: Mark, word: &str, after: &str) -> Option<Token> {
        if !self.context.at_statement_start()
            || word.contains("::")
            || classify::is_quote_like(word)
        {
            return None;
        }
        let blanks = after.len() - skip_blanks(after).len();
        let tail = &after[blanks..];
        if !tail.starts_with(':') || tail.starts_with("::") {
            return None;
        }
        let text = self.cursor.bump(word.len() + blanks + 1);
        Some(self.token(TokenKind::Label, text, start))
    }

    fn scan_word_operator(&mut self, start: Mark, word: &str, after: &str) -> Option<Token> {
        let expect = self.context.expects();
        let len = match word {
            // Repetition only makes sense after a term
            "x" if expect == Expect::Operator => {
                if after.starts_with('=') && !after.starts_with("==") && !after.starts_with("=~") {
                    2
                } else {
                    1
                }
            }
            _ if expect == Expect::Operator && REPEAT_REGEX.is_match(word) => 1,
            "x" => return None,
            "isa" if expect != Expect::Operator => return None,
            _ if classify::is_word_operator(word) => word.len(),
            _ => return None,
        };
        let text = self.cursor.bump(len);
        Some(self.token(TokenKind::Operator, text, start))
    }
}
