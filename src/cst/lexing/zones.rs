//! Documentation blocks and the regions after `__END__` / `__DATA__`

use super::cursor::Mark;
use super::tokenizer::Tokenizer;
use crate::cst::token::{Token, TokenKind};

/// What the rest of the input is being read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Code,
    /// After `__END__`: free text, with pod blocks still recognised.
    End,
    /// After `__DATA__`: everything is a single data token.
    Data,
}

fn is_cut_line(line: &str) -> bool {
    line.strip_prefix("=cut")
        .is_some_and(|tail| !tail.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

impl Tokenizer<'_> {
    /// A pod block starts here: `=` then a letter, at the start of a line.
    pub(super) fn pod_starts(&self) -> bool {
        let mut chars = self.cursor.rest().chars();
        self.cursor.at_line_start()
            && chars.next() == Some('=')
            && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Pod, from its opening line through the `=cut` line (or end of input).
    pub(super) fn scan_pod(&mut self, start: Mark) -> Token {
        let first = self.cursor.bump_line();
        let mut content = String::from(first);
        if !is_cut_line(first) {
            while self.cursor.advance_line() {
                let line = self.cursor.bump_line();
                content.push_str(line);
                if is_cut_line(line) {
                    break;
                }
            }
        }
        self.token(TokenKind::Pod, content, start)
    }

    pub(super) fn scan_end(&mut self) -> Token {
        let start = self.cursor.mark();
        if self.pod_starts() {
            return self.scan_pod(start);
        }
        let mut content = String::from(self.cursor.bump_line());
        while self.cursor.advance_line() {
            if self.pod_starts() {
                break;
            }
            content.push_str(self.cursor.bump_line());
        }
        self.token(TokenKind::End, content, start)
    }

    pub(super) fn scan_data(&mut self) -> Token {
        let start = self.cursor.mark();
        let mut content = String::from(self.cursor.bump_line());
        while self.cursor.advance_line() {
            content.push_str(self.cursor.bump_line());
        }
        self.token(TokenKind::Data, content, start)
    }
}
