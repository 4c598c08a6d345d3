//! Tokenizer state machine
//!
//!     The tokenizer is pulled one token at a time. Each call looks at the first
//!     unconsumed character and the current [Zone], picks the scanner for that
//!     character class, and lets the scanner consume as much as belongs to the token.
//!     Scanners may reclassify as they go (a number that turns out to be hex, a word
//!     that turns out to be a `s{}{}` substitution).
//!
//!     Produced tokens can be pushed back with [Tokenizer::rollback]; they are then
//!     served again, in order, before any new scanning happens. Lookahead uses the
//!     same buffer, so peeking never rescans.
//!
//!     Every byte of the input ends up in exactly one token, except heredoc bodies,
//!     which are carried inside their marker token (see [HereDoc](crate::cst::token::HereDoc)).

use super::context::{Context, Expect};
use super::cursor::{Cursor, Mark};
use super::error::TokenizeError;
use super::operators::operator_len;
use super::zones::Zone;
use crate::cst::classify;
use crate::cst::token::{Token, TokenKind};
use std::collections::VecDeque;
use tracing::trace;

const BOM: char = '\u{FEFF}';

pub struct Tokenizer<'a> {
    pub(super) cursor: Cursor<'a>,
    pub(super) zone: Zone,
    pub(super) context: Context,
    buffer: VecDeque<Token>,
    started: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            zone: Zone::Code,
            context: Context::default(),
            buffer: VecDeque::new(),
            started: false,
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The next token, replaying rolled-back tokens first. `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        if let Some(token) = self.buffer.pop_front() {
            return Ok(Some(token));
        }
        self.scan()
    }

    /// Push a token back; it will be the next one served.
    pub fn rollback(&mut self, token: Token) {
        self.buffer.push_front(token);
    }

    /// Push several tokens back, preserving their order.
    pub fn rollback_all(&mut self, tokens: impl IntoIterator<Item = Token>) {
        let tokens: Vec<Token> = tokens.into_iter().collect();
        for token in tokens.into_iter().rev() {
            self.buffer.push_front(token);
        }
    }

    /// The next significant token, without consuming anything.
    pub fn peek_significant(&mut self) -> Result<Option<&Token>, TokenizeError> {
        let mut index = 0;
        loop {
            if index == self.buffer.len() {
                match self.scan()? {
                    Some(token) => self.buffer.push_back(token),
                    None => return Ok(None),
                }
            }
            if self.buffer[index].significant() {
                return Ok(self.buffer.get(index));
            }
            index += 1;
        }
    }

    /// Tokenize everything that is left.
    pub fn all_tokens(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn scan(&mut self) -> Result<Option<Token>, TokenizeError> {
        loop {
            if self.cursor.is_done() {
                return Ok(None);
            }
            if !self.started {
                self.started = true;
                if self.cursor.peek() == Some(BOM) {
                    let start = self.cursor.mark();
                    let text = self.cursor.bump(BOM.len_utf8());
                    return Ok(Some(self.token(TokenKind::Bom, text, start)));
                }
            }
            if self.cursor.at_eol() {
                if !self.cursor.advance_line() {
                    return Ok(None);
                }
                continue;
            }

            let token = match self.zone {
                Zone::Code => self.scan_code()?,
                Zone::End => self.scan_end(),
                Zone::Data => self.scan_data(),
            };
            trace!(kind = %token.kind, line = token.line, column = token.column, "token");
            self.context.record(&token);
            return Ok(Some(token));
        }
    }

    pub(super) fn token(&self, kind: TokenKind, content: impl Into<String>, start: Mark) -> Token {
        Token::new(kind, content, start.line, start.column, start.offset)
    }

    fn scan_code(&mut self) -> Result<Token, TokenizeError> {
        let start = self.cursor.mark();
        if self.cursor.at_line_start() && self.pod_starts() {
            return Ok(self.scan_pod(start));
        }
        let Some(c) = self.cursor.peek() else {
            return Err(self.error(start, "unexpected end of line"));
        };
        let expect = self.context.expects();
        let next = self.cursor.peek_nth(1);

        match c {
            ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c' => Ok(self.scan_whitespace(start)),
            '#' => Ok(self.scan_comment(start)),
            c if (c.is_alphabetic() || c == '_') && self.context.expects_attribute() => {
                Ok(self.scan_attribute(start))
            }
            c if c.is_alphabetic() || c == '_' => self.scan_word(start),
            '0'..='9' => Ok(self.scan_number(start)),
            '.' if expect != Expect::Operator && next.is_some_and(|n| n.is_ascii_digit()) => {
                Ok(self.scan_number(start))
            }
            '$' | '@' => Ok(self.scan_sigil(start, c)),
            '%' | '&' | '*' if expect != Expect::Operator => match self.scan_glob_sigil(start, c) {
                Some(token) => Ok(token),
                None => self.scan_operator(start),
            },
            '\\' => {
                let text = self.cursor.bump(1);
                Ok(self.token(TokenKind::Cast, text, start))
            }
            '\'' | '"' | '`' => Ok(self.scan_quote(start, c)),
            '/' if self.pattern_allowed(expect, next) => Ok(self.scan_match(start)),
            '<' if expect != Expect::Operator => match self.scan_angle(start) {
                Some(token) => Ok(token),
                None => self.scan_operator(start),
            },
            '-' if expect != Expect::Operator => match self.scan_file_test(start) {
                Some(token) => Ok(token),
                None => self.scan_operator(start),
            },
            '(' if self.context.expects_prototype() => match self.scan_prototype(start) {
                Some(token) => Ok(token),
                None => Ok(self.scan_structure(start)),
            },
            '{' | '}' | '(' | ')' | '[' | ']' | ';' => Ok(self.scan_structure(start)),
            _ => self.scan_operator(start),
        }
    }

    // `/` starts a pattern where a term is expected; when the context is unclear a
    // following space or `=` reads as division.
    fn pattern_allowed(&self, expect: Expect, next: Option<char>) -> bool {
        match expect {
            Expect::Operand => true,
            Expect::Operator => false,
            Expect::Unknown => !matches!(next, Some(' ' | '\t' | '=') | None),
        }
    }

    fn scan_whitespace(&mut self, start: Mark) -> Token {
        let rest = self.cursor.rest();
        let mut len = rest
            .find(|c: char| !matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c'))
            .unwrap_or(rest.len());
        if rest[len..].starts_with('\n') {
            len += 1;
        }
        let text = self.cursor.bump(len);
        self.token(TokenKind::Whitespace, text, start)
    }

    fn scan_comment(&mut self, start: Mark) -> Token {
        let rest = self.cursor.rest();
        let mut len = rest.find('\n').unwrap_or(rest.len());
        if rest[..len].ends_with('\r') {
            len -= 1;
        }
        let text = self.cursor.bump(len);
        self.token(TokenKind::Comment, text, start)
    }

    fn scan_structure(&mut self, start: Mark) -> Token {
        let text = self.cursor.bump(1);
        self.token(TokenKind::Structure, text, start)
    }

    fn scan_operator(&mut self, start: Mark) -> Result<Token, TokenizeError> {
        match operator_len(self.cursor.rest()) {
            Some(len) => {
                let text = self.cursor.bump(len);
                Ok(self.token(TokenKind::Operator, text, start))
            }
            None => {
                let c = self.cursor.peek().unwrap_or(' ');
                Err(self.error(start, format!("unexpected character {:?}", c)))
            }
        }
    }

    /// File test operator such as `-e` or `-d`, emitted as one operator token.
    fn scan_file_test(&mut self, start: Mark) -> Option<Token> {
        let mut chars = self.cursor.rest().chars().skip(1);
        let letter = chars.next()?;
        if !classify::is_file_test(letter) {
            return None;
        }
        match chars.next() {
            Some(c) if c.is_alphanumeric() || c == '_' => return None,
            Some('=') if self.cursor.rest()[2..].starts_with("=>") => return None,
            _ => {}
        }
        let text = self.cursor.bump(2);
        Some(self.token(TokenKind::Operator, text, start))
    }

    fn scan_prototype(&mut self, start: Mark) -> Option<Token> {
        let rest = self.cursor.rest();
        let close = rest.find(')')?;
        let text = self.cursor.bump(close + 1);
        Some(self.token(TokenKind::Prototype, text, start))
    }

    /// Sub attribute, with its optional parenthesised argument.
    fn scan_attribute(&mut self, start: Mark) -> Token {
        let rest = self.cursor.rest();
        let mut len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if rest[len..].starts_with('(') {
            if let Some(close) = rest[len..].find(')') {
                len += close + 1;
            }
        }
        let text = self.cursor.bump(len);
        self.token(TokenKind::Attribute, text, start)
    }

    pub(super) fn error(&self, start: Mark, message: impl Into<String>) -> TokenizeError {
        TokenizeError::new(start.line, start.column, message)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
