//! Tokenizer errors

use std::fmt;

/// Input that cannot be tokenized any further
///
/// Only unrecognisable characters end tokenizing. Recoverable oddities (a bad digit
/// in an octal literal, a quote that never closes) are flagged on the token instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based character column of the offending character.
    pub column: usize,
    pub message: String,
}

impl TokenizeError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tokenizing error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for TokenizeError {}

impl From<TokenizeError> for String {
    fn from(err: TokenizeError) -> Self {
        err.to_string()
    }
}
