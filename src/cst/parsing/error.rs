//! Parser errors
//!
//!     Every variant is fatal: the parse is abandoned and no tree is returned.
//!     Recoverable oddities (unmatched braces, damaged literals) never show up here;
//!     they are flagged on elements and passed to the [Reporter](crate::cst::report::Reporter).

use crate::cst::ast::TreeError;
use crate::cst::lexing::TokenizeError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The tokenizer could not continue.
    Tokenize(TokenizeError),
    /// Brackets nested deeper than the configured limit.
    NestingTooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
    /// The statement continuation rules had no answer for this token: a grammar gap,
    /// not bad input.
    Unreachable {
        line: usize,
        column: usize,
        message: String,
    },
    /// Tree building went wrong while consuming a well-formed token stream.
    Tree { line: usize, cause: TreeError },
}

impl ParseError {
    /// 1-based line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Tokenize(err) => err.line,
            ParseError::NestingTooDeep { line, .. }
            | ParseError::Unreachable { line, .. }
            | ParseError::Tree { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Tokenize(err) => write!(f, "{err}"),
            ParseError::NestingTooDeep {
                line,
                column,
                limit,
            } => write!(
                f,
                "Nesting too deep at {line}:{column}: more than {limit} levels of brackets"
            ),
            ParseError::Unreachable {
                line,
                column,
                message,
            } => write!(f, "Illegal parser state at {line}:{column}: {message}"),
            ParseError::Tree { line, cause } => write!(f, "Tree error near line {line}: {cause}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Tokenize(err) => Some(err),
            ParseError::Tree { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<TokenizeError> for ParseError {
    fn from(err: TokenizeError) -> Self {
        ParseError::Tokenize(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::NestingTooDeep {
            line: 4,
            column: 9,
            limit: 2,
        };
        assert_eq!(
            err.to_string(),
            "Nesting too deep at 4:9: more than 2 levels of brackets"
        );
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn test_tokenize_error_passes_through() {
        let err: ParseError = TokenizeError::new(1, 2, "unexpected character").into();
        assert_eq!(
            err.to_string(),
            "Tokenizing error at 1:2: unexpected character"
        );
    }
}
