//! Anomaly reporting
//!
//!     The parser never prints. Failures and recoverable anomalies are handed to a
//!     [Reporter], which decides what, if anything, the user sees. Two are provided:
//!     [SilentReporter] drops everything, [StreamReporter] writes one line per event
//!     to a stream (stderr unless told otherwise).

use crate::cst::lexing::TokenizeError;
use crate::cst::token::Token;
use std::io::{self, Write};
use tracing::warn;

pub trait Reporter {
    /// The tokenizer gave up.
    fn tokenizer_failure(&mut self, error: &TokenizeError);

    /// Tree building failed on an otherwise well-formed token stream.
    fn tree_walk_failure(&mut self, cause: &str);

    /// A closing bracket that does not match the innermost open structure.
    fn unmatched_brace(&mut self, token: &Token);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn tokenizer_failure(&mut self, error: &TokenizeError) {
        (**self).tokenizer_failure(error)
    }

    fn tree_walk_failure(&mut self, cause: &str) {
        (**self).tree_walk_failure(cause)
    }

    fn unmatched_brace(&mut self, token: &Token) {
        (**self).unmatched_brace(token)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn tokenizer_failure(&mut self, _error: &TokenizeError) {}

    fn tree_walk_failure(&mut self, _cause: &str) {}

    fn unmatched_brace(&mut self, _token: &Token) {}
}

/// Writes each event as a line to `W`
pub struct StreamReporter<W: Write> {
    stream: W,
}

impl StreamReporter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Default for StreamReporter<io::Stderr> {
    fn default() -> Self {
        Self::stderr()
    }
}

impl<W: Write> StreamReporter<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    // A reporter that cannot write has nowhere left to report to.
    fn emit(&mut self, message: &str) {
        if let Err(err) = writeln!(self.stream, "{message}") {
            warn!(%err, "could not write report");
        }
    }
}

impl<W: Write> Reporter for StreamReporter<W> {
    fn tokenizer_failure(&mut self, error: &TokenizeError) {
        warn!(line = error.line, column = error.column, "tokenizer failure");
        self.emit(&error.to_string());
    }

    fn tree_walk_failure(&mut self, cause: &str) {
        warn!(cause, "tree walk failure");
        self.emit(&format!("Tree walk error: {cause}"));
    }

    fn unmatched_brace(&mut self, token: &Token) {
        warn!(line = token.line, column = token.column, brace = %token.content, "unmatched brace");
        self.emit(&format!(
            "Unmatched '{}' at {}:{}",
            token.content, token.line, token.column
        ));
    }
}

/// Collects events in memory; handy for inspecting what a parse reported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingReporter {
    pub events: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn tokenizer_failure(&mut self, error: &TokenizeError) {
        self.events.push(format!("tokenizer: {error}"));
    }

    fn tree_walk_failure(&mut self, cause: &str) {
        self.events.push(format!("tree: {cause}"));
    }

    fn unmatched_brace(&mut self, token: &Token) {
        self.events
            .push(format!("unmatched {} at {}:{}", token.content, token.line, token.column));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::token::TokenKind;

    #[test]
    fn test_stream_reporter_writes_lines() {
        let mut reporter = StreamReporter::new(Vec::new());
        reporter.unmatched_brace(&Token::new(TokenKind::Structure, "}", 3, 5, 20));
        reporter.tokenizer_failure(&TokenizeError::new(1, 1, "bad"));
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "Unmatched '}' at 3:5\nTokenizing error at 1:1: bad\n"
        );
    }

    #[test]
    fn test_reporter_through_mutable_reference() {
        let mut recording = RecordingReporter::default();
        {
            let mut reporter: Box<dyn Reporter + '_> = Box::new(&mut recording);
            reporter.tree_walk_failure("empty node");
        }
        assert_eq!(recording.events, vec!["tree: empty node"]);
    }
}
