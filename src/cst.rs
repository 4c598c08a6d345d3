//! # Perl concrete syntax trees
//!
//!     Source text goes through two stages:
//!
//!         - [lexing]: a context-sensitive tokenizer producing a lossless token stream
//!         - [parsing]: a tree builder grouping tokens into statements and structures
//!
//!     The result is a [Document](ast::Document) whose tokens concatenate back to the
//!     input. Nothing is executed and nothing outside the given text is consulted;
//!     where Perl itself would need runtime knowledge to decide (block or anonymous
//!     hash, division or pattern), the tree builder guesses from local context and
//!     marks guesses made by lookahead with [Attribute::Hint](token::Attribute::Hint).
//!
//!     Supporting modules: [token] and [classify] describe what the tokenizer emits,
//!     [ast] holds the tree with its navigation and typed accessors, [report] and
//!     [config] configure a parse, and [formats] renders trees.

pub mod ast;
pub mod classify;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod report;
pub mod token;

use ast::Document;
use parsing::{ParseError, Parser};

/// Parse `source` with the default configuration, reporting nothing.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::default().parse(source)
}
