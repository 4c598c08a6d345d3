//! Core token types shared across the tokenizer, parser, and tooling.

pub mod core;
pub mod detail;
pub mod number;

pub use core::{Attribute, Token, TokenDetail, TokenFamily, TokenKind};
pub use detail::{Delimited, HereDoc, HereDocMode, Section};
pub use number::literal;
