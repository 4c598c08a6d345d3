//! Tokenizer
//!
//!     Turns source text into a flat stream of [Token](crate::cst::token::Token)s.
//!     The stream is lossless: token contents, with heredoc bodies spliced back in,
//!     concatenate to the input.
//!
//!     The tokenizer is context sensitive. Whether `/` divides or starts a pattern,
//!     whether `%` is modulus or a hash sigil, whether `<` compares or reads a line,
//!     all depend on the tokens before it (see [context]). Scanning is split by
//!     character class:
//!
//!         - [words]: barewords, labels, word operators, quote-like operators
//!         - [numbers]: decimal, based, float, exponent and version literals
//!         - [symbols]: sigiled variables, casts and magic variables
//!         - [quotes]: every delimiter-bounded literal
//!         - [heredoc]: heredoc markers and readlines
//!         - [zones]: pod, and the regions after `__END__` and `__DATA__`
//!         - [operators]: the punctuation operator table

pub mod context;
pub mod cursor;
pub mod error;
pub mod heredoc;
pub mod numbers;
pub mod operators;
pub mod quotes;
pub mod symbols;
pub mod tokenizer;
pub mod words;
pub mod zones;

pub use error::TokenizeError;
pub use tokenizer::Tokenizer;
pub use zones::Zone;

use crate::cst::token::Token;

/// Tokenize a whole source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(source).all_tokens()
}
