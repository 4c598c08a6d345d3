//! Tree building
//!
//!     Consumes the token stream and builds the [Document](crate::cst::ast::Document)
//!     tree. The work is split over:
//!
//!         - [parser]: the [Parser] entry point and the document, statement and
//!           structure loops
//!         - [resolve]: deciding statement and structure kinds from context and
//!           lookahead
//!         - [continuation]: where statements without a terminator end
//!         - [error]: fatal parse errors
//!
//!     The builder never gives up on odd but tokenizable input. Unmatched closing
//!     braces become their own statements, unclosed structures stay open to the end of
//!     input, and both are reported through the configured
//!     [Reporter](crate::cst::report::Reporter).

pub mod continuation;
pub mod error;
pub mod parser;
pub mod resolve;

pub use error::ParseError;
pub use parser::Parser;
