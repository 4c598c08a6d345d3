//! # perl-cst
//!
//! A lossless concrete syntax tree builder for Perl 5 source. See [cst] for the
//! pipeline and [cst::parse] for the one-call entry point.

pub mod cst;
