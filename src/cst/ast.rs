//! Concrete syntax tree
//!
//!     The tree is lossless: every byte of the source lives in exactly one token, and
//!     [Document::serialize] gives the source back. Nodes come in three shapes:
//!
//!         - the [Document] root
//!         - statements, which run until a terminator, a closing brace, or the point
//!           where a compound statement cannot continue
//!         - structures, bracketed regions whose braces sit in `start`/`finish` slots
//!
//!     All elements live in the document's arena and are addressed by [ElementId].
//!     Navigation, queries and typed accessors are methods on [Document], split over
//!     the submodules by concern.
//!
//! Significance
//!
//!     Whitespace, comments, pod, the byte order mark and text after `__END__` are
//!     insignificant. Every node keeps the significant subsequence of its children
//!     alongside the full list, which is what the parser's lookbehind and most
//!     accessors work from.

pub mod accessors;
pub mod class;
pub mod document;
pub mod error;
pub mod location;
pub mod navigation;
pub mod query;

pub use class::{CompoundType, ElementClass, NodeKind, StatementKind, StructureKind};
pub use document::{Document, Element, ElementData, ElementId, Node};
pub use error::{format_source_context, TreeError};
pub use location::{Location, Position, SourceLocation, Span};
pub use query::{Visit, Visitor};
