//! Output formats
//!
//!     - [dumper]: indented class dump for reading trees
//!     - [snapshot]: serde-serializable tree copy, rendered as JSON or YAML
//!     - [registry]: name-keyed lookup used by the command line

pub mod dumper;
pub mod registry;
pub mod snapshot;

pub use dumper::Dumper;
pub use registry::{FormatError, FormatRegistry, Formatter, JsonFormatter, TreeFormatter, YamlFormatter};
pub use snapshot::TreeSnapshot;
