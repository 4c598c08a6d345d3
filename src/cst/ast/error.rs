//! Error types for tree operations

use super::location::SourceLocation;
use std::fmt;

/// Errors raised by navigation over a malformed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node with no children was found while descending to a token.
    EmptyNode { node: usize },
    /// The element is a token where a node was required.
    NotANode { element: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptyNode { node } => {
                write!(f, "Node #{} has no children to descend into", node)
            }
            TreeError::NotANode { element } => write!(f, "Element #{} is not a node", element),
        }
    }
}

impl std::error::Error for TreeError {}

/// Format source code context around a 1-based line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, line: usize) -> String {
    let location = SourceLocation::new(source);
    let first = line.saturating_sub(2).max(1);
    let last = (line + 2).min(location.line_count());

    let mut context = String::new();
    for line_num in first..=last {
        let Some(text) = location.line_text(line_num) else {
            continue;
        };
        let marker = if line_num == line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num, text));
    }
    context
}
