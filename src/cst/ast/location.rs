//! Position and location tracking for source code locations
//!
//! ## Types
//!
//! - [`Position`] - A 1-based line:column position in source code
//! - [`Span`] - A byte span with start/end positions
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! ## Key Design
//!
//! - **1-based positions**: lines and columns count from 1, columns in characters
//! - **Byte ranges preserved**: spans store both byte offsets and line:column positions
//! - **Unicode-aware**: multi-byte UTF-8 characters count as one column
//! - **Efficient conversion**: O(log n) binary search for byte-to-position conversion

use std::fmt;
use std::ops::Range as ByteRange;

/// Represents a position in source code (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A byte span together with the positions of its ends
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub bytes: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(bytes: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { bytes, start, end }
    }

    /// Check if a position is contained within this span
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Full location of an element, as reported by the navigation API
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    /// Column with tabs expanded to the configured tab width.
    pub visual_column: usize,
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a 1-based line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..byte_offset)
            .map(|text| text.chars().count())
            .unwrap_or(byte_offset - line_start);
        Position::new(line + 1, column + 1)
    }

    pub fn byte_range_to_span(&self, range: &ByteRange<usize>) -> Span {
        Span::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a 1-based line without its line ending
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }
}

/// Expand tabs in `prefix` and return the 1-based visual column after it
pub fn visual_column(prefix: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut column = 0;
    for ch in prefix.chars() {
        if ch == '\t' {
            column += tab_width - (column % tab_width);
        } else {
            column += 1;
        }
    }
    column + 1
}
