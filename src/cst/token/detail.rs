//! Payloads for delimiter-bounded literals and heredocs

use std::ops::Range;

/// One delimited section of a quote, quote-like or regexp token.
///
/// `start`/`len` address the inner text (delimiters excluded) within the token's
/// content. A section that ran off the end of input has `complete == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub len: usize,
    pub open: char,
    pub close: char,
    pub complete: bool,
}

impl Section {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Structure of a delimited literal: operator prefix, sections, modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delimited {
    /// Byte length of the operator word (`s`, `qw`, ...). Zero for bare quotes.
    pub operator_len: usize,
    pub sections: Vec<Section>,
    /// Byte range of trailing modifier letters within the token content.
    pub modifiers: Range<usize>,
}

impl Delimited {
    /// True when every section found its closing delimiter.
    pub fn is_complete(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(|s| s.complete)
    }
}

/// How a heredoc body is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum HereDocMode {
    /// `<<"EOF"` or bare `<<EOF`
    Interpolate,
    /// `<<'EOF'`
    Literal,
    /// ``<<`EOF` ``
    Command,
}

/// Heredoc body, physically located on the lines after the marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HereDoc {
    pub terminator: String,
    pub mode: HereDocMode,
    /// `<<~` form: terminator and body may be indented.
    pub indented: bool,
    /// Payload lines, each including its line ending.
    pub lines: Vec<String>,
    /// The terminator line exactly as found, including its line ending.
    pub terminator_line: Option<String>,
    /// Byte offset of the first payload line.
    pub body_offset: usize,
    /// Byte offset of the terminator line, when one was found.
    pub terminator_offset: Option<usize>,
}

impl HereDoc {
    pub fn is_complete(&self) -> bool {
        self.terminator_line.is_some()
    }

    /// Length in bytes of payload plus terminator line.
    pub fn body_len(&self) -> usize {
        self.lines.iter().map(String::len).sum::<usize>()
            + self.terminator_line.as_ref().map(String::len).unwrap_or(0)
    }

    /// Payload plus terminator line, as it appears in the source.
    pub fn raw_body(&self) -> String {
        let mut body: String = self.lines.concat();
        if let Some(line) = &self.terminator_line {
            body.push_str(line);
        }
        body
    }

    pub fn end_offset(&self) -> usize {
        match (&self.terminator_line, self.terminator_offset) {
            (Some(line), Some(offset)) => offset + line.len(),
            _ => self.body_offset + self.lines.iter().map(String::len).sum::<usize>(),
        }
    }
}
