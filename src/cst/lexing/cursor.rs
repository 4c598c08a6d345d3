//! Line cursor over the source
//!
//!     The source is split into physical lines (each keeping its line ending). The
//!     cursor sits on one line at a byte column. Moving to the following line goes to
//!     `next_line` rather than `line + 1`: a heredoc marker pulls its body lines out
//!     of the stream as soon as it is seen, so the line after the marker's line may
//!     already have been consumed.

/// Position of a token's first character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// 1-based line.
    pub line: usize,
    /// 1-based character column.
    pub column: usize,
    /// Byte offset in the source.
    pub offset: usize,
}

/// One physical line
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    lines: Vec<Line<'a>>,
    line: usize,
    col: usize,
    next_line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for text in source.split_inclusive('\n') {
            lines.push(Line { start, text });
            start += text.len();
        }
        Self {
            source,
            lines,
            line: 0,
            col: 0,
            next_line: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// No more lines to read.
    pub fn is_done(&self) -> bool {
        self.line >= self.lines.len()
    }

    fn text(&self) -> &'a str {
        self.lines.get(self.line).map(|l| l.text).unwrap_or("")
    }

    /// Remainder of the current line, line ending included.
    pub fn rest(&self) -> &'a str {
        self.text().get(self.col..).unwrap_or("")
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn at_line_start(&self) -> bool {
        self.col == 0
    }

    pub fn at_eol(&self) -> bool {
        self.col >= self.text().len()
    }

    /// Consume `len` bytes of the current line.
    pub fn bump(&mut self, len: usize) -> &'a str {
        let rest = self.rest();
        let len = len.min(rest.len());
        self.col += len;
        &rest[..len]
    }

    /// Consume the rest of the current line.
    pub fn bump_line(&mut self) -> &'a str {
        let rest = self.rest();
        self.col += rest.len();
        rest
    }

    /// Move to the start of the next unconsumed line. False at end of input.
    pub fn advance_line(&mut self) -> bool {
        self.line = self.next_line;
        self.next_line = self.line + 1;
        self.col = 0;
        !self.is_done()
    }

    /// Take the next unconsumed line ahead of the current one without moving to it.
    pub fn take_following_line(&mut self) -> Option<Line<'a>> {
        let line = *self.lines.get(self.next_line)?;
        self.next_line += 1;
        Some(line)
    }

    /// Byte offset where the next unconsumed line starts.
    pub fn following_offset(&self) -> usize {
        self.lines
            .get(self.next_line)
            .map(|l| l.start)
            .unwrap_or(self.source.len())
    }

    pub fn offset(&self) -> usize {
        self.lines
            .get(self.line)
            .map(|l| l.start + self.col)
            .unwrap_or(self.source.len())
    }

    pub fn mark(&self) -> Mark {
        let column = self
            .text()
            .get(..self.col)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(self.col);
        Mark {
            line: self.line + 1,
            column: column + 1,
            offset: self.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_lines() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!(cursor.rest(), "ab\n");
        assert_eq!(cursor.bump(2), "ab");
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.bump(1);
        assert!(cursor.at_eol());
        assert!(cursor.advance_line());
        assert_eq!(cursor.mark(), Mark { line: 2, column: 1, offset: 3 });
        cursor.bump_line();
        assert!(!cursor.advance_line());
        assert!(cursor.is_done());
    }

    #[test]
    fn test_following_lines_are_skipped() {
        let mut cursor = Cursor::new("a\nbody\nEND\nz\n");
        let body = cursor.take_following_line().unwrap();
        assert_eq!(body.text, "body\n");
        assert_eq!(cursor.following_offset(), 7);
        cursor.take_following_line();
        cursor.bump_line();
        assert!(cursor.advance_line());
        assert_eq!(cursor.rest(), "z\n");
        assert_eq!(cursor.mark().line, 4);
    }

    #[test]
    fn test_empty_source() {
        let cursor = Cursor::new("");
        assert!(cursor.is_done());
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_character_columns() {
        let mut cursor = Cursor::new("é = 1");
        cursor.bump('é'.len_utf8());
        assert_eq!(cursor.mark().column, 2);
    }
}
