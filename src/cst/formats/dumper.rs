//! Indented text dump of a tree
//!
//!     One line per element, children indented two spaces under their parent. Tokens
//!     show their class and quoted content with control characters escaped;
//!     structures show their braces around `...`, with `???` for a missing brace.
//!
//!         Document
//!           Statement
//!             Token::Word  'print'
//!             Token::Quote::Double  '"hi"'
//!             Token::Structure  ';'

use crate::cst::ast::{Document, ElementId};
use crate::cst::token::TokenKind;

/// Dump options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dumper {
    /// Include whitespace tokens.
    pub whitespace: bool,
    /// Prefix each line with `[ line, column, visual column ]`.
    pub locations: bool,
    pub indent: usize,
}

impl Default for Dumper {
    fn default() -> Self {
        Self {
            whitespace: true,
            locations: false,
            indent: 2,
        }
    }
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn whitespace(mut self, whitespace: bool) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn locations(mut self, locations: bool) -> Self {
        self.locations = locations;
        self
    }

    pub fn dump(&self, doc: &Document) -> String {
        let mut output = String::new();
        self.dump_element(doc, doc.root(), 0, &mut output);
        output
    }

    /// Dump the subtree rooted at `id`.
    pub fn dump_element(&self, doc: &Document, id: ElementId, depth: usize, output: &mut String) {
        if !self.whitespace && doc.token_kind(id) == Some(TokenKind::Whitespace) {
            return;
        }
        if self.locations {
            match doc.location(id) {
                Some(loc) => output.push_str(&format!(
                    "[ {:>4}, {:>3}, {:>3} ] ",
                    loc.line, loc.column, loc.visual_column
                )),
                None => output.push_str(&" ".repeat(20)),
            }
        }
        output.push_str(&" ".repeat(depth * self.indent));
        output.push_str(doc.class(id).name());

        if let Some(token) = doc.token(id) {
            output.push_str(&format!("  '{}'", escape(&token.content)));
        } else if doc.structure_kind(id).is_some() {
            let brace = |slot: Option<ElementId>| {
                slot.map(|b| doc.text(b).to_string())
                    .unwrap_or_else(|| "???".to_string())
            };
            output.push_str(&format!(
                "  {} ... {}",
                brace(doc.start(id)),
                brace(doc.finish(id))
            ));
        }
        output.push('\n');

        for &child in doc.children(id) {
            self.dump_element(doc, child, depth + 1, output);
        }
    }
}

fn escape(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\x0c' => escaped.push_str("\\f"),
            _ => escaped.push(c),
        }
    }
    escaped
}
