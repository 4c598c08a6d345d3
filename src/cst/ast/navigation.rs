//! Navigation over the arena
//!
//!     Parent, sibling and ancestor lookups are answered from the inline parent index
//!     plus the owning node's child lists, so each one costs O(depth) or O(siblings).
//!     Start and finish braces of a structure have the structure as parent but are not
//!     among its children, so they have no siblings.

use super::class::ElementClass;
use super::document::{Document, ElementId};
use super::error::TreeError;
use super::location::{visual_column, Location, SourceLocation, Span};
use crate::cst::token::TokenKind;

static NO_CHILDREN: [ElementId; 0] = [];

impl Document {
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// All children in insertion order. Empty for tokens.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&NO_CHILDREN)
    }

    /// Significant children only.
    pub fn schildren(&self, id: ElementId) -> &[ElementId] {
        self.node(id)
            .map(|node| node.significant.as_slice())
            .unwrap_or(&NO_CHILDREN)
    }

    /// Significant child by index; negative indexes count from the end.
    pub fn schild(&self, id: ElementId, index: isize) -> Option<ElementId> {
        let schildren = self.schildren(id);
        let index = if index < 0 {
            schildren.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        schildren.get(index).copied()
    }

    pub fn start(&self, id: ElementId) -> Option<ElementId> {
        self.node(id)?.start
    }

    pub fn finish(&self, id: ElementId) -> Option<ElementId> {
        self.node(id)?.finish
    }

    /// Structural view: start brace, children, finish brace.
    pub fn elements(&self, id: ElementId) -> Vec<ElementId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let mut elements = Vec::with_capacity(node.children.len() + 2);
        elements.extend(node.start);
        elements.extend(node.children.iter().copied());
        elements.extend(node.finish);
        elements
    }

    fn position(&self, id: ElementId) -> Option<(ElementId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let (parent, index) = self.position(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: ElementId) -> Option<ElementId> {
        let (parent, index) = self.position(id)?;
        self.children(parent).get(index.checked_sub(1)?).copied()
    }

    pub fn next_significant_sibling(&self, id: ElementId) -> Option<ElementId> {
        let (parent, index) = self.position(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&c| self.significant(c))
    }

    pub fn prev_significant_sibling(&self, id: ElementId) -> Option<ElementId> {
        let (parent, index) = self.position(id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.significant(c))
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(id), move |&a| self.parent(a))
    }

    /// Nearest enclosing statement, not counting `id` itself.
    pub fn ancestor_statement(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id)
            .find(|&a| self.isa(a, ElementClass::AnyStatement))
    }

    /// The statement `id` belongs to: itself when it is one.
    pub fn statement(&self, id: ElementId) -> Option<ElementId> {
        if self.isa(id, ElementClass::AnyStatement) {
            Some(id)
        } else {
            self.ancestor_statement(id)
        }
    }

    pub fn is_ancestor_of(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        self.is_ancestor_of(ancestor, id)
    }

    /// Descend through first elements until a token is reached.
    pub fn first_token(&self, id: ElementId) -> Result<ElementId, TreeError> {
        let mut cursor = id;
        while !self.is_token(cursor) {
            let node = self.node(cursor).ok_or(TreeError::NotANode {
                element: cursor.index(),
            })?;
            cursor = node
                .start
                .or_else(|| node.children.first().copied())
                .or(node.finish)
                .ok_or(TreeError::EmptyNode {
                    node: cursor.index(),
                })?;
        }
        Ok(cursor)
    }

    /// Descend through last elements until a token is reached.
    pub fn last_token(&self, id: ElementId) -> Result<ElementId, TreeError> {
        let mut cursor = id;
        while !self.is_token(cursor) {
            let node = self.node(cursor).ok_or(TreeError::NotANode {
                element: cursor.index(),
            })?;
            cursor = node
                .finish
                .or_else(|| node.children.last().copied())
                .or(node.start)
                .ok_or(TreeError::EmptyNode {
                    node: cursor.index(),
                })?;
        }
        Ok(cursor)
    }

    /// Every token under `id` in lexical order, braces included.
    pub fn tokens(&self, id: ElementId) -> Vec<ElementId> {
        let mut tokens = Vec::new();
        self.collect_tokens(id, &mut tokens);
        tokens
    }

    fn collect_tokens(&self, id: ElementId, out: &mut Vec<ElementId>) {
        if self.is_token(id) {
            out.push(id);
            return;
        }
        for child in self.elements(id) {
            self.collect_tokens(child, out);
        }
    }

    /// Concatenated token text, without heredoc bodies.
    ///
    /// Not lossless when heredocs are present; [Document::serialize] splices their
    /// bodies back in and reproduces the source exactly.
    pub fn content(&self, id: ElementId) -> String {
        self.tokens(id)
            .into_iter()
            .map(|t| self.text(t))
            .collect()
    }

    /// Byte offset where the element starts, `None` for an empty node.
    pub fn start_offset(&self, id: ElementId) -> Option<usize> {
        let first = self.first_token(id).ok()?;
        self.token(first).map(|t| t.offset)
    }

    /// Byte offset one past the element's last byte, counting heredoc bodies that
    /// physically follow it.
    pub fn end_offset(&self, id: ElementId) -> Option<usize> {
        let last = self.last_token(id).ok()?;
        let mut end = self.token(last)?.end_offset();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            for &child in &node.children {
                match self.token(child) {
                    Some(token) if node.has_heredoc && token.kind == TokenKind::HereDoc => {
                        end = end.max(token.end_offset());
                    }
                    Some(_) => {}
                    None => pending.push(child),
                }
            }
        }
        Some(end)
    }

    /// Line, column and tab-expanded column of the element's first character.
    pub fn location(&self, id: ElementId) -> Option<Location> {
        let token = self.token(self.first_token(id).ok()?)?;
        let line_start = self.source()[..token.offset.min(self.source().len())]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = self.source().get(line_start..token.offset).unwrap_or("");
        Some(Location {
            line: token.line,
            column: token.column,
            visual_column: visual_column(prefix, self.tab_width()),
        })
    }

    /// Byte range and start/end positions of the element, heredoc bodies included.
    ///
    /// Builds a line index over the whole source; callers asking for many spans
    /// should keep their own [SourceLocation].
    pub fn span(&self, id: ElementId) -> Option<Span> {
        let range = self.start_offset(id)?..self.end_offset(id)?;
        Some(SourceLocation::new(self.source()).byte_range_to_span(&range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::class::{NodeKind, StatementKind, StructureKind};
    use crate::cst::token::Token;

    // foo ( x ) ;
    fn sample() -> (Document, Vec<ElementId>) {
        let mut doc = Document::with_source("foo(x);", 4);
        let root = doc.root();
        let stmt = doc.new_node(NodeKind::Statement(StatementKind::Statement));
        doc.add_child(root, stmt).unwrap();
        let foo = doc
            .add_token(stmt, Token::new(TokenKind::Word, "foo", 1, 1, 0))
            .unwrap();
        let list = doc.new_node(NodeKind::Structure(StructureKind::List));
        doc.add_child(stmt, list).unwrap();
        let open = doc
            .set_start(list, Token::new(TokenKind::Structure, "(", 1, 4, 3))
            .unwrap();
        let inner = doc.new_node(NodeKind::Statement(StatementKind::Expression));
        doc.add_child(list, inner).unwrap();
        let x = doc
            .add_token(inner, Token::new(TokenKind::Word, "x", 1, 5, 4))
            .unwrap();
        let close = doc
            .set_finish(list, Token::new(TokenKind::Structure, ")", 1, 6, 5))
            .unwrap();
        let semi = doc
            .add_token(stmt, Token::new(TokenKind::Structure, ";", 1, 7, 6))
            .unwrap();
        (doc, vec![stmt, foo, list, open, inner, x, close, semi])
    }

    #[test]
    fn test_elements_include_braces() {
        let (doc, ids) = sample();
        let (list, open, inner, close) = (ids[2], ids[3], ids[4], ids[6]);
        assert_eq!(doc.children(list), &[inner]);
        assert_eq!(doc.elements(list), vec![open, inner, close]);
        assert_eq!(doc.parent(open), Some(list));
        assert_eq!(doc.next_sibling(open), None);
    }

    #[test]
    fn test_siblings_and_schild() {
        let (doc, ids) = sample();
        let (stmt, foo, list, semi) = (ids[0], ids[1], ids[2], ids[7]);
        assert_eq!(doc.next_sibling(foo), Some(list));
        assert_eq!(doc.prev_significant_sibling(semi), Some(list));
        assert_eq!(doc.schild(stmt, 0), Some(foo));
        assert_eq!(doc.schild(stmt, -1), Some(semi));
        assert_eq!(doc.schild(stmt, -4), None);
    }

    #[test]
    fn test_ancestry() {
        let (doc, ids) = sample();
        let (stmt, inner, x) = (ids[0], ids[4], ids[5]);
        assert_eq!(doc.ancestor_statement(x), Some(inner));
        assert_eq!(doc.ancestor_statement(inner), Some(stmt));
        assert!(doc.is_ancestor_of(stmt, x));
        assert!(doc.is_descendant_of(x, doc.root()));
        assert!(!doc.is_ancestor_of(x, stmt));
    }

    #[test]
    fn test_tokens_and_content() {
        let (doc, ids) = sample();
        assert_eq!(doc.content(doc.root()), "foo(x);");
        assert_eq!(doc.first_token(ids[2]), Ok(ids[3]));
        assert_eq!(doc.last_token(doc.root()), Ok(ids[7]));
        assert_eq!(doc.start_offset(ids[2]), Some(3));
        assert_eq!(doc.end_offset(ids[2]), Some(6));
    }

    #[test]
    fn test_span() {
        let (doc, ids) = sample();
        let span = doc.span(ids[2]).unwrap();
        assert_eq!(span.bytes, 3..6);
        assert_eq!(span.to_string(), "1:4..1:7");
    }

    #[test]
    fn test_empty_node_descent_fails() {
        let mut doc = Document::new();
        let stmt = doc.new_node(NodeKind::Statement(StatementKind::Statement));
        doc.add_child(doc.root(), stmt).unwrap();
        assert_eq!(
            doc.first_token(doc.root()),
            Err(TreeError::EmptyNode {
                node: stmt.index()
            })
        );
    }

    #[test]
    fn test_location_expands_tabs() {
        let mut doc = Document::with_source("\tx", 4);
        let stmt = doc.new_node(NodeKind::Statement(StatementKind::Statement));
        doc.add_child(doc.root(), stmt).unwrap();
        let x = doc
            .add_token(stmt, Token::new(TokenKind::Word, "x", 1, 2, 1))
            .unwrap();
        let location = doc.location(x).unwrap();
        assert_eq!(location.column, 2);
        assert_eq!(location.visual_column, 5);
    }
}
