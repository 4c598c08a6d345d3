//! Tree queries
//!
//!     [Document::find] is a depth-first, pre-order search below a root (the root
//!     itself is never matched). Structures are visited brace first, then children,
//!     then the closing brace, so results come back in document order. The predicate
//!     decides per element whether it matches and whether to descend into it.
//!
//!     [Visitor] offers the same traversal as callbacks, for consumers that render the
//!     whole tree rather than pick elements out of it.

use super::class::ElementClass;
use super::document::{Document, ElementId};

/// What a find predicate wants done with one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Not a match; descend into it.
    Descend,
    /// Not a match; do not look inside.
    Skip,
    /// A match; descend into it as well.
    Match,
    /// A match whose interior is not searched.
    MatchOnly,
}

impl Visit {
    fn matched(self) -> bool {
        matches!(self, Visit::Match | Visit::MatchOnly)
    }

    fn descends(self) -> bool {
        matches!(self, Visit::Match | Visit::Descend)
    }
}

/// Callbacks for a full pre-order walk
pub trait Visitor {
    fn visit_node(&mut self, _doc: &Document, _id: ElementId, _depth: usize) {}
    fn leave_node(&mut self, _doc: &Document, _id: ElementId, _depth: usize) {}
    fn visit_token(&mut self, _doc: &Document, _id: ElementId, _depth: usize) {}
}

impl Document {
    /// Every element below `root` the predicate accepts, in document order.
    pub fn find<F>(&self, root: ElementId, mut wanted: F) -> Vec<ElementId>
    where
        F: FnMut(&Document, ElementId) -> Visit,
    {
        let mut found = Vec::new();
        // Reversed so the stack pops in document order
        let mut stack: Vec<ElementId> = self.elements(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            let visit = wanted(self, id);
            if visit.matched() {
                found.push(id);
            }
            if visit.descends() && !self.is_token(id) {
                stack.extend(self.elements(id).into_iter().rev());
            }
        }
        found
    }

    /// First match in document order.
    pub fn find_first<F>(&self, root: ElementId, mut wanted: F) -> Option<ElementId>
    where
        F: FnMut(&Document, ElementId) -> bool,
    {
        let mut stack: Vec<ElementId> = self.elements(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            if wanted(self, id) {
                return Some(id);
            }
            stack.extend(self.elements(id).into_iter().rev());
        }
        None
    }

    /// Elements whose class is exactly `class`.
    pub fn find_class(&self, root: ElementId, class: ElementClass, recurse: bool) -> Vec<ElementId> {
        self.find(root, |doc, id| classify(doc.class(id) == class, recurse))
    }

    /// Elements of class `class` or any of its subclasses.
    pub fn find_isa(&self, root: ElementId, class: ElementClass, recurse: bool) -> Vec<ElementId> {
        self.find(root, |doc, id| classify(doc.isa(id, class), recurse))
    }

    /// Walk the subtree at `root` (inclusive) with a visitor.
    pub fn walk(&self, root: ElementId, visitor: &mut dyn Visitor) {
        self.walk_at(root, 0, visitor);
    }

    fn walk_at(&self, id: ElementId, depth: usize, visitor: &mut dyn Visitor) {
        if self.is_token(id) {
            visitor.visit_token(self, id, depth);
            return;
        }
        visitor.visit_node(self, id, depth);
        for child in self.elements(id) {
            self.walk_at(child, depth + 1, visitor);
        }
        visitor.leave_node(self, id, depth);
    }
}

fn classify(matched: bool, recurse: bool) -> Visit {
    match (matched, recurse) {
        (true, true) => Visit::Match,
        (true, false) => Visit::MatchOnly,
        (false, _) => Visit::Descend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::class::{NodeKind, StatementKind, StructureKind};
    use crate::cst::token::{Token, TokenKind};

    // { { a } }
    fn nested_blocks() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let stmt = doc.new_node(NodeKind::Statement(StatementKind::Compound));
        doc.add_child(doc.root(), stmt).unwrap();
        let outer = doc.new_node(NodeKind::Structure(StructureKind::Block));
        doc.add_child(stmt, outer).unwrap();
        doc.set_start(outer, Token::new(TokenKind::Structure, "{", 1, 1, 0))
            .unwrap();
        let inner_stmt = doc.new_node(NodeKind::Statement(StatementKind::Compound));
        doc.add_child(outer, inner_stmt).unwrap();
        let inner = doc.new_node(NodeKind::Structure(StructureKind::Block));
        doc.add_child(inner_stmt, inner).unwrap();
        doc.set_start(inner, Token::new(TokenKind::Structure, "{", 1, 2, 1))
            .unwrap();
        let a_stmt = doc.new_node(NodeKind::Statement(StatementKind::Statement));
        doc.add_child(inner, a_stmt).unwrap();
        let a = doc
            .add_token(a_stmt, Token::new(TokenKind::Word, "a", 1, 3, 2))
            .unwrap();
        doc.set_finish(inner, Token::new(TokenKind::Structure, "}", 1, 4, 3))
            .unwrap();
        doc.set_finish(outer, Token::new(TokenKind::Structure, "}", 1, 5, 4))
            .unwrap();
        (doc, outer, inner, a)
    }

    #[test]
    fn test_find_recursion_toggle() {
        let (doc, outer, inner, _) = nested_blocks();
        let block = ElementClass::Structure(StructureKind::Block);
        assert_eq!(doc.find_class(doc.root(), block, true), vec![outer, inner]);
        assert_eq!(doc.find_class(doc.root(), block, false), vec![outer]);
    }

    #[test]
    fn test_find_braces_in_order() {
        let (doc, _, _, _) = nested_blocks();
        let braces: Vec<String> = doc
            .find_class(doc.root(), ElementClass::Kind(TokenKind::Structure), true)
            .into_iter()
            .map(|id| doc.text(id).to_string())
            .collect();
        assert_eq!(braces, vec!["{", "{", "}", "}"]);
    }

    #[test]
    fn test_find_isa_and_first() {
        let (doc, _, _, a) = nested_blocks();
        let statements = doc.find_isa(doc.root(), ElementClass::AnyStatement, true);
        assert_eq!(statements.len(), 3);
        assert_eq!(doc.find_first(doc.root(), |d, id| d.text(id) == "a"), Some(a));
        assert_eq!(doc.find_first(doc.root(), |d, id| d.text(id) == "b"), None);
    }

    #[test]
    fn test_find_skip() {
        let (doc, _, _, _) = nested_blocks();
        let words = doc.find(doc.root(), |d, id| {
            if d.isa(id, ElementClass::AnyStructure) {
                Visit::Skip
            } else if d.token_kind(id) == Some(TokenKind::Word) {
                Visit::Match
            } else {
                Visit::Descend
            }
        });
        assert!(words.is_empty());
    }
}
