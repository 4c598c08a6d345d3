//! Statement and structure classification
//!
//!     Kinds are decided once, when the first token of a statement or the opening
//!     bracket of a structure is seen, from what precedes it in the enclosing node and
//!     at most three significant tokens of lookahead. Lookahead never consumes: every
//!     token read ahead goes back into the stream.

use super::error::ParseError;
use super::parser::Builder;
use crate::cst::ast::{CompoundType, ElementClass, ElementId, NodeKind, StatementKind, StructureKind};
use crate::cst::classify;
use crate::cst::token::{Attribute, Token, TokenFamily, TokenKind};
use tracing::trace;

/// Curly lookahead: at each position, contents that settle block vs. constructor.
const CURLY_LOOKAHEAD: [&[(&str, StructureKind)]; 3] = [
    &[(";", StructureKind::Block), ("}", StructureKind::Constructor)],
    &[
        ("=>", StructureKind::Constructor),
        (",", StructureKind::Constructor),
        (";", StructureKind::Block),
    ],
    &[("=>", StructureKind::Constructor)],
];

impl Builder<'_, '_> {
    fn is_token_kind(&self, id: ElementId, kind: TokenKind) -> bool {
        self.doc.token_kind(id) == Some(kind)
    }

    fn is_operator(&self, id: ElementId, content: &str) -> bool {
        self.is_token_kind(id, TokenKind::Operator) && self.doc.text(id) == content
    }

    fn is_cast(&self, id: ElementId, casts: &[&str]) -> bool {
        self.is_token_kind(id, TokenKind::Cast) && casts.contains(&self.doc.text(id))
    }

    /// Statement kind for a statement starting with `token` inside `parent`.
    pub(super) fn resolve_statement(
        &mut self,
        parent: ElementId,
        token: &Token,
    ) -> Result<StatementKind, ParseError> {
        let parent_kind = self.doc.structure_kind(parent);
        let next = self.peek_next()?;
        let next_is = |content: &str| next.as_ref().is_some_and(|n| n.content == content);

        // `( key => ... )`
        if matches!(
            parent_kind,
            Some(StructureKind::List | StructureKind::Constructor)
        ) && token.kind == TokenKind::Word
            && next_is("=>")
        {
            return Ok(StatementKind::Expression);
        }

        let mut keyword = match token.kind {
            TokenKind::Word => classify::statement_keyword(&token.content)
                .filter(|kind| !matches!(kind, StatementKind::End | StatementKind::Data)),
            TokenKind::Separator => classify::statement_keyword(&token.content),
            _ => None,
        };
        let mut lexical_sub = false;
        if keyword.is_some() {
            if classify::is_variable_declarator(&token.content)
                && next.as_ref().is_some_and(|n| n.is_word("sub"))
            {
                keyword = None;
                lexical_sub = true;
            } else if next_is("=>") {
                return Ok(StatementKind::Statement);
            }
        }

        // Barewords in subscripts: `$h{foo}`, but also `$h{my $x = ...}`
        if parent_kind == Some(StructureKind::Subscript) {
            let expression = ElementClass::Statement(StatementKind::Expression);
            return Ok(match keyword {
                Some(kind)
                    if ElementClass::Statement(kind).isa(expression)
                        && next.is_some()
                        && !next_is("}") =>
                {
                    kind
                }
                _ => StatementKind::Expression,
            });
        }

        if let Some(kind) = keyword {
            return Ok(kind);
        }

        if lexical_sub || token.is_word("sub") {
            // For a lexical sub the token after `my` is `sub` itself
            return Ok(match &next {
                Some(n)
                    if n.kind == TokenKind::Word
                        && classify::statement_keyword(&n.content)
                            == Some(StatementKind::Scheduled) =>
                {
                    StatementKind::Scheduled
                }
                Some(n) if n.kind == TokenKind::Word => StatementKind::Sub,
                Some(_) => StatementKind::Statement,
                None => StatementKind::Sub,
            });
        }

        if token.is_word("use") {
            return Ok(if next_is("v6") {
                StatementKind::IncludePerl6
            } else {
                StatementKind::Include
            });
        }

        if matches!(
            parent_kind,
            Some(
                StructureKind::Condition
                    | StructureKind::List
                    | StructureKind::For
                    | StructureKind::Given
                    | StructureKind::When
            )
        ) {
            return Ok(StatementKind::Expression);
        }

        if token.kind == TokenKind::Label {
            return Ok(StatementKind::Compound);
        }
        Ok(StatementKind::Statement)
    }

    /// Kind of a `(` structure opened in `parent`.
    pub(super) fn resolve_round(&mut self, parent: ElementId) -> StructureKind {
        let last = self.doc.schild(parent, -1);
        if let Some(last) = last {
            if self.is_token_kind(last, TokenKind::Word) {
                if let Some(kind) = classify::round_class(self.doc.text(last)) {
                    return kind;
                }
            }
        }

        match self.doc.statement_kind(parent) {
            Some(StatementKind::Compound)
                if matches!(
                    self.doc.compound_type(parent),
                    Some(CompoundType::For | CompoundType::Foreach)
                ) =>
            {
                return StructureKind::For
            }
            Some(StatementKind::Given) => return StructureKind::Given,
            Some(StatementKind::When) => return StructureKind::When,
            _ => {}
        }

        if let Some(last) = last.filter(|&last| self.is_operator(last, "->")) {
            self.doc.set_attribute(last, Attribute::Dereference);
        }
        StructureKind::List
    }

    /// Kind of a `[` structure opened in `parent`.
    pub(super) fn resolve_square(&mut self, parent: ElementId) -> StructureKind {
        let Some(last) = self.doc.schild(parent, -1) else {
            return StructureKind::Constructor;
        };
        if self.is_operator(last, "->") {
            self.doc.set_attribute(last, Attribute::Dereference);
            return StructureKind::Subscript;
        }
        if self.subscript_follows(parent, last) {
            return StructureKind::Subscript;
        }
        StructureKind::Constructor
    }

    // `$foo[`, `@foo{`, `$x{a}[`, `$r->@[`
    fn subscript_follows(&self, parent: ElementId, last: ElementId) -> bool {
        if self.doc.structure_kind(last) == Some(StructureKind::Subscript) {
            return true;
        }
        if self.doc.isa(last, ElementClass::Family(TokenFamily::Symbol))
            && self.doc.text(last).starts_with(['$', '@'])
        {
            return true;
        }
        self.is_cast(last, &["@", "%"])
            && self
                .doc
                .schild(parent, -2)
                .is_some_and(|prior| self.is_operator(prior, "->"))
    }

    /// Kind of a `{` structure opened in `parent`, and whether lookahead decided it.
    ///
    /// A bare block at the start of a generic statement makes that statement a
    /// compound one.
    pub(super) fn resolve_curly(
        &mut self,
        parent: ElementId,
    ) -> Result<(StructureKind, bool), ParseError> {
        let last = self.doc.schild(parent, -1);
        if let Some(kind) = self.resolve_curly_by_context(parent, last) {
            trace!(?kind, "curly resolved from context");
            return Ok((kind, false));
        }

        // Something like `map( { ... } @list )`; other calls use lookahead
        if last.is_none() {
            let function = self
                .doc
                .parent(parent)
                .filter(|&list| self.doc.structure_kind(list) == Some(StructureKind::List))
                .and_then(|list| self.doc.parent(list))
                .and_then(|outer| self.doc.schild(outer, -2));
            if let Some(function) = function {
                if self.is_token_kind(function, TokenKind::Word)
                    && classify::takes_block_argument(self.doc.text(function))
                {
                    return Ok((StructureKind::Block, false));
                }
            }
        }

        // Start of a statement: read ahead
        let ahead = self.peek_significant(CURLY_LOOKAHEAD.len())?;
        for (position, token) in ahead.iter().enumerate() {
            let decided = CURLY_LOOKAHEAD[position]
                .iter()
                .find(|(content, _)| token.content == *content)
                .map(|(_, kind)| *kind);
            if let Some(kind) = decided {
                trace!(?kind, position, "curly resolved by lookahead");
                if kind == StructureKind::Block {
                    self.make_compound(parent)?;
                }
                return Ok((kind, true));
            }
        }
        self.make_compound(parent)?;
        Ok((StructureKind::Block, false))
    }

    fn make_compound(&mut self, statement: ElementId) -> Result<(), ParseError> {
        if self.doc.statement_kind(statement) == Some(StatementKind::Statement) {
            let changed = self
                .doc
                .change_to(statement, NodeKind::Statement(StatementKind::Compound));
            self.tree(changed)?;
        }
        Ok(())
    }

    fn resolve_curly_by_context(
        &mut self,
        parent: ElementId,
        last: Option<ElementId>,
    ) -> Option<StructureKind> {
        let statement = self.doc.statement_kind(parent);
        if let Some(last) = last {
            if self.is_operator(last, "->") {
                self.doc.set_attribute(last, Attribute::Dereference);
                return Some(StructureKind::Subscript);
            }
            if self.subscript_follows(parent, last) {
                return Some(StructureKind::Subscript);
            }
            // `${$ref}{key}`, `@{$ref}{qw(a b)}`
            if self.doc.structure_kind(last) == Some(StructureKind::Block)
                && self
                    .doc
                    .schild(parent, -2)
                    .is_some_and(|prior| self.is_cast(prior, &["$", "@"]))
            {
                return Some(StructureKind::Subscript);
            }
            if matches!(statement, Some(StatementKind::Sub | StatementKind::Scheduled | StatementKind::Package)) {
                return Some(StructureKind::Block);
            }
            if self.doc.is_token(last) {
                if let Some(kind) = classify::curly_class(self.doc.text(last)) {
                    return Some(kind);
                }
            }
        }

        if statement == Some(StatementKind::Compound) {
            return Some(StructureKind::Block);
        }

        // `use constant { ... }` and `use constant 1.0 { ... }`
        if statement == Some(StatementKind::Include) {
            let count = self.doc.schildren(parent).len();
            let versioned = count == 3
                && self
                    .doc
                    .schild(parent, 2)
                    .is_some_and(|v| self.doc.isa(v, ElementClass::Family(TokenFamily::Number)));
            if count == 2 || versioned {
                return Some(StructureKind::Constructor);
            }
        }

        // Past the start of a statement everything else is a block
        last.map(|_| StructureKind::Block)
    }
}
