//! Implied statement ends
//!
//!     Subs, scheduled blocks, packages, `given`/`when` and compound statements need no
//!     terminator. After each significant token the builder asks [Builder::continues]
//!     whether the next one still belongs to such a statement; if not, the statement
//!     is closed and the token starts a new one.
//!
//!     For compound statements the answer depends on the statement's syntactic type
//!     and its last significant child, following the shapes Perl allows:
//!
//!         if (EXPR) BLOCK [elsif (EXPR) BLOCK ...] [else BLOCK]
//!         [LABEL] while (EXPR) BLOCK [continue BLOCK]
//!         [LABEL] for (INIT; COND; STEP) BLOCK
//!         [LABEL] foreach [my|our|state] VAR (LIST) BLOCK [continue BLOCK]
//!         [LABEL] BLOCK [continue BLOCK]

use super::error::ParseError;
use super::parser::Builder;
use crate::cst::ast::{CompoundType, ElementClass, ElementId, StatementKind, StructureKind};
use crate::cst::classify;
use crate::cst::token::{Token, TokenFamily, TokenKind};

impl Builder<'_, '_> {
    fn is_block(&self, id: ElementId) -> bool {
        self.doc.structure_kind(id) == Some(StructureKind::Block)
    }

    fn is_word(&self, id: ElementId, words: &[&str]) -> bool {
        self.doc.token_kind(id) == Some(TokenKind::Word) && words.contains(&self.doc.text(id))
    }

    /// Whether `token` continues the implied-end `statement`.
    pub(super) fn continues(
        &mut self,
        statement: ElementId,
        token: &Token,
    ) -> Result<bool, ParseError> {
        let schildren = self.doc.schildren(statement);
        let Some(&last) = schildren.last() else {
            return Ok(true);
        };
        // `{ print 1; }`
        if schildren.len() == 1 && self.is_block(last) {
            return Ok(false);
        }
        if self.doc.statement_kind(statement) != Some(StatementKind::Compound) {
            return Ok(!self.is_block(last));
        }

        let Some(mut compound) = self.doc.compound_type(statement) else {
            return Err(self.unreachable(token, "compound statement of unknown type"));
        };
        let next_last = self.doc.schild(statement, -2);
        let opens_block = token.is_structure("{");
        let quoted_words = token.kind == TokenKind::QuoteLikeWords;

        match compound {
            CompoundType::If => {
                if !self.is_block(last) {
                    return Ok(true);
                }
                if next_last.is_some_and(|prior| self.is_word(prior, &["else"])) {
                    return Ok(false);
                }
                return Ok(token.is_word("else") || token.is_word("elsif"));
            }
            CompoundType::Label => {
                return Ok(opens_block
                    || (token.kind == TokenKind::Word && classify::is_loop_keyword(&token.content)));
            }
            _ => {}
        }

        // `while (...)`, `for (...)`, `foreach my $x (...)`: only a block will do
        if self.doc.isa(last, ElementClass::AnyStructure) && self.doc.braces(last) == Some("()") {
            return Ok(opens_block);
        }

        if compound == CompoundType::For {
            if self.is_word(last, &["for", "foreach"]) {
                if token.is_structure("(") || quoted_words {
                    return Ok(true);
                }
                // `for my $x`, `for $x`
                compound = CompoundType::Foreach;
            } else if self.is_block(last) {
                return Ok(false);
            } else if self.doc.token_kind(last) == Some(TokenKind::QuoteLikeWords) {
                return Ok(opens_block);
            }
        }

        if self.is_word(last, &["continue"]) {
            return Ok(opens_block);
        }

        if self.is_block(last) {
            // The continue block closes the statement
            if next_last.is_some_and(|prior| self.is_word(prior, &["continue"])) {
                return Ok(false);
            }
            return Ok(token.is_word("continue"));
        }

        if compound == CompoundType::While && self.is_word(last, &["while", "until"]) {
            return Ok(token.is_structure("("));
        }

        if compound == CompoundType::Foreach {
            if self.doc.isa(last, ElementClass::Family(TokenFamily::Symbol)) {
                return Ok(token.is_structure("(") || quoted_words);
            }
            let text = self.doc.text(last);
            if matches!(text, "for" | "foreach") {
                let declarator = token.kind == TokenKind::Word
                    && classify::statement_keyword(&token.content)
                        == Some(StatementKind::Variable);
                return Ok(declarator
                    || token.content.starts_with('$')
                    || token.is_structure("(")
                    || quoted_words);
            }
            if classify::is_variable_declarator(text) {
                return Ok(token.content.starts_with('$'));
            }
            if self.doc.token_kind(last) == Some(TokenKind::QuoteLikeWords) {
                return Ok(opens_block);
            }
        }

        Err(self.unreachable(
            token,
            format!("no continuation rule for '{}' in a {compound} statement", token.content),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::ast::{CompoundType, Document, ElementClass, ElementId, StatementKind, StructureKind};
    use crate::cst::parsing::Parser;

    fn parse(source: &str) -> Document {
        Parser::default().parse(source).unwrap()
    }

    fn statements(doc: &Document) -> Vec<ElementId> {
        doc.schildren(doc.root()).to_vec()
    }

    fn kinds(doc: &Document) -> Vec<StatementKind> {
        statements(doc)
            .into_iter()
            .filter_map(|id| doc.statement_kind(id))
            .collect()
    }

    #[test]
    fn test_if_elsif_else_is_one_statement() {
        let doc = parse("if ($a) { 1 } elsif ($b) { 2 } else { 3 } print;");
        let stmts = statements(&doc);
        assert_eq!(kinds(&doc), vec![StatementKind::Compound, StatementKind::Statement]);
        assert_eq!(doc.compound_type(stmts[0]), Some(CompoundType::If));
        assert_eq!(doc.schildren(stmts[0]).len(), 8);
    }

    #[test]
    fn test_else_closes_if() {
        let doc = parse("if (1) {} else {} elsif (2) {}");
        assert_eq!(kinds(&doc).len(), 2);
    }

    #[test]
    fn test_while_with_continue_block() {
        let doc = parse("while (1) { next } continue { $i++ } foo();");
        let stmts = statements(&doc);
        assert_eq!(kinds(&doc), vec![StatementKind::Compound, StatementKind::Statement]);
        assert_eq!(doc.compound_type(stmts[0]), Some(CompoundType::While));
        assert_eq!(doc.schildren(stmts[0]).len(), 5);
    }

    #[test]
    fn test_c_style_for() {
        let doc = parse("for (my $i = 0; $i < 3; $i++) { print $i }");
        let stmt = statements(&doc)[0];
        assert_eq!(doc.compound_type(stmt), Some(CompoundType::For));
        let header = doc.schild(stmt, 1).unwrap();
        assert_eq!(doc.structure_kind(header), Some(StructureKind::For));
    }

    #[test]
    fn test_foreach_with_declarator() {
        let doc = parse("foreach my $x (@list) { print $x } 1;");
        let stmt = statements(&doc)[0];
        assert_eq!(doc.compound_type(stmt), Some(CompoundType::Foreach));
        assert_eq!(doc.schildren(stmt).len(), 5);
        let list = doc.schild(stmt, 3).unwrap();
        assert_eq!(doc.structure_kind(list), Some(StructureKind::List));
        assert_eq!(kinds(&doc).len(), 2);
    }

    #[test]
    fn test_for_over_word_list() {
        let doc = parse("for qw(a b) { print }");
        let stmt = statements(&doc)[0];
        assert_eq!(doc.compound_type(stmt), Some(CompoundType::Foreach));
        assert_eq!(kinds(&doc).len(), 1);
    }

    #[test]
    fn test_labelled_loop() {
        let doc = parse("OUTER: while (1) { last OUTER }");
        let stmt = statements(&doc)[0];
        assert_eq!(doc.statement_kind(stmt), Some(StatementKind::Compound));
        assert_eq!(doc.compound_type(stmt), Some(CompoundType::While));
        assert_eq!(kinds(&doc).len(), 1);
    }

    #[test]
    fn test_bare_block_ends_at_brace() {
        let doc = parse("{ print 1; } print 2;");
        assert_eq!(kinds(&doc), vec![StatementKind::Compound, StatementKind::Statement]);
    }

    #[test]
    fn test_sub_ends_after_block() {
        let doc = parse("sub foo { 1 } sub bar { 2 }");
        assert_eq!(kinds(&doc), vec![StatementKind::Sub, StatementKind::Sub]);
        let foo = statements(&doc)[0];
        assert_eq!(doc.sub_name(foo), Some("foo"));
        assert!(doc.isa(doc.sub_block(foo).unwrap(), ElementClass::AnyStructure));
    }

    #[test]
    fn test_package_block() {
        let doc = parse("package Foo { sub x {} } 1;");
        assert_eq!(kinds(&doc), vec![StatementKind::Package, StatementKind::Statement]);
    }
}
