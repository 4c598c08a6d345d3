//! Tree builder
//!
//!     Three mutually recursive loops consume the token stream:
//!
//!         - the document loop adds insignificant tokens directly and opens a statement
//!           for everything else,
//!         - the statement loop adds tokens until a terminator, a closing bracket, a
//!           separator or (for block-ending statements) the continuation rules say
//!           the statement is over, descending into a structure at every opening
//!           bracket,
//!         - the structure loop opens statements until it meets its own closing bracket.
//!
//!     Insignificant tokens seen inside a statement are delayed rather than added: if
//!     the statement ends, they are rolled back together with the token that ended
//!     it, so trailing whitespace and comments belong to the enclosing container
//!     instead of the statement.

use super::error::ParseError;
use crate::cst::ast::{Document, ElementId, NodeKind, StatementKind, StructureKind, TreeError};
use crate::cst::config::ParserConfig;
use crate::cst::lexing::Tokenizer;
use crate::cst::report::Reporter;
use crate::cst::token::{Attribute, Token, TokenKind};
use tracing::{debug, warn};

/// Builds a [Document] from source text
pub struct Parser<'r> {
    config: ParserConfig,
    reporter: Box<dyn Reporter + 'r>,
}

impl<'r> Parser<'r> {
    pub fn new(config: ParserConfig) -> Self {
        let reporter = config.reporter.build();
        Self { config, reporter }
    }

    /// Route anomalies to `reporter` instead of the configured one.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'r) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a whole source text.
    ///
    /// A fatal error yields no tree at all; recoverable anomalies are flagged in the
    /// returned document and passed to the reporter.
    pub fn parse(&mut self, source: &str) -> Result<Document, ParseError> {
        debug!(bytes = source.len(), "parsing document");
        let mut builder = Builder {
            tokenizer: Tokenizer::new(source),
            doc: Document::with_source(source, self.config.tab_width),
            delayed: Vec::new(),
            reporter: &mut *self.reporter,
            depth: 0,
            max_depth: self.config.max_depth,
            line: 1,
            column: 1,
            reported: None,
        };
        builder.lex_document()?;
        Ok(builder.doc)
    }
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Closing bracket for an opening structure token.
fn opposite(open: &str) -> &'static str {
    match open {
        "{" => "}",
        "(" => ")",
        _ => "]",
    }
}

pub(super) struct Builder<'a, 'r> {
    pub(super) tokenizer: Tokenizer<'a>,
    pub(super) doc: Document,
    pub(super) delayed: Vec<Token>,
    reporter: &'r mut dyn Reporter,
    depth: usize,
    max_depth: usize,
    // Position of the last token read, for error context
    line: usize,
    column: usize,
    // Offset of the last brace reported as unmatched
    reported: Option<usize>,
}

impl Builder<'_, '_> {
    // ========================================================================
    // Token plumbing
    // ========================================================================

    pub(super) fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        match self.tokenizer.next_token() {
            Ok(token) => {
                if let Some(token) = &token {
                    self.line = token.line;
                    self.column = token.column;
                }
                Ok(token)
            }
            Err(err) => {
                self.reporter.tokenizer_failure(&err);
                Err(err.into())
            }
        }
    }

    /// Put the delayed tokens, then `token`, back into the stream.
    pub(super) fn rollback(&mut self, token: Option<Token>) {
        let mut tokens = std::mem::take(&mut self.delayed);
        tokens.extend(token);
        self.tokenizer.rollback_all(tokens);
    }

    /// The next `count` significant tokens (fewer at end of input), leaving the
    /// stream and the delayed tokens untouched.
    pub(super) fn peek_significant(&mut self, count: usize) -> Result<Vec<Token>, ParseError> {
        let mut seen = Vec::new();
        let mut significant = Vec::new();
        while significant.len() < count {
            let Some(token) = self.next_token()? else {
                break;
            };
            if token.significant() {
                significant.push(token.clone());
            }
            seen.push(token);
        }
        self.tokenizer.rollback_all(seen);
        Ok(significant)
    }

    pub(super) fn peek_next(&mut self) -> Result<Option<Token>, ParseError> {
        Ok(self.peek_significant(1)?.into_iter().next())
    }

    pub(super) fn tree<T>(&mut self, result: Result<T, TreeError>) -> Result<T, ParseError> {
        result.map_err(|cause| {
            self.reporter.tree_walk_failure(&cause.to_string());
            ParseError::Tree {
                line: self.line,
                cause,
            }
        })
    }

    pub(super) fn unreachable(&self, token: &Token, message: impl Into<String>) -> ParseError {
        ParseError::Unreachable {
            line: token.line,
            column: token.column,
            message: message.into(),
        }
    }

    // ========================================================================
    // Tree plumbing
    // ========================================================================

    fn add_delayed(&mut self, parent: ElementId) -> Result<(), ParseError> {
        for token in std::mem::take(&mut self.delayed) {
            let added = self.doc.add_token(parent, token);
            self.tree(added)?;
        }
        Ok(())
    }

    fn add_token(&mut self, parent: ElementId, token: Token) -> Result<(), ParseError> {
        self.add_delayed(parent)?;
        let added = self.doc.add_token(parent, token);
        self.tree(added).map(|_| ())
    }

    fn add_node(&mut self, parent: ElementId, node: ElementId) -> Result<(), ParseError> {
        self.add_delayed(parent)?;
        let added = self.doc.add_child(parent, node);
        self.tree(added)
    }

    fn new_statement(
        &mut self,
        kind: StatementKind,
        first: Option<Token>,
    ) -> Result<ElementId, ParseError> {
        let statement = self.doc.new_node(NodeKind::Statement(kind));
        if let Some(token) = first {
            let added = self.doc.add_token(statement, token);
            self.tree(added)?;
        }
        Ok(statement)
    }

    fn new_structure(&mut self, kind: StructureKind, open: Token) -> Result<ElementId, ParseError> {
        let structure = self.doc.new_node(NodeKind::Structure(kind));
        let started = self.doc.set_start(structure, open);
        self.tree(started)?;
        Ok(structure)
    }

    fn report_unmatched(&mut self, token: &Token) {
        if self.reported == Some(token.offset) {
            return;
        }
        self.reported = Some(token.offset);
        warn!(line = token.line, column = token.column, brace = %token.content, "unmatched closing brace");
        self.reporter.unmatched_brace(token);
    }

    // ========================================================================
    // Loops
    // ========================================================================

    fn lex_document(&mut self) -> Result<(), ParseError> {
        let root = self.doc.root();
        while let Some(token) = self.next_token()? {
            if !token.significant() {
                self.add_token(root, token)?;
                continue;
            }
            if token.is_structure(";") {
                let null = self.new_statement(StatementKind::Null, Some(token))?;
                self.add_node(root, null)?;
                continue;
            }
            if token.kind != TokenKind::Structure {
                let kind = self.resolve_statement(root, &token)?;
                let statement = self.new_statement(kind, Some(token))?;
                self.add_node(root, statement)?;
                self.lex_statement(statement)?;
                continue;
            }
            if token.opens().is_some() {
                self.rollback(Some(token));
                let statement = self.new_statement(StatementKind::Statement, None)?;
                self.add_node(root, statement)?;
                self.lex_statement(statement)?;
                continue;
            }
            // A closing bracket with nothing open
            self.report_unmatched(&token);
            let statement = self.new_statement(StatementKind::UnmatchedBrace, Some(token))?;
            self.add_node(root, statement)?;
        }
        self.add_delayed(root)
    }

    fn lex_statement(&mut self, statement: ElementId) -> Result<(), ParseError> {
        if matches!(
            self.doc.statement_kind(statement),
            Some(StatementKind::End | StatementKind::Data)
        ) {
            return self.lex_end(statement);
        }

        while let Some(token) = self.next_token()? {
            if !token.significant() {
                self.delayed.push(token);
                continue;
            }
            // Closing brackets and separators end every kind of statement
            if token.closes().is_some() || token.kind == TokenKind::Separator {
                self.rollback(Some(token));
                return Ok(());
            }
            let normal = self
                .doc
                .statement_kind(statement)
                .map_or(true, StatementKind::is_normal);
            if !normal && !self.continues(statement, &token)? {
                self.rollback(Some(token));
                return Ok(());
            }
            if token.kind != TokenKind::Structure {
                self.add_token(statement, token)?;
                continue;
            }
            if token.is_structure(";") {
                self.add_token(statement, token)?;
                return Ok(());
            }

            let (kind, hinted) = match token.content.as_str() {
                "{" => self.resolve_curly(statement)?,
                "[" => (self.resolve_square(statement), false),
                _ => (self.resolve_round(statement), false),
            };
            let structure = self.new_structure(kind, token)?;
            if hinted {
                self.doc.set_attribute(structure, Attribute::Hint);
            }
            self.add_node(statement, structure)?;
            self.lex_structure(structure)?;
        }

        // End of input: trailing insignificant tokens go to the container
        self.rollback(None);
        Ok(())
    }

    /// `__END__` and `__DATA__` statements own everything that follows.
    fn lex_end(&mut self, statement: ElementId) -> Result<(), ParseError> {
        while let Some(token) = self.next_token()? {
            self.add_token(statement, token)?;
        }
        Ok(())
    }

    fn lex_structure(&mut self, structure: ElementId) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                line: self.line,
                column: self.column,
                limit: self.max_depth,
            });
        }
        let result = self.lex_structure_body(structure);
        self.depth -= 1;
        result
    }

    fn lex_structure_body(&mut self, structure: ElementId) -> Result<(), ParseError> {
        let closing = self
            .doc
            .start(structure)
            .map(|start| opposite(self.doc.text(start)))
            .unwrap_or("");

        while let Some(token) = self.next_token()? {
            if !token.significant() {
                self.delayed.push(token);
                continue;
            }
            if token.kind != TokenKind::Structure {
                self.add_delayed(structure)?;
                let kind = self.resolve_statement(structure, &token)?;
                let statement = self.new_statement(kind, Some(token))?;
                self.add_node(structure, statement)?;
                self.lex_statement(statement)?;
                continue;
            }
            if token.opens().is_some() {
                self.rollback(Some(token));
                let statement = self.new_statement(StatementKind::Statement, None)?;
                self.add_node(structure, statement)?;
                self.lex_statement(statement)?;
                continue;
            }
            if token.closes().is_some() {
                if token.content == closing {
                    self.add_delayed(structure)?;
                    let finished = self.doc.set_finish(structure, token);
                    self.tree(finished)?;
                    self.confirm_for_loop(structure)?;
                    return Ok(());
                }
                // Treat a mismatched close as ending this structure
                self.report_unmatched(&token);
                self.rollback(Some(token));
                return Ok(());
            }
            let null = self.new_statement(StatementKind::Null, Some(token))?;
            self.add_node(structure, null)?;
        }

        self.add_delayed(structure)
    }

    // A `for (...)` holding fewer than two statements was a list all along.
    fn confirm_for_loop(&mut self, structure: ElementId) -> Result<(), ParseError> {
        if self.doc.structure_kind(structure) != Some(StructureKind::For) {
            return Ok(());
        }
        let statements = self
            .doc
            .children(structure)
            .iter()
            .filter(|&&child| self.doc.statement_kind(child).is_some())
            .count();
        if statements < 2 {
            let changed = self
                .doc
                .change_to(structure, NodeKind::Structure(StructureKind::List));
            self.tree(changed)?;
        }
        Ok(())
    }
}
