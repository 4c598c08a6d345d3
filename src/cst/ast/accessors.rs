//! Typed accessors for statements, structures and symbols
//!
//!     These read the significant children of a resolved node. They never fail: a
//!     question that does not apply to the element (asking a block for its namespace)
//!     answers `None`.

use super::class::{CompoundType, ElementClass, StatementKind, StructureKind};
use super::document::{Document, ElementId};
use crate::cst::classify;
use crate::cst::token::{HereDoc, TokenFamily, TokenKind};

impl Document {
    fn word_at(&self, id: ElementId, index: isize) -> Option<&str> {
        let child = self.schild(id, index)?;
        (self.token_kind(child) == Some(TokenKind::Word)).then(|| self.text(child))
    }

    fn is_block(&self, id: ElementId) -> bool {
        self.structure_kind(id) == Some(StructureKind::Block)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Syntactic type of a compound statement.
    ///
    /// `unless` reads as `if` and `until` as `while`. A `for`/`foreach` keyword is
    /// `Foreach` when followed by a declarator, a variable, a word list or a plain
    /// list, and `For` otherwise.
    pub fn compound_type(&self, id: ElementId) -> Option<CompoundType> {
        if self.statement_kind(id) != Some(StatementKind::Compound) {
            return None;
        }
        let mut position = 0;
        let mut first = self.schild(id, position)?;
        if self.token_kind(first) == Some(TokenKind::Label) {
            position += 1;
            match self.schild(id, position) {
                Some(next) => first = next,
                None => return Some(CompoundType::Label),
            }
        }

        if self.is_block(first) {
            return Some(CompoundType::Continue);
        }
        if self.token_kind(first) != Some(TokenKind::Word) {
            return None;
        }
        match self.text(first) {
            "if" | "unless" => Some(CompoundType::If),
            "while" | "until" => Some(CompoundType::While),
            keyword @ ("for" | "foreach") => {
                let Some(next) = self.schild(id, position + 1) else {
                    return Some(if keyword == "for" {
                        CompoundType::For
                    } else {
                        CompoundType::Foreach
                    });
                };
                let foreach = match self.token(next) {
                    Some(token) => {
                        classify::is_variable_declarator(&token.content)
                            || token.kind.family() == Some(TokenFamily::Symbol)
                            || token.kind == TokenKind::QuoteLikeWords
                    }
                    None => self.structure_kind(next) == Some(StructureKind::List),
                };
                Some(if foreach {
                    CompoundType::Foreach
                } else {
                    CompoundType::For
                })
            }
            _ => None,
        }
    }

    /// Name of a named sub or scheduled block.
    pub fn sub_name(&self, id: ElementId) -> Option<&str> {
        if !self.isa(id, ElementClass::Statement(StatementKind::Sub)) {
            return None;
        }
        // `AUTOLOAD` and `DESTROY` may omit the `sub` keyword
        self.word_at(id, 1).or_else(|| self.word_at(id, 0))
    }

    /// The body of a sub, `None` for a forward declaration.
    pub fn sub_block(&self, id: ElementId) -> Option<ElementId> {
        if !self.isa(id, ElementClass::Statement(StatementKind::Sub)) {
            return None;
        }
        self.schild(id, -1).filter(|&last| self.is_block(last))
    }

    /// A sub declared without a body, like `sub foo;`.
    pub fn is_forward(&self, id: ElementId) -> bool {
        self.isa(id, ElementClass::Statement(StatementKind::Sub)) && self.sub_block(id).is_none()
    }

    /// Prototype text without its parentheses and whitespace.
    pub fn prototype(&self, id: ElementId) -> Option<String> {
        let proto = self
            .children(id)
            .iter()
            .copied()
            .find(|&c| self.token_kind(c) == Some(TokenKind::Prototype))?;
        let text = self.text(proto);
        let text = text.strip_prefix('(').unwrap_or(text);
        let text = text.strip_suffix(')').unwrap_or(text);
        Some(text.chars().filter(|c| !c.is_whitespace()).collect())
    }

    /// Package name declared by a `package` statement.
    pub fn namespace(&self, id: ElementId) -> Option<&str> {
        if self.statement_kind(id) != Some(StatementKind::Package) {
            return None;
        }
        self.word_at(id, 1)
    }

    /// `use`, `no` or `require`.
    pub fn include_type(&self, id: ElementId) -> Option<&str> {
        if !self.isa(id, ElementClass::Statement(StatementKind::Include)) {
            return None;
        }
        self.word_at(id, 0)
    }

    /// Module named by an include statement.
    pub fn module(&self, id: ElementId) -> Option<&str> {
        self.include_type(id)?;
        self.word_at(id, 1)
    }

    /// Version number requested after the module name, as in `use Foo 1.2;`.
    pub fn module_version(&self, id: ElementId) -> Option<ElementId> {
        self.include_type(id)?;
        if let Some(argument) = self.schild(id, 3) {
            if self.token_kind(argument) == Some(TokenKind::Operator) {
                return None;
            }
        }
        let version = self.schild(id, 2)?;
        self.isa(version, ElementClass::Kind(TokenKind::Number))
            .then_some(version)
    }

    /// Language version of a version-only include, as in `use 5.010;`.
    pub fn version(&self, id: ElementId) -> Option<&str> {
        self.include_type(id)?;
        let version = self.schild(id, 1)?;
        self.isa(version, ElementClass::Kind(TokenKind::Number))
            .then(|| self.text(version))
    }

    /// Declarator of a variable statement: `my`, `our`, `local` or `state`.
    pub fn variable_type(&self, id: ElementId) -> Option<&str> {
        if self.statement_kind(id) != Some(StatementKind::Variable) {
            return None;
        }
        self.word_at(id, 0)
    }

    // ========================================================================
    // Structures
    // ========================================================================

    /// Brace pair of a structure, derived from whichever brace was seen.
    pub fn braces(&self, id: ElementId) -> Option<&'static str> {
        let node = self.node(id)?;
        let brace = node
            .start
            .or(node.finish)
            .and_then(|b| self.token(b))?;
        match brace.content.as_str() {
            "{" | "}" => Some("{}"),
            "(" | ")" => Some("()"),
            "[" | "]" => Some("[]"),
            _ => None,
        }
    }

    /// Both braces present.
    pub fn is_complete(&self, id: ElementId) -> bool {
        self.node(id)
            .map(|node| node.start.is_some() && node.finish.is_some())
            .unwrap_or(false)
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Symbol with whitespace removed, `'` package separators normalised and an
    /// empty leading package spelled `main`.
    pub fn canonical(&self, id: ElementId) -> Option<String> {
        if !self.isa(id, ElementClass::Kind(TokenKind::Symbol)) {
            return None;
        }
        let mut symbol: String = self
            .text(id)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .replace('\'', "::");
        let mut chars = symbol.chars();
        if let Some(sigil) = chars.next() {
            if "$@%&*".contains(sigil) && chars.as_str().starts_with("::") {
                symbol.insert_str(sigil.len_utf8(), "main");
            }
        }
        Some(symbol)
    }

    /// The sigil as written.
    pub fn raw_sigil(&self, id: ElementId) -> Option<char> {
        if !self.isa(id, ElementClass::Kind(TokenKind::Symbol)) {
            return None;
        }
        self.text(id).chars().next()
    }

    /// The symbol actually referred to, taking a following subscript into account:
    /// `$foo[0]` is `@foo` and `$foo{a}` is `%foo`.
    pub fn resolved_symbol(&self, id: ElementId) -> Option<String> {
        let mut symbol = self.canonical(id)?;
        let sigil = symbol.chars().next()?;
        if sigil == '&' {
            return Some(symbol);
        }
        let Some(after) = self.next_significant_sibling(id) else {
            return Some(symbol);
        };
        if !self.isa(after, ElementClass::AnyStructure) {
            return Some(symbol);
        }
        let Some(braces) = self.braces(after) else {
            return Some(symbol);
        };

        let replacement = match (sigil, braces) {
            ('$', _) => {
                let cast_before = self.prev_significant_sibling(id).is_some_and(|before| {
                    self.token_kind(before) == Some(TokenKind::Cast)
                        && matches!(self.text(before), "$" | "@")
                });
                match braces {
                    _ if cast_before => None,
                    "[]" => Some('@'),
                    "{}" => Some('%'),
                    _ => None,
                }
            }
            ('@', "{}") => Some('%'),
            ('%', "[]") => Some('@'),
            _ => None,
        };
        if let Some(new_sigil) = replacement {
            symbol.replace_range(..sigil.len_utf8(), &new_sigil.to_string());
        }
        Some(symbol)
    }

    /// Heredoc payload and terminator of a heredoc token.
    pub fn heredoc(&self, id: ElementId) -> Option<&HereDoc> {
        self.token(id)?.heredoc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::class::NodeKind;
    use crate::cst::token::Token;

    fn statement(doc: &mut Document, kind: StatementKind, words: &[(TokenKind, &str)]) -> ElementId {
        let stmt = doc.new_node(NodeKind::Statement(kind));
        doc.add_child(doc.root(), stmt).unwrap();
        let mut offset = 0;
        for (i, (token_kind, text)) in words.iter().enumerate() {
            if i > 0 {
                doc.add_token(stmt, Token::new(TokenKind::Whitespace, " ", 1, offset + 1, offset))
                    .unwrap();
                offset += 1;
            }
            doc.add_token(stmt, Token::new(*token_kind, *text, 1, offset + 1, offset))
                .unwrap();
            offset += text.len();
        }
        stmt
    }

    #[test]
    fn test_include_accessors() {
        let mut doc = Document::new();
        let stmt = statement(
            &mut doc,
            StatementKind::Include,
            &[
                (TokenKind::Word, "use"),
                (TokenKind::Word, "Foo::Bar"),
                (TokenKind::NumberFloat, "1.2"),
                (TokenKind::Structure, ";"),
            ],
        );
        assert_eq!(doc.include_type(stmt), Some("use"));
        assert_eq!(doc.module(stmt), Some("Foo::Bar"));
        let version = doc.module_version(stmt).unwrap();
        assert_eq!(doc.text(version), "1.2");
        assert_eq!(doc.version(stmt), None);
    }

    #[test]
    fn test_version_only_include() {
        let mut doc = Document::new();
        let stmt = statement(
            &mut doc,
            StatementKind::Include,
            &[(TokenKind::Word, "use"), (TokenKind::NumberFloat, "5.010")],
        );
        assert_eq!(doc.version(stmt), Some("5.010"));
        assert_eq!(doc.module(stmt), None);
    }

    #[test]
    fn test_sub_accessors() {
        let mut doc = Document::new();
        let stmt = statement(
            &mut doc,
            StatementKind::Sub,
            &[
                (TokenKind::Word, "sub"),
                (TokenKind::Word, "foo"),
                (TokenKind::Prototype, "($ $)"),
                (TokenKind::Structure, ";"),
            ],
        );
        assert_eq!(doc.sub_name(stmt), Some("foo"));
        assert!(doc.is_forward(stmt));
        assert_eq!(doc.prototype(stmt).as_deref(), Some("$$"));
    }

    #[test]
    fn test_variable_and_package() {
        let mut doc = Document::new();
        let var = statement(
            &mut doc,
            StatementKind::Variable,
            &[(TokenKind::Word, "our"), (TokenKind::Symbol, "$x")],
        );
        let pkg = statement(
            &mut doc,
            StatementKind::Package,
            &[(TokenKind::Word, "package"), (TokenKind::Word, "Foo")],
        );
        assert_eq!(doc.variable_type(var), Some("our"));
        assert_eq!(doc.namespace(pkg), Some("Foo"));
        assert_eq!(doc.namespace(var), None);
    }

    #[test]
    fn test_canonical_symbol() {
        let mut doc = Document::new();
        let stmt = statement(
            &mut doc,
            StatementKind::Statement,
            &[(TokenKind::Symbol, "$::foo"), (TokenKind::Symbol, "@Foo'bar")],
        );
        let symbols = doc.schildren(stmt).to_vec();
        assert_eq!(doc.canonical(symbols[0]).as_deref(), Some("$main::foo"));
        assert_eq!(doc.canonical(symbols[1]).as_deref(), Some("@Foo::bar"));
        assert_eq!(doc.raw_sigil(symbols[1]), Some('@'));
    }
}
