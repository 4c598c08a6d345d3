//! Element classes
//!
//!     Concrete node and token kinds are flat enums. Queries still need the
//!     "is a" relation of the tree builder's class hierarchy (a `Variable` statement
//!     is an `Expression`, a `Magic` variable is a `Symbol`, every hex number is a
//!     `Number`), which [ElementClass::parent] encodes one step at a time.

use crate::cst::token::{TokenFamily, TokenKind};
use std::fmt;

/// Concrete statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum StatementKind {
    /// Generic statement
    Statement,
    Expression,
    Variable,
    Package,
    Include,
    IncludePerl6,
    Sub,
    Scheduled,
    Compound,
    Break,
    Given,
    When,
    Data,
    End,
    Null,
    UnmatchedBrace,
    Unknown,
}

impl StatementKind {
    /// Normal statements end only at a terminator or a closing brace; the others
    /// may end implicitly after a block.
    pub fn is_normal(self) -> bool {
        !matches!(
            self,
            StatementKind::Sub
                | StatementKind::Scheduled
                | StatementKind::Compound
                | StatementKind::Given
                | StatementKind::When
                | StatementKind::Package
        )
    }

    pub fn name(self) -> &'static str {
        use StatementKind::*;
        match self {
            Statement => "Statement",
            Expression => "Statement::Expression",
            Variable => "Statement::Variable",
            Package => "Statement::Package",
            Include => "Statement::Include",
            IncludePerl6 => "Statement::Include::Perl6",
            Sub => "Statement::Sub",
            Scheduled => "Statement::Scheduled",
            Compound => "Statement::Compound",
            Break => "Statement::Break",
            Given => "Statement::Given",
            When => "Statement::When",
            Data => "Statement::Data",
            End => "Statement::End",
            Null => "Statement::Null",
            UnmatchedBrace => "Statement::UnmatchedBrace",
            Unknown => "Statement::Unknown",
        }
    }
}

/// Concrete structure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum StructureKind {
    Block,
    Subscript,
    Constructor,
    Condition,
    List,
    For,
    Given,
    When,
    Unknown,
}

impl StructureKind {
    pub fn name(self) -> &'static str {
        use StructureKind::*;
        match self {
            Block => "Structure::Block",
            Subscript => "Structure::Subscript",
            Constructor => "Structure::Constructor",
            Condition => "Structure::Condition",
            List => "Structure::List",
            For => "Structure::For",
            Given => "Structure::Given",
            When => "Structure::When",
            Unknown => "Structure::Unknown",
        }
    }
}

/// Syntactic type of a compound statement, used by the continuation grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum CompoundType {
    /// `if` and `unless`
    If,
    /// `while` and `until`
    While,
    /// C-style `for (;;)`, or a `for` whose form is not known yet
    For,
    Foreach,
    /// Only a label seen so far
    Label,
    /// A bare block, optionally followed by `continue`
    Continue,
}

impl fmt::Display for CompoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompoundType::If => "if",
            CompoundType::While => "while",
            CompoundType::For => "for",
            CompoundType::Foreach => "foreach",
            CompoundType::Label => "label",
            CompoundType::Continue => "continue",
        };
        f.write_str(name)
    }
}

/// Node shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum NodeKind {
    Document,
    Statement(StatementKind),
    Structure(StructureKind),
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Statement(kind) => kind.name(),
            NodeKind::Structure(kind) => kind.name(),
        }
    }
}

/// A position in the element class hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Element,
    Node,
    Token,
    Document,
    /// Any statement
    AnyStatement,
    Statement(StatementKind),
    /// Any structure
    AnyStructure,
    Structure(StructureKind),
    /// An abstract token family
    Family(TokenFamily),
    Kind(TokenKind),
}

impl ElementClass {
    /// The immediate superclass, `None` for [ElementClass::Element].
    pub fn parent(self) -> Option<ElementClass> {
        use ElementClass::*;
        Some(match self {
            Element => return None,
            Node | Token => Element,
            Document | AnyStatement | AnyStructure => Node,
            Statement(kind) => match kind {
                StatementKind::Statement => AnyStatement,
                StatementKind::Variable => Statement(StatementKind::Expression),
                StatementKind::IncludePerl6 => Statement(StatementKind::Include),
                StatementKind::Scheduled => Statement(StatementKind::Sub),
                _ => Statement(StatementKind::Statement),
            },
            Structure(_) => AnyStructure,
            Family(_) => Token,
            Kind(kind) => match kind.family() {
                // The plain decimal number and plain symbol are the family roots
                Some(TokenFamily::Number) if kind == TokenKind::Number => Token,
                Some(TokenFamily::Symbol) if kind == TokenKind::Symbol => Token,
                Some(TokenFamily::Number) if kind == TokenKind::NumberExp => {
                    Kind(TokenKind::NumberFloat)
                }
                Some(TokenFamily::Number) => Kind(TokenKind::Number),
                Some(TokenFamily::Symbol) => Kind(TokenKind::Symbol),
                Some(family) => Family(family),
                None => Token,
            },
        })
    }

    /// True when `self` is `other` or one of its subclasses.
    pub fn isa(self, other: ElementClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other || Self::aliases(class, other) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    // `Kind(Number)` and `Family(Number)` name the same class, as do the symbol pair.
    fn aliases(class: ElementClass, other: ElementClass) -> bool {
        matches!(
            (class, other),
            (
                ElementClass::Kind(TokenKind::Number),
                ElementClass::Family(TokenFamily::Number)
            ) | (
                ElementClass::Kind(TokenKind::Symbol),
                ElementClass::Family(TokenFamily::Symbol)
            )
        )
    }

    pub fn of_node(kind: NodeKind) -> ElementClass {
        match kind {
            NodeKind::Document => ElementClass::Document,
            NodeKind::Statement(kind) => ElementClass::Statement(kind),
            NodeKind::Structure(kind) => ElementClass::Structure(kind),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementClass::Element => "Element",
            ElementClass::Node => "Node",
            ElementClass::Token => "Token",
            ElementClass::Document => "Document",
            ElementClass::AnyStatement => "Statement",
            ElementClass::Statement(kind) => kind.name(),
            ElementClass::AnyStructure => "Structure",
            ElementClass::Structure(kind) => kind.name(),
            ElementClass::Family(TokenFamily::Number) => "Token::Number",
            ElementClass::Family(TokenFamily::Symbol) => "Token::Symbol",
            ElementClass::Family(TokenFamily::Quote) => "Token::Quote",
            ElementClass::Family(TokenFamily::QuoteLike) => "Token::QuoteLike",
            ElementClass::Family(TokenFamily::Regexp) => "Token::Regexp",
            ElementClass::Kind(kind) => kind.name(),
        }
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_hierarchy() {
        let variable = ElementClass::Statement(StatementKind::Variable);
        assert!(variable.isa(ElementClass::Statement(StatementKind::Expression)));
        assert!(variable.isa(ElementClass::Statement(StatementKind::Statement)));
        assert!(variable.isa(ElementClass::AnyStatement));
        assert!(variable.isa(ElementClass::Node));
        assert!(!variable.isa(ElementClass::Token));

        let scheduled = ElementClass::Statement(StatementKind::Scheduled);
        assert!(scheduled.isa(ElementClass::Statement(StatementKind::Sub)));
    }

    #[test]
    fn test_token_hierarchy() {
        let exp = ElementClass::Kind(TokenKind::NumberExp);
        assert!(exp.isa(ElementClass::Kind(TokenKind::NumberFloat)));
        assert!(exp.isa(ElementClass::Kind(TokenKind::Number)));
        assert!(exp.isa(ElementClass::Family(TokenFamily::Number)));
        assert!(exp.isa(ElementClass::Token));

        let magic = ElementClass::Kind(TokenKind::Magic);
        assert!(magic.isa(ElementClass::Kind(TokenKind::Symbol)));

        let words = ElementClass::Kind(TokenKind::QuoteLikeWords);
        assert!(words.isa(ElementClass::Family(TokenFamily::QuoteLike)));
        assert!(!words.isa(ElementClass::Family(TokenFamily::Quote)));
    }

    #[test]
    fn test_structures() {
        let block = ElementClass::Structure(StructureKind::Block);
        assert!(block.isa(ElementClass::AnyStructure));
        assert!(!block.isa(ElementClass::Structure(StructureKind::List)));
    }

    #[test]
    fn test_normal_statements() {
        assert!(StatementKind::Statement.is_normal());
        assert!(StatementKind::Variable.is_normal());
        assert!(!StatementKind::Compound.is_normal());
        assert!(!StatementKind::Sub.is_normal());
    }
}
