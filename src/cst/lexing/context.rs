//! Operator/operand context
//!
//!     Many characters mean different things depending on whether the tokenizer is
//!     expecting a term or an operator: `/` divides or starts a pattern, `%` takes a
//!     modulus or marks a hash, `<` compares or reads a line. The context is derived
//!     from the last few significant tokens produced.

use crate::cst::classify;
use crate::cst::token::{Token, TokenKind};
use std::collections::VecDeque;

const HISTORY: usize = 3;

/// What the next token is expected to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// A term: variables, literals, patterns.
    Operand,
    /// An infix or postfix operator.
    Operator,
    /// Cannot tell from the preceding token alone.
    Unknown,
}

/// Recent significant tokens, kind and content
#[derive(Debug, Clone, Default)]
pub struct Context {
    recent: VecDeque<(TokenKind, String)>,
    sub_declaration: bool,
}

impl Context {
    pub fn record(&mut self, token: &Token) {
        if !token.significant() {
            return;
        }
        if token.is_word("sub") {
            self.sub_declaration = true;
        } else if token.kind == TokenKind::Structure {
            self.sub_declaration = false;
        }
        if self.recent.len() == HISTORY {
            self.recent.pop_front();
        }
        self.recent.push_back((token.kind, token.content.clone()));
    }

    /// The `n`-th most recent significant token, 0 being the last.
    pub fn back(&self, n: usize) -> Option<(TokenKind, &str)> {
        let index = self.recent.len().checked_sub(n + 1)?;
        self.recent
            .get(index)
            .map(|(kind, content)| (*kind, content.as_str()))
    }

    pub fn last(&self) -> Option<(TokenKind, &str)> {
        self.back(0)
    }

    fn last_is(&self, kind: TokenKind, content: &str) -> bool {
        self.last() == Some((kind, content))
    }

    pub fn expects(&self) -> Expect {
        let Some((kind, content)) = self.last() else {
            return Expect::Operand;
        };
        match kind {
            TokenKind::Structure => match content {
                ")" | "]" => Expect::Operator,
                "}" => Expect::Unknown,
                _ => Expect::Operand,
            },
            TokenKind::Word if classify::is_operand_word(content) || content == "sub" => {
                Expect::Operand
            }
            TokenKind::Word => Expect::Unknown,
            TokenKind::ArrayIndex | TokenKind::HereDoc => Expect::Operator,
            TokenKind::Operator
            | TokenKind::Cast
            | TokenKind::Label
            | TokenKind::Prototype
            | TokenKind::Attribute
            | TokenKind::Separator => Expect::Operand,
            // Numbers, symbols and quotes all end a term
            _ if kind.family().is_some() => Expect::Operator,
            _ => Expect::Unknown,
        }
    }

    /// No significant token yet, or the last one ended a statement or block edge.
    pub fn at_statement_start(&self) -> bool {
        match self.last() {
            None => true,
            Some((TokenKind::Structure, content)) => matches!(content, ";" | "{" | "}"),
            Some((TokenKind::Label, _)) => true,
            _ => false,
        }
    }

    /// The last token was the `sub` keyword.
    pub fn after_sub_keyword(&self) -> bool {
        self.last_is(TokenKind::Word, "sub")
    }

    /// The last token was `->`, so a word here is a method name.
    pub fn after_arrow(&self) -> bool {
        self.last_is(TokenKind::Operator, "->")
    }

    /// The last token was an opening curly brace.
    pub fn after_open_curly(&self) -> bool {
        self.last_is(TokenKind::Structure, "{")
    }

    /// A `(` here would be the prototype of `sub` or `sub NAME`.
    pub fn expects_prototype(&self) -> bool {
        if !self.sub_declaration {
            return false;
        }
        match (self.back(0), self.back(1)) {
            (Some((TokenKind::Word, "sub")), _) => true,
            (Some((TokenKind::Word, _)), Some((TokenKind::Word, "sub"))) => true,
            _ => false,
        }
    }

    /// A word here would be a sub attribute (`sub foo : lvalue`).
    pub fn expects_attribute(&self) -> bool {
        self.sub_declaration
            && matches!(
                self.last(),
                Some((TokenKind::Operator, ":")) | Some((TokenKind::Attribute, _))
            )
    }

    /// A `:` here introduces sub attributes.
    pub fn in_sub_declaration(&self) -> bool {
        self.sub_declaration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_after(tokens: &[(TokenKind, &str)]) -> Context {
        let mut context = Context::default();
        for (kind, content) in tokens {
            context.record(&Token::new(*kind, *content, 1, 1, 0));
        }
        context
    }

    #[test]
    fn test_expectations() {
        assert_eq!(Context::default().expects(), Expect::Operand);
        assert_eq!(
            context_after(&[(TokenKind::Symbol, "$x")]).expects(),
            Expect::Operator
        );
        assert_eq!(
            context_after(&[(TokenKind::Word, "split")]).expects(),
            Expect::Operand
        );
        assert_eq!(
            context_after(&[(TokenKind::Word, "foo")]).expects(),
            Expect::Unknown
        );
        assert_eq!(
            context_after(&[(TokenKind::Structure, "(")]).expects(),
            Expect::Operand
        );
        assert_eq!(
            context_after(&[(TokenKind::NumberHex, "0x1f")]).expects(),
            Expect::Operator
        );
    }

    #[test]
    fn test_insignificant_tokens_are_ignored() {
        let context = context_after(&[
            (TokenKind::Symbol, "$x"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Comment, "# hi"),
        ]);
        assert_eq!(context.last(), Some((TokenKind::Symbol, "$x")));
    }

    #[test]
    fn test_sub_declaration_tracking() {
        let context = context_after(&[(TokenKind::Word, "sub"), (TokenKind::Word, "foo")]);
        assert!(context.expects_prototype());
        let context = context_after(&[
            (TokenKind::Word, "sub"),
            (TokenKind::Word, "foo"),
            (TokenKind::Operator, ":"),
        ]);
        assert!(context.expects_attribute());
        let context = context_after(&[
            (TokenKind::Word, "sub"),
            (TokenKind::Structure, "{"),
            (TokenKind::Word, "foo"),
        ]);
        assert!(!context.expects_prototype());
    }

    #[test]
    fn test_statement_start() {
        assert!(Context::default().at_statement_start());
        assert!(context_after(&[(TokenKind::Structure, ";")]).at_statement_start());
        assert!(!context_after(&[(TokenKind::Word, "print")]).at_statement_start());
    }
}
