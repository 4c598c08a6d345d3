//! Core token type
//!
//!     Tokens are the leaves of the tree. Each one carries the exact source text it was
//!     scanned from, so concatenating token contents (plus heredoc payloads, see
//!     [HereDoc](super::detail::HereDoc)) reproduces the input byte for byte.
//!
//!     Token kinds form a flat enum. The grouping into families (numbers, quotes,
//!     quote-likes, regexps) is expressed through [TokenKind::family] and the element
//!     class hierarchy in [class](crate::cst::ast::class).

use super::detail::{Delimited, HereDoc, Section};
use std::fmt;

/// Per-element attribute flag. A single slot, not a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Attribute {
    #[default]
    None,
    /// Truncated or otherwise incomplete element (ran off the end of input).
    Damaged,
    /// An arrow operator that dereferences the following subscript or list.
    Dereference,
    /// The element's kind was chosen by a lookahead heuristic rather than a rule.
    Hint,
    /// Lexically invalid content, e.g. a `9` inside an octal literal.
    Invalid,
}

impl Attribute {
    pub fn is_none(&self) -> bool {
        matches!(self, Attribute::None)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::None => "none",
            Attribute::Damaged => "damaged",
            Attribute::Dereference => "dereference",
            Attribute::Hint => "hint",
            Attribute::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Every concrete token kind the tokenizer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TokenKind {
    // Insignificant
    Whitespace,
    Comment,
    Pod,
    Bom,
    End,

    // Numbers
    Number,
    NumberBinary,
    NumberOctal,
    NumberHex,
    NumberFloat,
    NumberExp,
    NumberVersion,

    // Words and markers
    Word,
    Label,
    Separator,
    Data,

    // Sigiled things
    Symbol,
    Magic,
    ArrayIndex,
    Cast,

    // Sub declarations
    Prototype,
    Attribute,

    Operator,
    Structure,

    // Simple quotes
    QuoteSingle,
    QuoteDouble,
    QuoteLiteral,
    QuoteInterpolate,

    // Quote-like operators
    QuoteLikeBacktick,
    QuoteLikeCommand,
    QuoteLikeRegexp,
    QuoteLikeWords,
    QuoteLikeReadline,

    // Regexp operators
    RegexpMatch,
    RegexpSubstitute,
    RegexpTransliterate,

    HereDoc,
}

/// Abstract token families used by the class hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenFamily {
    Number,
    Symbol,
    Quote,
    QuoteLike,
    Regexp,
}

impl TokenKind {
    /// Whether tokens of this kind are semantically meaningful.
    pub fn is_significant(self) -> bool {
        !matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Pod
                | TokenKind::Bom
                | TokenKind::End
        )
    }

    /// The abstract family this kind belongs to, if any.
    pub fn family(self) -> Option<TokenFamily> {
        use TokenKind::*;
        match self {
            Number | NumberBinary | NumberOctal | NumberHex | NumberFloat | NumberExp
            | NumberVersion => Some(TokenFamily::Number),
            Symbol | Magic => Some(TokenFamily::Symbol),
            QuoteSingle | QuoteDouble | QuoteLiteral | QuoteInterpolate => {
                Some(TokenFamily::Quote)
            }
            QuoteLikeBacktick | QuoteLikeCommand | QuoteLikeRegexp | QuoteLikeWords
            | QuoteLikeReadline => Some(TokenFamily::QuoteLike),
            RegexpMatch | RegexpSubstitute | RegexpTransliterate => Some(TokenFamily::Regexp),
            _ => None,
        }
    }

    pub fn is_number(self) -> bool {
        self.family() == Some(TokenFamily::Number)
    }

    /// Quote, quote-like, regexp or heredoc: anything that is a string-ish term.
    pub fn is_quoted(self) -> bool {
        matches!(
            self.family(),
            Some(TokenFamily::Quote | TokenFamily::QuoteLike | TokenFamily::Regexp)
        ) || self == TokenKind::HereDoc
    }

    /// Display name in the `Family::Kind` style used by the dumper.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Whitespace => "Token::Whitespace",
            Comment => "Token::Comment",
            Pod => "Token::Pod",
            Bom => "Token::BOM",
            End => "Token::End",
            Number => "Token::Number",
            NumberBinary => "Token::Number::Binary",
            NumberOctal => "Token::Number::Octal",
            NumberHex => "Token::Number::Hex",
            NumberFloat => "Token::Number::Float",
            NumberExp => "Token::Number::Exp",
            NumberVersion => "Token::Number::Version",
            Word => "Token::Word",
            Label => "Token::Label",
            Separator => "Token::Separator",
            Data => "Token::Data",
            Symbol => "Token::Symbol",
            Magic => "Token::Magic",
            ArrayIndex => "Token::ArrayIndex",
            Cast => "Token::Cast",
            Prototype => "Token::Prototype",
            Attribute => "Token::Attribute",
            Operator => "Token::Operator",
            Structure => "Token::Structure",
            QuoteSingle => "Token::Quote::Single",
            QuoteDouble => "Token::Quote::Double",
            QuoteLiteral => "Token::Quote::Literal",
            QuoteInterpolate => "Token::Quote::Interpolate",
            QuoteLikeBacktick => "Token::QuoteLike::Backtick",
            QuoteLikeCommand => "Token::QuoteLike::Command",
            QuoteLikeRegexp => "Token::QuoteLike::Regexp",
            QuoteLikeWords => "Token::QuoteLike::Words",
            QuoteLikeReadline => "Token::QuoteLike::Readline",
            RegexpMatch => "Token::Regexp::Match",
            RegexpSubstitute => "Token::Regexp::Substitute",
            RegexpTransliterate => "Token::Regexp::Transliterate",
            HereDoc => "Token::HereDoc",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra payload some token kinds carry
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenDetail {
    #[default]
    None,
    Delimited(Delimited),
    HereDoc(Box<HereDoc>),
}

/// A leaf of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    /// 1-based line number of the first character.
    pub line: usize,
    /// 1-based column (in characters) of the first character.
    pub column: usize,
    /// Byte offset of the first character in the source.
    pub offset: usize,
    pub attr: Attribute,
    pub detail: TokenDetail,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        content: impl Into<String>,
        line: usize,
        column: usize,
        offset: usize,
    ) -> Self {
        Self {
            kind,
            content: content.into(),
            line,
            column,
            offset,
            attr: Attribute::None,
            detail: TokenDetail::None,
        }
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attr = attr;
        self
    }

    pub fn with_detail(mut self, detail: TokenDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn significant(&self) -> bool {
        self.kind.is_significant()
    }

    /// Structure token with exactly this content.
    pub fn is_structure(&self, content: &str) -> bool {
        self.kind == TokenKind::Structure && self.content == content
    }

    pub fn is_operator(&self, content: &str) -> bool {
        self.kind == TokenKind::Operator && self.content == content
    }

    pub fn is_word(&self, content: &str) -> bool {
        self.kind == TokenKind::Word && self.content == content
    }

    /// The opening bracket this token represents, if it opens a structure.
    pub fn opens(&self) -> Option<char> {
        match (self.kind, self.content.as_str()) {
            (TokenKind::Structure, "{") => Some('{'),
            (TokenKind::Structure, "(") => Some('('),
            (TokenKind::Structure, "[") => Some('['),
            _ => None,
        }
    }

    /// The closing bracket this token represents, if it closes a structure.
    pub fn closes(&self) -> Option<char> {
        match (self.kind, self.content.as_str()) {
            (TokenKind::Structure, "}") => Some('}'),
            (TokenKind::Structure, ")") => Some(')'),
            (TokenKind::Structure, "]") => Some(']'),
            _ => None,
        }
    }

    /// Byte offset one past the end of the token's source text.
    ///
    /// Heredocs end at their terminator line, which is physically elsewhere.
    pub fn end_offset(&self) -> usize {
        match &self.detail {
            TokenDetail::HereDoc(heredoc) => heredoc.end_offset().max(self.offset + self.content.len()),
            _ => self.offset + self.content.len(),
        }
    }

    pub fn delimited(&self) -> Option<&Delimited> {
        match &self.detail {
            TokenDetail::Delimited(delimited) => Some(delimited),
            _ => None,
        }
    }

    pub fn heredoc(&self) -> Option<&HereDoc> {
        match &self.detail {
            TokenDetail::HereDoc(heredoc) => Some(heredoc),
            _ => None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        self.delimited().map(|d| d.sections.as_slice()).unwrap_or(&[])
    }

    /// Inner text of the n-th delimited section.
    pub fn section(&self, index: usize) -> Option<&str> {
        let section = self.sections().get(index)?;
        self.content.get(section.start..section.start + section.len)
    }

    /// Trailing modifier letters of a regexp-like token.
    pub fn modifiers(&self) -> &str {
        self.delimited()
            .and_then(|d| self.content.get(d.modifiers.clone()))
            .unwrap_or("")
    }

    /// Contents of a simple or quote-like string without its delimiters.
    pub fn string(&self) -> Option<&str> {
        if self.kind.family() == Some(TokenFamily::Quote)
            || matches!(
                self.kind,
                TokenKind::QuoteLikeBacktick
                    | TokenKind::QuoteLikeCommand
                    | TokenKind::QuoteLikeWords
                    | TokenKind::QuoteLikeReadline
            )
        {
            self.section(0)
        } else {
            None
        }
    }

    /// Whole-line count of source newlines inside this token.
    pub fn newlines(&self) -> usize {
        self.content.matches('\n').count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance() {
        assert!(!TokenKind::Whitespace.is_significant());
        assert!(!TokenKind::Pod.is_significant());
        assert!(!TokenKind::End.is_significant());
        assert!(TokenKind::Data.is_significant());
        assert!(TokenKind::Word.is_significant());
    }

    #[test]
    fn test_braces() {
        let open = Token::new(TokenKind::Structure, "{", 1, 1, 0);
        let close = Token::new(TokenKind::Structure, ")", 1, 2, 1);
        let semi = Token::new(TokenKind::Structure, ";", 1, 3, 2);
        assert_eq!(open.opens(), Some('{'));
        assert_eq!(close.closes(), Some(')'));
        assert_eq!(semi.opens(), None);
        assert_eq!(semi.closes(), None);
    }

    #[test]
    fn test_families() {
        assert!(TokenKind::NumberHex.is_number());
        assert!(TokenKind::RegexpSubstitute.is_quoted());
        assert!(TokenKind::HereDoc.is_quoted());
        assert_eq!(TokenKind::Magic.family(), Some(TokenFamily::Symbol));
        assert_eq!(TokenKind::Operator.family(), None);
    }
}
