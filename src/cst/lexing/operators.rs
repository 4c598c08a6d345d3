//! Punctuation operators
//!
//!     The operator table is a logos lexer run at the current position; its longest
//!     match decides how many characters form the operator. Whether a character is an
//!     operator at all (rather than a regexp delimiter, a sigil or a readline) is
//!     decided by the tokenizer before it gets here.
use logos::Logos;

/// Every punctuation operator of the language
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Op {
    // Arrows and fat comma
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatComma,
    #[token(",")]
    Comma,

    // Increment and exponent
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("**")]
    Power,

    // Unary and binding
    #[token("!")]
    Not,
    #[token("~")]
    Complement,
    #[token("~.")]
    StringComplement,
    #[token("=~")]
    Bind,
    #[token("!~")]
    NotBind,

    // Arithmetic and string
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Times,
    #[token("/")]
    Divide,
    #[token("%")]
    Modulo,
    #[token(".")]
    Concat,

    // Shifts and comparison
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<=>")]
    Compare,
    #[token("~~")]
    SmartMatch,

    // Bitwise
    #[token("&")]
    BitAnd,
    #[token("|")]
    BitOr,
    #[token("^")]
    BitXor,
    #[token("&.")]
    StringAnd,
    #[token("|.")]
    StringOr,
    #[token("^.")]
    StringXor,

    // Logical
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("//")]
    DefinedOr,

    // Ranges and ternary
    #[token("..")]
    Range,
    #[token("...")]
    Yada,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Assignment
    #[token("=")]
    Assign,
    #[token("**=")]
    PowerAssign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    TimesAssign,
    #[token("/=")]
    DivideAssign,
    #[token(".=")]
    ConcatAssign,
    #[token("%=")]
    ModuloAssign,
    #[token("x=")]
    RepeatAssign,
    #[token("&=")]
    BitAndAssign,
    #[token("|=")]
    BitOrAssign,
    #[token("^=")]
    BitXorAssign,
    #[token("&.=")]
    StringAndAssign,
    #[token("|.=")]
    StringOrAssign,
    #[token("^.=")]
    StringXorAssign,
    #[token("<<=")]
    ShiftLeftAssign,
    #[token(">>=")]
    ShiftRightAssign,
    #[token("&&=")]
    AndAssign,
    #[token("||=")]
    OrAssign,
    #[token("//=")]
    DefinedOrAssign,
}

/// Byte length of the operator at the start of `rest`, if one starts there.
pub fn operator_len(rest: &str) -> Option<usize> {
    let mut lexer = Op::lexer(rest);
    match lexer.next() {
        Some(Ok(_)) if lexer.span().start == 0 => Some(lexer.span().end),
        _ => None,
    }
}
