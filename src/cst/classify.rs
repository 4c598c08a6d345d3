//! Keyword and operator classification tables
//!
//!     Pure string-keyed lookups queried by the tokenizer and parser. Nothing in here
//!     holds state; every table is built once on first use.

use crate::cst::ast::class::{StatementKind, StructureKind};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static STATEMENT_KEYWORDS: Lazy<HashMap<&'static str, StatementKind>> = Lazy::new(|| {
    use StatementKind::*;
    HashMap::from([
        // Things that affect the timing of execution
        ("BEGIN", Scheduled),
        ("CHECK", Scheduled),
        ("UNITCHECK", Scheduled),
        ("INIT", Scheduled),
        ("END", Scheduled),
        // Special subroutines for which `sub` is optional
        ("AUTOLOAD", Sub),
        ("DESTROY", Sub),
        ("package", Package),
        ("no", Include),
        ("require", Include),
        ("my", Variable),
        ("local", Variable),
        ("our", Variable),
        ("state", Variable),
        ("if", Compound),
        ("unless", Compound),
        ("for", Compound),
        ("foreach", Compound),
        ("while", Compound),
        ("until", Compound),
        ("given", Given),
        ("when", When),
        ("default", When),
        ("redo", Break),
        ("next", Break),
        ("last", Break),
        ("return", Break),
        ("goto", Break),
        ("__END__", End),
        ("__DATA__", Data),
    ])
});

static QUOTE_LIKE_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["q", "qq", "qw", "qx", "qr", "m", "s", "tr", "y"]));

static WORD_OPERATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "lt", "gt", "le", "ge", "eq", "ne", "cmp", "x", "and", "or", "not", "xor", "isa",
    ])
});

// Words after which the next token starts a term rather than continuing one.
static OPERAND_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "and", "or", "not", "xor", "lt", "gt", "le", "ge", "eq", "ne", "cmp", "x", "if",
        "elsif", "unless", "while", "until", "when", "return", "split", "grep", "map", "join",
        "push", "unshift", "print", "printf", "say", "die", "warn", "croak", "confess", "sort",
        "reverse", "defined", "ref", "scalar", "wantarray", "eval", "do", "sprintf", "open",
        "close", "unlink", "chomp", "chop", "lc", "uc", "lcfirst", "ucfirst", "length",
        "exists", "delete", "keys", "values", "each", "local", "my", "our", "state", "foreach",
        "for", "else", "qw", "x=", "bless", "exit",
    ])
});

static CURLY_CLASSES: Lazy<HashMap<&'static str, StructureKind>> = Lazy::new(|| {
    use StructureKind::*;
    HashMap::from([
        // Blocks
        ("sub", Block),
        ("grep", Block),
        ("map", Block),
        ("sort", Block),
        ("do", Block),
        // Hashes
        ("=", Constructor),
        ("||=", Constructor),
        ("&&=", Constructor),
        ("//=", Constructor),
        ("||", Constructor),
        ("&&", Constructor),
        ("//", Constructor),
        ("?", Constructor),
        (":", Constructor),
        (",", Constructor),
        ("=>", Constructor),
        ("+", Constructor),
        ("return", Constructor),
        ("bless", Constructor),
    ])
});

static ROUND_CLASSES: Lazy<HashMap<&'static str, StructureKind>> = Lazy::new(|| {
    use StructureKind::*;
    HashMap::from([
        ("if", Condition),
        ("elsif", Condition),
        ("unless", Condition),
        ("while", Condition),
        ("until", Condition),
        ("for", For),
        ("foreach", For),
    ])
});

static BLOCK_LIST_FUNCTIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["map", "grep", "sort", "eval", "do"]));

static FILE_TEST_LETTERS: &str = "rwxoRWXOezsfdlpSbcugktTBAMC";

static MAGIC_PUNCTUATION: &str = "&`'+!@/\\,;.0<>()[]^:?-=~|\"$_";

/// Statement kind introduced by a leading keyword.
pub fn statement_keyword(word: &str) -> Option<StatementKind> {
    STATEMENT_KEYWORDS.get(word).copied()
}

pub fn is_quote_like(word: &str) -> bool {
    QUOTE_LIKE_WORDS.contains(word)
}

/// Alphabetic operators such as `eq` and `and`.
pub fn is_word_operator(word: &str) -> bool {
    WORD_OPERATORS.contains(word)
}

/// Words that leave the tokenizer expecting a term next.
pub fn is_operand_word(word: &str) -> bool {
    OPERAND_WORDS.contains(word)
}

/// Structure kind forced on a `{` by the preceding token's content.
pub fn curly_class(content: &str) -> Option<StructureKind> {
    CURLY_CLASSES.get(content).copied()
}

/// Structure kind forced on a `(` by the preceding keyword.
pub fn round_class(word: &str) -> Option<StructureKind> {
    ROUND_CLASSES.get(word).copied()
}

/// Core functions whose first argument in a list may be a block.
pub fn takes_block_argument(word: &str) -> bool {
    BLOCK_LIST_FUNCTIONS.contains(word)
}

pub fn is_file_test(letter: char) -> bool {
    FILE_TEST_LETTERS.contains(letter)
}

/// Punctuation that forms a magic variable after `$` (`$_`, `$@`, `$/`, ...).
pub fn is_magic_punctuation(c: char) -> bool {
    MAGIC_PUNCTUATION.contains(c)
}

pub fn is_loop_keyword(word: &str) -> bool {
    matches!(word, "while" | "until" | "for" | "foreach")
}

pub fn is_variable_declarator(word: &str) -> bool {
    matches!(word, "my" | "our" | "state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_keywords() {
        assert_eq!(statement_keyword("while"), Some(StatementKind::Compound));
        assert_eq!(statement_keyword("BEGIN"), Some(StatementKind::Scheduled));
        assert_eq!(statement_keyword("require"), Some(StatementKind::Include));
        assert_eq!(statement_keyword("print"), None);
        // `use` and `sub` need lookahead and are resolved by the parser
        assert_eq!(statement_keyword("use"), None);
        assert_eq!(statement_keyword("sub"), None);
    }

    #[test]
    fn test_brace_tables() {
        assert_eq!(curly_class("map"), Some(StructureKind::Block));
        assert_eq!(curly_class("=>"), Some(StructureKind::Constructor));
        assert_eq!(round_class("elsif"), Some(StructureKind::Condition));
        assert_eq!(round_class("foreach"), Some(StructureKind::For));
        assert_eq!(round_class("print"), None);
    }

    #[test]
    fn test_word_classes() {
        assert!(is_quote_like("tr"));
        assert!(!is_quote_like("t"));
        assert!(is_word_operator("cmp"));
        assert!(is_operand_word("split"));
        assert!(is_file_test('e'));
        assert!(!is_file_test('q'));
        assert!(is_magic_punctuation('@'));
    }
}
