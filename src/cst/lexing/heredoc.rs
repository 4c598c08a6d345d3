//! Heredocs and the other things a `<` can start in term position
//!
//!     A heredoc marker (`<<EOF`, `<<~"EOF"`, `<<'EOF'`) pulls its body out of the
//!     lines that follow the current one, up to and including the terminator line.
//!     The body never becomes tokens of its own: it is stored on the marker token and
//!     the cursor skips those lines when it moves on.
//!
//!     Outside heredocs, `<` in term position can be a readline (`<STDIN>`, `<$fh>`,
//!     `<>`, `<<>>`) or a glob (`<*.txt>`).

use super::cursor::Mark;
use super::tokenizer::Tokenizer;
use crate::cst::token::{
    Attribute, Delimited, HereDoc, HereDocMode, Section, Token, TokenDetail, TokenKind,
};
use once_cell::sync::Lazy;
use regex::Regex;

static HEREDOC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<<(~)?(?:([A-Za-z_]\w*)|[ \t]*"([^"\n]*)"|[ \t]*'([^'\n]*)'|[ \t]*`([^`\n]*)`)"#)
        .unwrap()
});

static READLINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<<>>|<>|<\$?\w+>|<[^\s<>=][^<>\n]*>)").unwrap());

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl Tokenizer<'_> {
    /// Heredoc marker or readline at a `<` in term position.
    pub(super) fn scan_angle(&mut self, start: Mark) -> Option<Token> {
        self.scan_heredoc(start).or_else(|| self.scan_readline(start))
    }

    fn scan_heredoc(&mut self, start: Mark) -> Option<Token> {
        let rest = self.cursor.rest();
        let captures = HEREDOC_REGEX.captures(rest)?;
        let marker_len = captures.get(0)?.end();
        let indented = captures.get(1).is_some();
        let (terminator, mode) = if let Some(m) = captures.get(2) {
            (m.as_str(), HereDocMode::Interpolate)
        } else if let Some(m) = captures.get(3) {
            (m.as_str(), HereDocMode::Interpolate)
        } else if let Some(m) = captures.get(4) {
            (m.as_str(), HereDocMode::Literal)
        } else {
            (captures.get(5)?.as_str(), HereDocMode::Command)
        };

        let body_offset = self.cursor.following_offset();
        let mut lines = Vec::new();
        let mut terminator_line = None;
        let mut terminator_offset = None;
        while let Some(line) = self.cursor.take_following_line() {
            let bare = strip_line_ending(line.text);
            let candidate = if indented { bare.trim_start() } else { bare };
            if candidate == terminator {
                terminator_line = Some(line.text.to_string());
                terminator_offset = Some(line.start);
                break;
            }
            lines.push(line.text.to_string());
        }

        let heredoc = HereDoc {
            terminator: terminator.to_string(),
            mode,
            indented,
            lines,
            terminator_line,
            body_offset,
            terminator_offset,
        };
        let attr = if heredoc.is_complete() {
            Attribute::None
        } else {
            Attribute::Damaged
        };
        let text = self.cursor.bump(marker_len);
        Some(
            self.token(TokenKind::HereDoc, text, start)
                .with_detail(TokenDetail::HereDoc(Box::new(heredoc)))
                .with_attr(attr),
        )
    }

    fn scan_readline(&mut self, start: Mark) -> Option<Token> {
        let len = READLINE_REGEX.find(self.cursor.rest())?.end();
        let text = self.cursor.bump(len);
        let inner = if text.starts_with("<<") { 2 } else { 1 };
        let section = Section {
            start: inner,
            len: len - 2 * inner,
            open: '<',
            close: '>',
            complete: true,
        };
        Some(
            self.token(TokenKind::QuoteLikeReadline, text, start)
                .with_detail(TokenDetail::Delimited(Delimited {
                    operator_len: 0,
                    sections: vec![section],
                    modifiers: len..len,
                })),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::lexing::Tokenizer;
    use crate::cst::token::{Attribute, HereDocMode, Token, TokenKind};

    fn tokens(source: &str) -> Vec<Token> {
        Tokenizer::new(source).all_tokens().unwrap()
    }

    #[test]
    fn test_empty_body() {
        let tokens = tokens("<<EOF\nEOF");
        let heredoc = tokens[0].heredoc().unwrap();
        assert_eq!(tokens[0].content, "<<EOF");
        assert_eq!(heredoc.terminator, "EOF");
        assert!(heredoc.lines.is_empty());
        assert_eq!(heredoc.mode, HereDocMode::Interpolate);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].content, "\n");
    }

    #[test]
    fn test_body_is_skipped_by_the_tokenizer() {
        let source = "print <<'END', 1;\nline one\nline two\nEND\nfoo();\n";
        let tokens = tokens(source);
        let marker = tokens.iter().find(|t| t.kind == TokenKind::HereDoc).unwrap();
        let heredoc = marker.heredoc().unwrap();
        assert_eq!(heredoc.mode, HereDocMode::Literal);
        assert_eq!(heredoc.lines, vec!["line one\n", "line two\n"]);
        assert_eq!(heredoc.terminator_line.as_deref(), Some("END\n"));
        assert_eq!(heredoc.body_offset, 18);
        assert_eq!(heredoc.terminator_offset, Some(36));

        let foo = tokens.iter().find(|t| t.is_word("foo")).unwrap();
        assert_eq!((foo.line, foo.offset), (5, 40));
    }

    #[test]
    fn test_indented_terminator() {
        let tokens = tokens("f(<<~EOT);\n    x\n    EOT\n");
        let heredoc = tokens[2].heredoc().unwrap();
        assert!(heredoc.indented);
        assert_eq!(heredoc.lines, vec!["    x\n"]);
        assert!(heredoc.terminator_line.is_some());
    }

    #[test]
    fn test_unterminated_heredoc_is_damaged() {
        let tokens = tokens("$x = <<\"EOF\";\nbody\n");
        let marker = tokens.iter().find(|t| t.kind == TokenKind::HereDoc).unwrap();
        assert_eq!(marker.attr, Attribute::Damaged);
        assert_eq!(marker.heredoc().unwrap().lines, vec!["body\n"]);
    }

    #[test]
    fn test_shift_is_not_a_heredoc() {
        let significant: Vec<_> = tokens("$x << 2")
            .into_iter()
            .filter(|t| t.significant())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            significant,
            vec![TokenKind::Symbol, TokenKind::Operator, TokenKind::Number]
        );
    }

    #[test]
    fn test_readline() {
        let tokens = tokens("while (<$fh>) {}");
        let readline = tokens
            .iter()
            .find(|t| t.kind == TokenKind::QuoteLikeReadline)
            .unwrap();
        assert_eq!(readline.content, "<$fh>");
        assert_eq!(readline.string(), Some("$fh"));
    }
}
