//! End-to-end parses of small programs, checked through the public tree API.

use perl_cst::cst::ast::{CompoundType, Document, ElementClass, ElementId, StatementKind, StructureKind};
use perl_cst::cst::config::ParserConfig;
use perl_cst::cst::parse;
use perl_cst::cst::parsing::{ParseError, Parser};
use perl_cst::cst::report::RecordingReporter;
use perl_cst::cst::token::{literal, Attribute, HereDocMode, TokenKind};

fn first_statement(doc: &Document) -> ElementId {
    doc.schild(doc.root(), 0).expect("document has a statement")
}

fn first_of_kind(doc: &Document, kind: TokenKind) -> ElementId {
    doc.find_first(doc.root(), |doc, id| doc.token_kind(id) == Some(kind))
        .unwrap_or_else(|| panic!("no {} token", kind.name()))
}

#[test]
fn test_while_loop() {
    let doc = parse("while (1) { }").unwrap();
    let stmt = first_statement(&doc);
    assert_eq!(doc.statement_kind(stmt), Some(StatementKind::Compound));
    assert_eq!(doc.compound_type(stmt), Some(CompoundType::While));

    let schildren = doc.schildren(stmt);
    assert_eq!(schildren.len(), 3);
    assert_eq!(doc.text(schildren[0]), "while");
    assert_eq!(doc.structure_kind(schildren[1]), Some(StructureKind::Condition));
    assert_eq!(doc.structure_kind(schildren[2]), Some(StructureKind::Block));
}

#[test]
fn test_binary_number() {
    let doc = parse("0b1110011").unwrap();
    let number = first_of_kind(&doc, TokenKind::NumberBinary);
    assert_eq!(literal(doc.token(number).unwrap()), Some(115.0));
}

#[test]
fn test_empty_heredoc() {
    let doc = parse("<<EOF\nEOF").unwrap();
    let marker = first_of_kind(&doc, TokenKind::HereDoc);
    let heredoc = doc.heredoc(marker).unwrap();
    assert_eq!(heredoc.terminator, "EOF");
    assert!(heredoc.lines.is_empty());
    assert_eq!(heredoc.mode, HereDocMode::Interpolate);
    assert_eq!(doc.serialize(), "<<EOF\nEOF");
}

#[test]
fn test_substitution_sections() {
    let doc = parse("s{a}{if($1){foo()}};").unwrap();
    let subst = first_of_kind(&doc, TokenKind::RegexpSubstitute);
    let token = doc.token(subst).unwrap();
    assert_eq!(token.section(0), Some("a"));
    assert_eq!(token.section(1), Some("if($1){foo()}"));
    assert!(token.sections().iter().all(|section| section.complete));
    assert_eq!(token.attr, Attribute::None);
}

#[test]
fn test_forward_sub() {
    let doc = parse("sub foo;").unwrap();
    let stmt = first_statement(&doc);
    assert_eq!(doc.statement_kind(stmt), Some(StatementKind::Sub));
    assert!(doc.is_forward(stmt));
    assert_eq!(doc.sub_name(stmt), Some("foo"));
}

#[test]
fn test_hash_element_resolves_to_hash() {
    let doc = parse("$foo{1};").unwrap();
    let symbol = first_of_kind(&doc, TokenKind::Symbol);
    assert_eq!(doc.raw_sigil(symbol), Some('$'));
    assert_eq!(doc.resolved_symbol(symbol).as_deref(), Some("%foo"));
    let subscript = doc.next_significant_sibling(symbol).unwrap();
    assert_eq!(doc.structure_kind(subscript), Some(StructureKind::Subscript));
}

#[test]
fn test_anonymous_hash_vs_block() {
    let doc = parse("my $h = { a => 1 };\n{ print 1; }\n").unwrap();
    let constructors = doc.find_class(
        doc.root(),
        ElementClass::Structure(StructureKind::Constructor),
        true,
    );
    assert_eq!(constructors.len(), 1);
    let blocks = doc.find_class(doc.root(), ElementClass::Structure(StructureKind::Block), true);
    assert_eq!(blocks.len(), 1);
    // Three tokens in, nothing settled it: a block by default
    assert_eq!(doc.attribute(blocks[0]), Attribute::None);
}

#[test]
fn test_block_settled_by_lookahead_is_hinted() {
    let doc = parse("{ foo; }
").unwrap();
    let stmt = first_statement(&doc);
    assert_eq!(doc.statement_kind(stmt), Some(StatementKind::Compound));
    let block = doc.schild(stmt, 0).unwrap();
    assert_eq!(doc.structure_kind(block), Some(StructureKind::Block));
    assert_eq!(doc.attribute(block), Attribute::Hint);
}

#[test]
fn test_for_list_is_reclassified() {
    let doc = parse("for (@list) { print }").unwrap();
    let stmt = first_statement(&doc);
    let header = doc.schild(stmt, 1).unwrap();
    assert_eq!(doc.structure_kind(header), Some(StructureKind::List));
    assert_eq!(doc.compound_type(stmt), Some(CompoundType::Foreach));
}

#[test]
fn test_include_statement() {
    let doc = parse("use List::Util 1.45 qw(max);\nuse v6;\n").unwrap();
    let statements = doc.schildren(doc.root()).to_vec();
    assert_eq!(doc.statement_kind(statements[0]), Some(StatementKind::Include));
    assert_eq!(doc.module(statements[0]), Some("List::Util"));
    assert!(doc.module_version(statements[0]).is_some());
    assert_eq!(doc.statement_kind(statements[1]), Some(StatementKind::IncludePerl6));
    assert!(doc.isa(statements[1], ElementClass::Statement(StatementKind::Include)));
}

#[test]
fn test_end_section_owns_the_rest() {
    let source = "print 1;\n__END__\nnot { code\n";
    let doc = parse(source).unwrap();
    let statements = doc.schildren(doc.root()).to_vec();
    assert_eq!(statements.len(), 2);
    assert_eq!(doc.statement_kind(statements[1]), Some(StatementKind::End));
    assert_eq!(doc.serialize(), source);
}

#[test]
fn test_nesting_limit() {
    let config = ParserConfig {
        max_depth: 2,
        ..ParserConfig::default()
    };
    let mut parser = Parser::new(config.clone());
    assert!(parser.parse("((1));").is_ok());
    let err = Parser::new(config).parse("(((1)));").unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { limit: 2, .. }));
}

#[test]
fn test_content_omits_heredoc_bodies() {
    let source = "print <<EOF;\nbody\nEOF\n";
    let doc = parse(source).unwrap();
    assert_eq!(doc.content(doc.root()), "print <<EOF;\n");
    assert_eq!(doc.serialize(), source);
}

#[test]
fn test_default_nesting_limit_fits_small_stack() {
    let depth = ParserConfig::default().max_depth;
    let outcome = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let deepest = parse(&"(".repeat(depth)).map(|doc| doc.len());
            let too_deep = parse(&"(".repeat(depth + 1));
            (deepest, too_deep)
        })
        .unwrap()
        .join()
        .unwrap();
    assert!(outcome.0.is_ok());
    assert!(matches!(
        outcome.1,
        Err(ParseError::NestingTooDeep { limit, .. }) if limit == depth
    ));
}

#[test]
fn test_unmatched_brace_is_reported_once() {
    let mut reporter = RecordingReporter::default();
    let doc = Parser::default()
        .with_reporter(&mut reporter)
        .parse("foo(1; }\n")
        .unwrap();
    assert_eq!(doc.serialize(), "foo(1; }\n");
    let unmatched = doc.find_class(
        doc.root(),
        ElementClass::Statement(StatementKind::UnmatchedBrace),
        true,
    );
    assert_eq!(unmatched.len(), 1);
    assert_eq!(reporter.events, vec!["unmatched } at 1:8"]);
}

#[test]
fn test_tokenizer_failure_is_fatal_and_reported() {
    let mut reporter = RecordingReporter::default();
    let result = Parser::default()
        .with_reporter(&mut reporter)
        .parse("my $x = 1;\x01");
    assert!(matches!(result, Err(ParseError::Tokenize(_))));
    assert_eq!(reporter.events.len(), 1);
    assert!(reporter.events[0].starts_with("tokenizer: "));
}
