//! Command-line interface for perl-cst
//!
//! Usage:
//!   perl-cst dump `<path>` [--format tree|json|yaml] [--whitespace] [--locations]
//!   perl-cst tokens `<path>`     - Print the token stream, one token per line
//!   perl-cst check `<path>`      - Parse and verify the tree gives the source back

use clap::{Arg, ArgAction, ArgMatches, Command};
use perl_cst::cst::ast::{format_source_context, Document};
use perl_cst::cst::config::{Loader, ParserConfig};
use perl_cst::cst::formats::{Dumper, FormatRegistry};
use perl_cst::cst::lexing::tokenize;
use perl_cst::cst::parsing::Parser;
use perl_cst::cst::report::StreamReporter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("perl-cst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and inspect lossless syntax trees of Perl source")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging verbosity (-v: debug, -vv: trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults")
                .global(true),
        )
        .subcommand(
            Command::new("dump")
                .about("Print the syntax tree")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: tree, json or yaml")
                        .default_value("tree"),
                )
                .arg(
                    Arg::new("whitespace")
                        .long("whitespace")
                        .help("Include whitespace tokens in the tree format")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("locations")
                        .long("locations")
                        .help("Prefix tree lines with line and column")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and verify the round trip")
                .arg(path_arg()),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));
    let config = load_config(&matches);

    match matches.subcommand() {
        Some(("dump", dump_matches)) => handle_dump_command(dump_matches, config),
        Some(("tokens", tokens_matches)) => handle_tokens_command(tokens_matches),
        Some(("check", check_matches)) => handle_check_command(check_matches, config),
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the Perl source file")
        .required(true)
        .index(1)
}

fn init_tracing(verbosity: u8) {
    let directive = match verbosity {
        0 => "perl_cst=warn",
        1 => "perl_cst=debug",
        _ => "perl_cst=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> ParserConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.with_env().build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn read_source(matches: &ArgMatches) -> String {
    let path = matches.get_one::<String>("path").unwrap();
    debug!(path, "reading source");
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

fn parse_or_exit(source: &str, config: ParserConfig) -> Document {
    let mut parser = Parser::new(config).with_reporter(StreamReporter::stderr());
    parser.parse(source).unwrap_or_else(|e| {
        eprintln!("Parse error: {}", e);
        eprint!("{}", format_source_context(source, e.line()));
        std::process::exit(1);
    })
}

/// Handle the dump command
fn handle_dump_command(matches: &ArgMatches, config: ParserConfig) {
    let source = read_source(matches);
    let doc = parse_or_exit(&source, config);
    let dumper = Dumper::new()
        .whitespace(matches.get_flag("whitespace"))
        .locations(matches.get_flag("locations"));
    let format = matches.get_one::<String>("format").unwrap();

    let output = FormatRegistry::with_dumper(dumper)
        .serialize(&doc, format)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) {
    let source = read_source(matches);
    let tokens = tokenize(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    for token in tokens {
        println!(
            "{}:{}\t{}\t{:?}",
            token.line,
            token.column,
            token.kind.name(),
            token.content
        );
    }
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches, config: ParserConfig) {
    let source = read_source(matches);
    let doc = parse_or_exit(&source, config);
    let serialized = doc.serialize();
    if serialized != source {
        let line = source
            .lines()
            .zip(serialized.lines())
            .position(|(a, b)| a != b)
            .map(|i| i + 1)
            .unwrap_or_else(|| source.lines().count().min(serialized.lines().count()) + 1);
        eprintln!("Round trip failed: output differs from input at line {}", line);
        eprint!("{}", format_source_context(&source, line));
        std::process::exit(1);
    }
    println!("ok: {} elements", doc.len());
}
