//! tsdp: The declaration file parser CLI.
//!
//! Usage:
//!   tsdp [options] [file...]
//!
//! Each file is parsed on its own; a failure in one file does not stop the
//! others. Prints `OK` per parsed file and the diagnostic per failed file.

use clap::{ArgAction, Parser as ClapParser};
use miette::{NamedSource, Report};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};
use tsdp_ast::ParseNode;
use tsdp_diagnostics::SyntaxError;
use tsdp_parser::{parse_source_with_options, ParserOptions};
use tsdp_scanner::{Lexer, LexicalToken};

#[derive(ClapParser, Debug)]
#[command(name = "tsdp", about = "tsdp - A TypeScript declaration file parser", version)]
struct Cli {
    /// Declaration files to parse.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to a tsdp.json project file.
    #[arg(short = 'p', long = "project")]
    project: Option<PathBuf>,

    /// Dump each parse tree as JSON.
    #[arg(long)]
    json: bool,

    /// Print each parse tree back as declaration source.
    #[arg(long)]
    code: bool,

    /// List each file's tokens instead of parsing it.
    #[arg(long)]
    tokens: bool,

    /// Render diagnostics with source context.
    #[arg(long)]
    pretty: bool,

    /// Do not accept `$` in identifiers.
    #[arg(long = "no-dollar")]
    no_dollar: bool,

    /// Maximum nesting depth of types and namespaces.
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<u32>,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// What happened to one input file.
enum Outcome {
    Parsed(ParseNode),
    Tokens(Vec<LexicalToken>),
    Failed { source: String, error: SyntaxError },
    Unreadable(String),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    process::exit(run(&cli));
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> i32 {
    let (files, options) = match resolve_inputs(cli) {
        Ok(inputs) => inputs,
        Err(message) => {
            print_error(&message);
            return 1;
        }
    };

    if files.is_empty() {
        print_error("No input files.");
        return 1;
    }

    let start = Instant::now();
    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map(|path| process_file(path, options, cli.tokens))
        .collect();
    info!(files = files.len(), elapsed = ?start.elapsed(), "parsed");

    let use_color = stderr_is_terminal();
    let mut failed = 0;
    for (path, outcome) in files.iter().zip(outcomes) {
        let name = path.display().to_string();
        let prefix = if files.len() > 1 {
            format!("{}: ", name)
        } else {
            String::new()
        };
        match outcome {
            Outcome::Parsed(tree) => {
                if cli.json {
                    match tsdp_printer::to_json(&tree, true) {
                        Ok(json) => println!("{}", json),
                        Err(e) => print_error(&format!("{}cannot serialize tree: {}", prefix, e)),
                    }
                }
                if cli.code {
                    println!("{}", tsdp_printer::print_code(&tree));
                }
                println!("{}OK", prefix);
            }
            Outcome::Tokens(tokens) => {
                for token in &tokens {
                    println!("{}{}\t{:?}\t{}", prefix, token.position, token.kind, token.display_text());
                }
            }
            Outcome::Failed { source, error } => {
                failed += 1;
                print_diagnostic(&name, source, error, cli.pretty, use_color);
            }
            Outcome::Unreadable(message) => {
                failed += 1;
                print_error(&message);
            }
        }
    }

    if failed > 0 {
        if files.len() > 1 {
            eprintln!(
                "\nFound errors in {} of {} files.",
                failed,
                files.len()
            );
        }
        return 1;
    }
    0
}

/// Collect the input files and the options to parse them with. Files named on
/// the command line come after the project's; flags override the project's
/// settings.
fn resolve_inputs(cli: &Cli) -> Result<(Vec<PathBuf>, ParserOptions), String> {
    let mut files = Vec::new();
    let mut options = ParserOptions::default();

    if let Some(project) = &cli.project {
        let config = tsdp_options::parse_config_file(project).map_err(|e| e.to_string())?;
        let base = project.parent().unwrap_or_else(|| Path::new("."));
        files.extend(config.resolve_files(base));
        options = config
            .parse_options
            .to_parser_options()
            .map_err(|e| format!("{}: {}", project.display(), e))?;
        debug!(project = %project.display(), files = files.len(), "loaded project");
    }
    files.extend(cli.files.iter().cloned());

    if cli.no_dollar {
        options.lexer.allow_dollar_in_identifiers = false;
    }
    match cli.max_depth {
        Some(0) => return Err("--max-depth must be at least 1".to_string()),
        Some(depth) => options.max_depth = depth,
        None => {}
    }
    Ok((files, options))
}

fn process_file(path: &Path, options: ParserOptions, tokens_only: bool) -> Outcome {
    let name = path.display().to_string();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return Outcome::Unreadable(format!("cannot read '{}': {}", name, e)),
    };
    debug!(file = %name, bytes = source.len(), "read");

    let result = if tokens_only {
        Lexer::with_options(&name, &source, options.lexer)
            .tokenize()
            .map(Outcome::Tokens)
    } else {
        parse_source_with_options(&name, &source, options).map(Outcome::Parsed)
    };
    result.unwrap_or_else(|error| Outcome::Failed { source, error })
}

fn print_diagnostic(name: &str, source: String, error: SyntaxError, pretty: bool, use_color: bool) {
    if pretty {
        let report = Report::new(error).with_source_code(NamedSource::new(name, source));
        eprintln!("{:?}", report);
    } else if use_color {
        eprintln!(
            "{}{}:{}{} {}{}Error{}: {}",
            CYAN, error.file, error.position, RESET, BOLD, RED, RESET, error.message
        );
    } else {
        eprintln!("{}", error);
    }
}

fn print_error(msg: &str) {
    if stderr_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
