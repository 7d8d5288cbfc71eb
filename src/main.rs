//! CLI tool to tokenize and check C source files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use ccheck_rs::{Analyzer, Options, Token, Verdict, tokenize};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Lexer and semantic checker for a small subset of C
#[derive(Parser, Debug)]
#[command(name = "ccheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of each file
    Tokens {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check each file and print one verdict per analyzed line
    Check {
        /// Report `void` functions that never `return`
        #[arg(long)]
        require_void_return: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// One line per token or verdict
    #[default]
    Text,
    /// A JSON array with one entry per file
    Json,
}

#[derive(Serialize)]
struct FileReport<T> {
    path: String,
    results: Vec<T>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (files, options) = match cli.command {
        Command::Tokens { files } => (files, None),
        Command::Check {
            require_void_return,
            files,
        } => (
            files,
            Some(Options {
                require_return_in_void: require_void_return,
            }),
        ),
    };

    let mut had_error = false;
    let mut token_reports = Vec::new();
    let mut verdict_reports = Vec::new();

    for path in &files {
        let shown = path.display().to_string();
        let content = match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("{shown}: {}", ccheck_rs::Error::from(e.utf8_error()));
                    had_error = true;
                    continue;
                }
            },
            Err(e) => {
                eprintln!("{shown}: {e}");
                had_error = true;
                continue;
            }
        };
        debug!(path = %shown, bytes = content.len(), "read file");

        match options {
            None => {
                let tokens = tokenize(&content);
                if cli.format == OutputFormat::Text {
                    print_tokens(&shown, &tokens);
                }
                token_reports.push(FileReport {
                    path: shown,
                    results: tokens,
                });
            }
            Some(options) => {
                let mut verdicts = Vec::new();
                Analyzer::with_options(options).run(&content, &mut verdicts);
                let errors = verdicts.iter().filter(|v| v.is_error()).count();
                if errors > 0 {
                    warn!(path = %shown, errors, "file has errors");
                    had_error = true;
                }
                if cli.format == OutputFormat::Text {
                    print_verdicts(&shown, &verdicts);
                }
                verdict_reports.push(FileReport {
                    path: shown,
                    results: verdicts,
                });
            }
        }
    }

    if cli.format == OutputFormat::Json {
        let json = if options.is_none() {
            serde_json::to_string_pretty(&token_reports)
        } else {
            serde_json::to_string_pretty(&verdict_reports)
        };
        match json {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_tokens(path: &str, tokens: &[Token]) {
    for token in tokens {
        let span = token.span;
        println!(
            "{path}:{}:{}-{}: {} {}",
            span.line, span.start_column, span.end_column, token.kind, token.text
        );
    }
}

fn print_verdicts(path: &str, verdicts: &[Verdict]) {
    for verdict in verdicts {
        println!("{path}:{}: {}", verdict.line_number, verdict.message());
    }
}
