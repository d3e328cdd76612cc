//! Command-line interface for the Quill script front-end.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{fs, path::PathBuf, process};

use clap::{Parser, Subcommand};

use crate::diagnostics::StderrSink;
use crate::errors::print_report;
use crate::parser::parse_script;
use crate::registry::CommandRegistry;

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "quill",
    version,
    about = "Tokenizer and structural parser for interactive-fiction behavior scripts."
)]
pub struct QuillArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Parse a script and print its command nodes as JSON.
    Parse {
        /// The path to the script file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Check a script for structural errors without printing the parse.
    Check {
        /// The path to the script file to check.
        #[arg(required = true)]
        file: PathBuf,
    },
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = QuillArgs::parse();
    let registry = CommandRegistry::with_default_commands();

    match args.command {
        ArgsCommand::Parse { file } => {
            let source = read_source(&file);
            let mut sink = StderrSink::new();
            match parse_script(&source, &registry, &mut sink) {
                Ok(nodes) => match serde_json::to_string_pretty(&nodes) {
                    Ok(json) => println!("{json}"),
                    Err(error) => {
                        eprintln!("quill: cannot serialize parse: {error}");
                        process::exit(2);
                    }
                },
                Err(error) => {
                    print_report(error);
                    process::exit(1);
                }
            }
        }
        ArgsCommand::Check { file } => {
            let source = read_source(&file);
            let mut sink = StderrSink::new();
            match parse_script(&source, &registry, &mut sink) {
                Ok(nodes) => {
                    println!("ok: {} command(s)", nodes.len());
                }
                Err(error) => {
                    print_report(error);
                    process::exit(1);
                }
            }
        }
    }
}

fn read_source(file: &PathBuf) -> String {
    match fs::read_to_string(file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("quill: cannot read {}: {error}", file.display());
            process::exit(2);
        }
    }
}
