//! The `json-validator` command-line tool.
//!
//! Reads each named file (or standard input for `-` or no arguments)
//! fully into memory, validates it and prints one verdict line per
//! document.
//!
//! Exit codes: 0 when every document is valid, 1 when any document is
//! invalid, 2 when an input could not be read.

use clap::Parser;
use json_validator::{tokenize_with_options, validate_with_options, ValidatorOptions};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_INVALID: u8 = 1;
const EXIT_IO_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "json-validator")]
#[command(about = "Check whether documents are valid JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Files to validate. Reads standard input when empty or `-`.
    files: Vec<PathBuf>,

    /// Print nothing; report through the exit code only.
    #[arg(short, long)]
    quiet: bool,

    /// Print the token sequence instead of validating.
    #[arg(short, long)]
    tokens: bool,

    /// Accept `\t`, `\n` and `\r` written as two characters outside strings.
    #[arg(long)]
    escaped_whitespace: bool,

    /// Reject documents nested deeper than this.
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Reject documents larger than this many bytes (0 disables the limit).
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,
}

impl Cli {
    fn options(&self) -> ValidatorOptions {
        let mut options = ValidatorOptions::default()
            .with_max_depth(self.max_depth)
            .with_escaped_whitespace(self.escaped_whitespace);
        if let Some(size) = self.max_size {
            options = options.with_max_size(if size == 0 { None } else { Some(size) });
        }
        options
    }
}

/// Reads raw bytes; decoding is part of validation, not I/O.
fn read_input(path: &PathBuf) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read(path)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.options();

    let files = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let mut all_valid = true;
    for path in &files {
        let name = if path.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        };

        let bytes = match read_input(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{}: cannot read input: {}", name, e);
                return ExitCode::from(EXIT_IO_ERROR);
            }
        };

        let input = match String::from_utf8(bytes) {
            Ok(input) => input,
            Err(e) => {
                all_valid = false;
                if !cli.quiet {
                    println!("{}: invalid: input is not UTF-8: {}", name, e.utf8_error());
                }
                continue;
            }
        };

        if cli.tokens {
            match tokenize_with_options(&input, &options) {
                Ok(tokens) => {
                    if !cli.quiet {
                        for token in &tokens {
                            println!("{}", token);
                        }
                    }
                }
                Err(e) => {
                    all_valid = false;
                    if !cli.quiet {
                        println!("{}: invalid: {}", name, e);
                    }
                }
            }
            continue;
        }

        match validate_with_options(&input, &options) {
            Ok(()) => {
                if !cli.quiet {
                    println!("{}: valid", name);
                }
            }
            Err(e) => {
                all_valid = false;
                if !cli.quiet {
                    println!("{}: invalid: {}", name, e);
                }
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}
