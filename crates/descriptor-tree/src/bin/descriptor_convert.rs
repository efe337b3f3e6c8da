//! `descriptor-convert` — convert a document (stdin) between JSON, XML and
//! the binary descriptor encoding (stdout).
//!
//! Usage:
//!   descriptor-convert [--from json|xml|bin] [--to json|xml|bin] [--pretty]
//!                      [--root TAG] [--item TAG]
//!
//! Set `DESCRIPTOR_LOG` (or `RUST_LOG`) to enable logging on stderr.

use descriptor_tree::cli::{convert, init_tracing, Args, CliError};
use std::io::{self, Read, Write};

fn run() -> Result<(), CliError> {
    let args = Args::parse(std::env::args().skip(1))?;

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let output = convert(&input, args.from, args.to, &args.options)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
