//! `r8` — the Rotor shell.
//!
//! Runs a script file when given a path, or starts the interactive shell
//! when invoked without arguments.  Runtime errors from user code render a
//! diagnostic and exit successfully; only I/O failures (an unreadable
//! script file) exit non-zero.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rotor_core::Interpreter;

mod repl;

/// Rotor shell: run a script or start an interactive session.
#[derive(Parser, Debug)]
#[command(name = "r8", version, about)]
struct Args {
    /// Script file to execute; starts the interactive shell when omitted.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.script {
        Some(path) => run_file(&path),
        None => repl::run(),
    }
}

fn run_file(path: &Path) -> Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let mut stdout = io::stdout();
    let mut interp = Interpreter::new(&mut stdout);
    interp.run(&source);
    Ok(())
}
