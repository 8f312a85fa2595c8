#![allow(clippy::print_stderr)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use luar::parse::parse;
use luar::print::chunk_to_json;

/// Parse a Lua source file and print its syntax tree as JSON.
#[derive(Debug, Parser)]
#[command(name = "luar", version)]
struct Cli {
    /// Path to the source file; prompted for when absent
    path: Option<PathBuf>,

    /// Emit the tree on a single line instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let path = match cli.path {
        Some(path) => path,
        None => prompt_for_path()?,
    };
    if !path.exists() {
        eprintln!("error: file not found -> {}", path.display());
        process::exit(1);
    }

    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let source = String::from_utf8_lossy(&bytes);

    let result = parse(&source);
    for diagnostic in &result.diagnostics {
        tracing::warn!("{}", diagnostic);
    }

    let tree = chunk_to_json(&result.chunk);
    let rendered = if cli.compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };
    println!("{}", rendered);
    Ok(())
}

fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter path to source file: ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read path from stdin")?;
    Ok(PathBuf::from(line.trim()))
}
