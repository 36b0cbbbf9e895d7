//! `toontab` CLI: convert JSON record arrays to and from TOON on the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode a JSON array of objects to TOON (stdin → stdout)
//! echo '[{"id":1,"name":"Alice"}]' | toontab encode
//!
//! # Encode from file to file
//! toontab encode -i records.json -o records.toon
//!
//! # Decode TOON back to pretty-printed JSON
//! toontab decode -i records.toon
//!
//! # Run a conversion request and print the response envelope
//! echo '{"input":"[]","mode":"json-to-toon"}' | toontab convert
//!
//! # Show size statistics
//! toontab stats -i records.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::process;
use toontab_core::{ConvertRequest, ConvertResponse};

#[derive(Parser)]
#[command(name = "toontab", version, about = "TOON tabular notation converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON array of objects to TOON
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode TOON back to pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a conversion request and print the response envelope
    Convert {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show size statistics for an encoded input
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output } => {
            let json = read_input(input.as_deref())?;
            let value: Value = serde_json::from_str(&json).context("input is not valid JSON")?;
            let toon = toontab_core::encode(&value).context("failed to encode JSON to TOON")?;
            write_output(output.as_deref(), &toon)?;
        }
        Commands::Decode { input, output } => {
            let toon = read_input(input.as_deref())?;
            let decoded = toontab_core::decode(&toon).context("failed to decode TOON input")?;
            // The count advisory goes to stderr so piped output stays clean.
            if let Some(mismatch) = decoded.count_mismatch {
                eprintln!("warning: {mismatch}");
            }
            let pretty = serde_json::to_string_pretty(&decoded.into_value())?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Convert { input, output } => {
            let body = read_input(input.as_deref())?;
            let response = match serde_json::from_str::<ConvertRequest>(&body) {
                Ok(request) => toontab_core::convert(&request),
                Err(err) => ConvertResponse::Failure {
                    error: "Invalid request body".to_string(),
                    details: err.to_string(),
                },
            };
            let rendered = serde_json::to_string(&response)?;
            write_output(output.as_deref(), &rendered)?;
            if !response.is_success() {
                // Stdout is block-buffered under a pipe; flush before the
                // early exit or the envelope never leaves the process.
                io::stdout().flush().ok();
                process::exit(1);
            }
        }
        Commands::Stats { input } => {
            let json = read_input(input.as_deref())?;
            let value: Value = serde_json::from_str(&json).context("input is not valid JSON")?;
            let toon = toontab_core::encode(&value).context("failed to encode JSON to TOON")?;
            let json_bytes = json.len();
            let toon_bytes = toon.len();
            let reduction = if json_bytes > 0 {
                (1.0 - (toon_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:  {} bytes", json_bytes);
            println!("TOON size:  {} bytes", toon_bytes);
            println!("Reduction:  {:.1}%", reduction);
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read file: {path}")),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write file: {path}"))?,
        None => print!("{content}"),
    }
    Ok(())
}
