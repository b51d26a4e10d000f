//! # folio CLI
//!
//! Usage:
//!   folio input.json -o output.pdf
//!   echo '{ ... }' | folio -o output.pdf
//!   folio --example > report.json
//!   folio --properties

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use folio::{LayoutConfig, RowBreakPolicy};

#[derive(Parser)]
#[command(name = "folio", about = "Render JSON documents to paginated PDF", version)]
struct Cli {
    /// Input JSON document. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, default_value = "document.pdf")]
    output: PathBuf,

    /// What to do when a row crosses the bottom of a page
    /// (keep-together or split-children)
    #[arg(long, default_value = "keep-together")]
    row_policy: RowBreakPolicy,

    /// Print a sample document as JSON and exit
    #[arg(long)]
    example: bool,

    /// Print the recognized node properties as JSON and exit
    #[arg(long)]
    properties: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.example {
        let json = serde_json::to_string_pretty(&folio::schema::example_document())?;
        println!("{}", json);
        return Ok(());
    }

    if cli.properties {
        println!(
            "{}",
            serde_json::to_string_pretty(&folio::schema::properties_response())?
        );
        return Ok(());
    }

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let document = folio::parse_document(&input)?;
    let config = LayoutConfig::default().with_row_break_policy(cli.row_policy);
    let artifact = folio::render_with(&document, &config)?;

    fs::write(&cli.output, &artifact.bytes)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    eprintln!(
        "✓ Written {} bytes ({} page(s)) to {}",
        artifact.len(),
        artifact.page_count,
        cli.output.display()
    );
    Ok(())
}
