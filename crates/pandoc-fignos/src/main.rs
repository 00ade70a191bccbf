//! pandoc-fignos - pandoc JSON filter for numbered figures
//!
//! Reads a pandoc JSON document on stdin and writes the filtered document
//! on stdout. Diagnostics and logs go to stderr.

use std::io::{self, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use fignos_core::{FignosError, OutputFormat, filter_json};
use fignos_error_reporting::DiagnosticMessage;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pandoc-fignos")]
#[command(version)]
#[command(about = "Number figures and resolve figure references in a pandoc document", long_about = None)]
struct Cli {
    /// Output format pandoc is writing, e.g. html, latex or docx
    #[arg(default_value = "")]
    format: String,

    /// Accepted for compatibility with older pandoc; ignored
    #[arg(long, value_name = "VERSION")]
    pandocversion: Option<String>,

    /// Print diagnostics as JSON lines instead of text
    #[arg(long)]
    diagnostics_json: bool,
}

/// Log filter used when `RUST_LOG` is unset. Covers the library crate,
/// where the numbering and resolution events are emitted.
fn default_filter() -> EnvFilter {
    EnvFilter::new("pandoc_fignos=warn,fignos_core=warn")
}

fn report(diagnostic: &DiagnosticMessage, json: bool) {
    if json {
        eprintln!("{}", diagnostic.to_json());
    } else {
        eprint!("{}", diagnostic.to_text());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(version) = &cli.pandocversion {
        tracing::debug!(version = %version, "ignoring --pandocversion");
    }

    let format = OutputFormat::new(&cli.format);
    let mut reader = BufReader::new(io::stdin().lock());
    let mut writer = BufWriter::new(io::stdout().lock());

    match filter_json(&mut reader, &mut writer, &format) {
        Ok(outcome) => {
            for diagnostic in &outcome.diagnostics {
                report(diagnostic, cli.diagnostics_json);
            }
            writer.flush().context("failed to flush output")?;
            Ok(())
        }
        Err(err @ FignosError::InvalidConfiguration { .. }) => {
            report(&err.to_diagnostic(), cli.diagnostics_json);
            std::process::exit(1);
        }
        Err(err) => {
            report(&err.to_diagnostic(), cli.diagnostics_json);
            Err(err).context("pandoc-fignos could not filter the document")
        }
    }
}
