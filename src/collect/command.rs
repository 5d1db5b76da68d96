//! Functionality related to the `ncov-qc collect` command itself.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::compute::collect_summaries;
use super::compute::DEFAULT_SUFFIX;
use crate::summary::record::summary_tsv_writer;
use crate::summary::record::SUMMARY_HEADER;

//========================//
// Command line arguments //
//========================//

/// Clap arguments for the `ncov-qc collect` subcommand.
#[derive(Args)]
pub struct CollectArgs {
    /// Directory containing the per-sample summary files.
    #[arg(value_name = "DIR")]
    path: PathBuf,

    /// Filename suffix of the per-sample summary files.
    #[arg(short = 'p', long, value_name = "SUFFIX", default_value = DEFAULT_SUFFIX)]
    pattern: String,

    /// Do not write the column header.
    #[arg(long)]
    no_header: bool,

    /// File to write the corpus table to. Defaults to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
}

//==============//
// Main command //
//==============//

/// Main method for the `ncov-qc collect` subcommand.
pub fn collect(args: CollectArgs) -> anyhow::Result<()> {
    info!("Starting collect command...");
    debug!("Arguments:");
    debug!("  [*] Directory: {}", args.path.display());
    debug!("  [*] Pattern: *{}", args.pattern);
    debug!("  [*] Header: {}", !args.no_header);
    debug!("  [*] Output: {:?}", args.output);

    let table = collect_summaries(&args.path, &args.pattern)
        .with_context(|| format!("could not collect summaries from {}", args.path.display()))?;

    if table.files.is_empty() {
        warn!(
            "No files matching `*{}` were found in {}.",
            args.pattern,
            args.path.display()
        );
    }

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("could not create output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = summary_tsv_writer(output);
    if !args.no_header {
        writer.write_record(SUMMARY_HEADER)?;
    }
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "Collected {} summary rows from {} files.",
        table.rows.len(),
        table.files.len()
    );
    Ok(())
}
