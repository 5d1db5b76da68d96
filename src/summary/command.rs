//! Functionality related to the `ncov-qc summarize` command itself.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;
use tracing::info;

use super::assemble::assemble;
use super::assemble::SampleInputs;
use super::record::OutputFormat;
use super::record::SummaryWriter;

//========================//
// Command line arguments //
//========================//

/// Clap arguments for the `ncov-qc summarize` subcommand.
#[derive(Args)]
pub struct SummarizeArgs {
    /// Variant table for the sample (`<sample>.variants.tsv`).
    #[arg(long, value_name = "PATH")]
    variants: PathBuf,

    /// QC summary line for the sample (`<sample>.qc.csv`).
    #[arg(long, value_name = "PATH")]
    qc: PathBuf,

    /// Per-base coverage table for the sample
    /// (`<sample>.per_base_coverage.bed`).
    #[arg(long, value_name = "PATH")]
    coverage: PathBuf,

    /// Metadata table mapping sample names to Ct values.
    #[arg(long, value_name = "PATH")]
    metadata: PathBuf,

    /// Do not count indels (multi-character ALT calls) as variants.
    #[arg(long)]
    exclude_indels: bool,

    /// Write the column header before the record (TSV output only).
    #[arg(long)]
    header: bool,

    /// Output format.
    #[arg(short = 'f', long, value_name = "FORMAT", default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// File to write the summary to. Defaults to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
}

//==============//
// Main command //
//==============//

/// Main method for the `ncov-qc summarize` subcommand.
pub fn summarize(args: SummarizeArgs) -> anyhow::Result<()> {
    info!("Starting summarize command...");
    debug!("Arguments:");
    debug!("  [*] Variants: {}", args.variants.display());
    debug!("  [*] QC: {}", args.qc.display());
    debug!("  [*] Coverage: {}", args.coverage.display());
    debug!("  [*] Metadata: {}", args.metadata.display());
    debug!("  [*] Include indels: {}", !args.exclude_indels);
    debug!("  [*] Format: {}", args.format);
    debug!("  [*] Output: {:?}", args.output);

    let inputs = SampleInputs {
        variants: args.variants,
        qc: args.qc,
        coverage: args.coverage,
    };

    let record = assemble(&inputs, &args.metadata, !args.exclude_indels)
        .with_context(|| format!("could not summarize {}", inputs.qc.display()))?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("could not create output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    SummaryWriter::new(writer, args.format, args.header)
        .write_all(std::slice::from_ref(&record))
        .context("could not write summary")?;

    info!("Summarized sample `{}`.", record.sample_name);
    Ok(())
}
