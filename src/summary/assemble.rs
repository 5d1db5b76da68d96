//! Assembly of a sample's QC summary record from its four input files.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::Result;

use super::coverage::coverage_stats_from_path;
use super::metadata::MetadataIndex;
use super::qc_line::parse_qc_line_from_path;
use super::record::SummaryRecord;
use super::variants::count_variants_from_path;

/// The per-sample input files.
#[derive(Clone, Debug)]
pub struct SampleInputs {
    /// The variant table.
    pub variants: PathBuf,

    /// The single-line QC summary file.
    pub qc: PathBuf,

    /// The per-base coverage table.
    pub coverage: PathBuf,
}

/// Assembles a summary record for one sample against an existing metadata
/// index. Use this when summarizing many samples so the shared metadata table
/// is only read once.
pub fn assemble_with_index(
    inputs: &SampleInputs,
    index: &MetadataIndex,
    include_indels: bool,
) -> Result<SummaryRecord> {
    debug!("  [*] QC line: {}", inputs.qc.display());
    let qc = parse_qc_line_from_path(&inputs.qc)?;
    info!("Summarizing sample `{}`.", qc.sample_name);

    debug!("  [*] Variants: {}", inputs.variants.display());
    let variants = count_variants_from_path(&inputs.variants, include_indels)?;

    debug!("  [*] Coverage: {}", inputs.coverage.display());
    let coverage = coverage_stats_from_path(&inputs.coverage)?;

    let ct = index.require(&qc.sample_name)?.to_string();

    Ok(SummaryRecord::new(qc, variants, coverage, ct))
}

/// Assembles a summary record for one sample, building the metadata index
/// from `metadata` first.
pub fn assemble(
    inputs: &SampleInputs,
    metadata: &Path,
    include_indels: bool,
) -> Result<SummaryRecord> {
    debug!("  [*] Metadata: {}", metadata.display());
    let index = MetadataIndex::from_path(metadata)?;
    if index.is_empty() {
        warn!("No samples found in metadata table {}.", metadata.display());
    }
    assemble_with_index(inputs, &index, include_indels)
}
