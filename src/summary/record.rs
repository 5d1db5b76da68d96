//! The per-sample QC summary record and its tab-delimited rendering.

use std::fmt;
use std::io;
use std::io::Write;

use csv::QuoteStyle;
use csv::WriterBuilder;
use serde::Deserialize;
use serde::Serialize;

use super::coverage::CoverageStats;
use super::qc_line::QcFields;
use super::variants::VariantCounts;

/// Column names of a summary record, in output order.
pub const SUMMARY_HEADER: [&str; 12] = [
    "sample_name",
    "pct_n_bases",
    "pct_covered_bases",
    "total_variants",
    "total_snv",
    "total_indel",
    "total_n",
    "total_iupac",
    "mean_depth",
    "median_depth",
    "ct",
    "qc_pass",
];

/// Any line starting with this literal is a summary header line.
pub const SUMMARY_HEADER_PREFIX: &str = "sample_name\tpct_n_bases\tpct_covered_bases";

/// The QC summary for a single sample: the join of its QC line, variant
/// counts, coverage statistics and Ct value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// The name of the sample.
    pub sample_name: String,

    /// The percentage of `N` bases, as written in the QC line.
    pub pct_n_bases: String,

    /// The percentage of covered bases, as written in the QC line.
    pub pct_covered_bases: String,

    /// Total number of counted variants.
    pub total_variants: usize,

    /// Number of single nucleotide variants.
    pub total_snv: usize,

    /// Number of indels.
    pub total_indel: usize,

    /// Number of variants called as `N`.
    pub total_n: usize,

    /// Number of variants called as another IUPAC ambiguity code.
    pub total_iupac: usize,

    /// Mean depth of coverage.
    pub mean_depth: f64,

    /// Median depth of coverage.
    pub median_depth: f64,

    /// Ct value from the metadata table.
    pub ct: String,

    /// The pass/fail token from the QC line.
    pub qc_pass: String,
}

impl SummaryRecord {
    /// Joins the per-sample components into a record.
    pub fn new(qc: QcFields, variants: VariantCounts, coverage: CoverageStats, ct: String) -> Self {
        Self {
            sample_name: qc.sample_name,
            pct_n_bases: qc.pct_n_bases,
            pct_covered_bases: qc.pct_covered_bases,
            total_variants: variants.total_variants,
            total_snv: variants.total_snv,
            total_indel: variants.total_indel,
            total_n: variants.total_n,
            total_iupac: variants.total_iupac,
            mean_depth: coverage.mean_depth,
            median_depth: coverage.median_depth,
            ct,
            qc_pass: qc.qc_pass,
        }
    }

    /// The record's values in [`SUMMARY_HEADER`] order, as they are written
    /// to a TSV line. Depths use the shortest form that reads back as the
    /// same number (`2.5`, `5`).
    pub fn fields(&self) -> [String; 12] {
        [
            self.sample_name.clone(),
            self.pct_n_bases.clone(),
            self.pct_covered_bases.clone(),
            self.total_variants.to_string(),
            self.total_snv.to_string(),
            self.total_indel.to_string(),
            self.total_n.to_string(),
            self.total_iupac.to_string(),
            self.mean_depth.to_string(),
            self.median_depth.to_string(),
            self.ct.clone(),
            self.qc_pass.clone(),
        ]
    }
}

/// A [`csv::Writer`] for tab-delimited summary lines. Fields are written as
/// they are, without quoting.
pub fn summary_tsv_writer<W>(inner: W) -> csv::Writer<W>
where
    W: Write,
{
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(inner)
}

//========//
// Output //
//========//

/// Output formats for summary records.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-delimited, one line per sample.
    #[default]
    Tsv,

    /// Pretty-printed JSON array.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tsv => write!(f, "tsv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Writes summary records to an output stream.
pub struct SummaryWriter<W> {
    inner: W,
    format: OutputFormat,
    header: bool,
}

impl<W> SummaryWriter<W>
where
    W: Write,
{
    /// Creates a new [`SummaryWriter`]. The header setting only applies to
    /// TSV output.
    pub fn new(inner: W, format: OutputFormat, header: bool) -> Self {
        Self {
            inner,
            format,
            header,
        }
    }

    /// Writes all of the records (and the header, if requested), then
    /// flushes the stream.
    pub fn write_all(mut self, records: &[SummaryRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Tsv => {
                let mut writer = summary_tsv_writer(&mut self.inner);
                if self.header {
                    writer.write_record(SUMMARY_HEADER)?;
                }
                for record in records {
                    writer.write_record(record.fields())?;
                }
                writer.flush()?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.inner, records)?;
                writeln!(self.inner)?;
            }
        }

        self.inner.flush()
    }
}
