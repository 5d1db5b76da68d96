//! Reduction of a per-base coverage table to depth statistics.

use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::Error;
use crate::errors::Result;
use crate::utils::display::RecordCounter;
use crate::utils::formats::table::Column;
use crate::utils::formats::table::Rows;
use crate::utils::formats::table::TableSchema;

/// The per-base depth column of a coverage table.
pub const DEPTH: Column = Column::new(0, "depth", 7);

/// Layout of the tab-delimited per-base coverage table.
pub static COVERAGE_TABLE: TableSchema = TableSchema {
    name: "coverage table",
    delimiter: b'\t',
    header_prefix: "reference_name\tstart\tend",
    header_case_insensitive: false,
    columns: &[DEPTH],
};

/// Number of coverage rows between progress messages.
const LOG_EVERY: usize = 100_000;

/// Depth of coverage statistics across the genome for a single sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Arithmetic mean of the per-base depths.
    pub mean_depth: f64,

    /// Median of the per-base depths. For an even number of positions, the
    /// mean of the two middle depths.
    pub median_depth: f64,
}

impl CoverageStats {
    /// Computes the statistics over a sequence of depths. Returns `None` for
    /// an empty sequence, for which neither statistic is defined.
    pub fn from_depths(depths: &[i64]) -> Option<Self> {
        if depths.is_empty() {
            return None;
        }

        let n = depths.len();
        let sum: i128 = depths.iter().map(|&d| i128::from(d)).sum();
        let mean_depth = sum as f64 / n as f64;

        let mut sorted = depths.to_vec();
        sorted.sort_unstable();

        let median_depth = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        };

        Some(Self {
            mean_depth,
            median_depth,
        })
    }
}

fn reduce<R>(rows: Rows<'_, R>) -> Result<CoverageStats>
where
    R: BufRead,
{
    let mut depths = Vec::new();
    let mut counter = RecordCounter::new("coverage rows", Some(LOG_EVERY));

    for result in rows {
        let row = result?;
        let raw = row.get(&DEPTH);
        let depth = raw.parse::<i64>().map_err(|_| {
            Error::format(
                COVERAGE_TABLE.name,
                row.line_number(),
                format!("depth is not an integer: `{}`", raw),
            )
        })?;

        depths.push(depth);
        counter.inc();
    }

    debug!("  [*] Read depth for {} positions.", counter.formatted());

    CoverageStats::from_depths(&depths).ok_or(Error::EmptyInput {
        table: COVERAGE_TABLE.name,
    })
}

/// Reduces a coverage table read from `reader` to [`CoverageStats`].
pub fn coverage_stats<R>(reader: R) -> Result<CoverageStats>
where
    R: BufRead,
{
    reduce(COVERAGE_TABLE.rows(reader))
}

/// Reduces the coverage table at `src` to [`CoverageStats`].
pub fn coverage_stats_from_path<P>(src: P) -> Result<CoverageStats>
where
    P: AsRef<Path>,
{
    reduce(COVERAGE_TABLE.rows_from_path(src)?)
}
