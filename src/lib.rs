//! `ncov-qc` is a command line tool which condenses the per-sample quality
//! control outputs of a viral genome sequencing pipeline into a single summary
//! record per sample, and then gathers those records into a corpus table for
//! a whole run. This package is composed of both a library crate, as well as a
//! binary crate.
//!
//! Each sample contributes four inputs:
//!
//! - a variant table, reduced to variant counts by
//!   [`summary::variants`],
//! - a single-line QC summary, parsed by [`summary::qc_line`],
//! - a per-base coverage table, reduced to depth statistics by
//!   [`summary::coverage`], and
//! - a shared metadata table mapping samples to Ct values, indexed by
//!   [`summary::metadata`].
//!
//! [`summary::assemble`] joins these by sample name into a
//! [`SummaryRecord`][summary::record::SummaryRecord], and
//! [`collect::compute`] aggregates previously written records.
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]

pub mod collect;
pub mod errors;
pub mod summary;
pub mod utils;
