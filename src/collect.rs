//! Functionality related to the `ncov-qc collect` subcommand: aggregating
//! per-sample summary files into a single corpus table.

pub mod command;
pub mod compute;
