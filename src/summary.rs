//! Functionality related to the `ncov-qc summarize` subcommand: reducing a
//! sample's pipeline outputs to a single QC summary record.

pub mod assemble;
pub mod command;
pub mod coverage;
pub mod metadata;
pub mod qc_line;
pub mod record;
pub mod variants;
