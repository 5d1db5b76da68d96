//! Utilities that are used across the `ncov-qc` subcommands.

pub mod display;
pub mod formats;
