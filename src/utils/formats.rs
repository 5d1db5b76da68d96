//! Utilities related to the file formats written by the sequencing pipeline.

pub mod table;
pub mod utils;
