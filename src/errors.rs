//! Errors raised while reading per-sample QC artifacts and assembling summary
//! records.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Shorthand for results produced by the `ncov-qc` library.
pub type Result<T> = std::result::Result<T, Error>;

/// The ways in which reading inputs or assembling a summary record can fail.
///
/// None of these are recovered from: a sample either assembles completely or
/// the error is propagated to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A row was malformed (wrong number of fields, or a non-numeric value
    /// where a number was expected).
    #[error("malformed {table}: line {line}: {reason}")]
    Format {
        /// The name of the table being read.
        table: &'static str,
        /// The 1-based line number of the offending line.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A table contained no usable data rows.
    #[error("no data rows found in {table}")]
    EmptyInput {
        /// The name of the table being read.
        table: &'static str,
    },

    /// A sample was not present in the metadata index.
    #[error("sample `{sample}` is not present in the metadata table")]
    MissingKey {
        /// The sample name that was looked up.
        sample: String,
    },

    /// An underlying I/O error, tagged with the path being read.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        /// The path being read when the error occurred.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Creates a new [`Error::Format`].
    pub fn format<R>(table: &'static str, line: usize, reason: R) -> Self
    where
        R: Into<String>,
    {
        Error::Format {
            table,
            line,
            reason: reason.into(),
        }
    }

    /// Creates a new [`Error::Io`] for the given path.
    pub fn io<P>(path: P, source: io::Error) -> Self
    where
        P: Into<PathBuf>,
    {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
