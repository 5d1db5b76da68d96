//! Utilities related to displaying things.

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::info;

/// Utility struct used to uniformly count and report the number of rows
/// processed from a table.
pub struct RecordCounter {
    /// The number of rows processed.
    count: usize,

    /// The number of rows to log every.
    log_every: usize,

    /// What is being counted, e.g. "coverage rows".
    label: &'static str,
}

impl RecordCounter {
    /// Creates a new `RecordCounter`. Progress is logged every `log_every`
    /// rows (defaults to one million).
    pub fn new(label: &'static str, log_every: Option<usize>) -> Self {
        RecordCounter {
            count: 0,
            log_every: log_every.unwrap_or(1_000_000).max(1),
            label,
        }
    }

    /// Gets the current number of rows counted via a copy.
    pub fn get(&self) -> usize {
        self.count
    }

    /// Increments the counter and reports the number of rows processed (if
    /// appropriate).
    pub fn inc(&mut self) {
        self.count += 1;

        if self.count % self.log_every == 0 {
            info!(
                "  [*] Processed {} {}.",
                self.count.to_formatted_string(&Locale::en),
                self.label
            );
        }
    }

    /// The count formatted with thousands separators.
    pub fn formatted(&self) -> String {
        self.count.to_formatted_string(&Locale::en)
    }
}
