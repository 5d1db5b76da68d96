//! Lookup of per-sample Ct values from the shared metadata table.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::errors::Error;
use crate::errors::Result;
use crate::utils::formats::table::Column;
use crate::utils::formats::table::Rows;
use crate::utils::formats::table::TableSchema;

/// The sample name column.
pub const SAMPLE: Column = Column::new(0, "sample", 0);

/// The Ct value column.
pub const CT: Column = Column::new(1, "ct", 1);

/// Layout of the tab-delimited metadata table. The header is optional.
pub static METADATA_TABLE: TableSchema = TableSchema {
    name: "metadata table",
    delimiter: b'\t',
    header_prefix: "sample\tct",
    header_case_insensitive: true,
    columns: &[SAMPLE, CT],
};

/// Maps sample names to Ct values. Immutable once built, so a single index
/// can be shared by every sample in a batch.
#[derive(Clone, Debug, Default)]
pub struct MetadataIndex {
    ct_values: HashMap<String, String>,
}

impl MetadataIndex {
    fn build<R>(rows: Rows<'_, R>) -> Result<Self>
    where
        R: BufRead,
    {
        let mut ct_values = HashMap::new();

        for result in rows {
            let row = result?;
            let sample = row.get(&SAMPLE);

            // Last occurrence wins.
            if let Some(previous) = ct_values.insert(sample.to_string(), row.get(&CT).to_string())
            {
                warn!(
                    "Sample `{}` is listed more than once in the metadata table \
                    (line {}); replacing Ct value {}.",
                    sample,
                    row.line_number(),
                    previous
                );
            }
        }

        debug!("  [*] Indexed Ct values for {} samples.", ct_values.len());
        Ok(Self { ct_values })
    }

    /// Builds an index from a metadata table read from `reader`.
    pub fn from_reader<R>(reader: R) -> Result<Self>
    where
        R: BufRead,
    {
        Self::build(METADATA_TABLE.rows(reader))
    }

    /// Builds an index from the metadata table at `src`.
    pub fn from_path<P>(src: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::build(METADATA_TABLE.rows_from_path(src)?)
    }

    /// Looks up the Ct value for a sample.
    pub fn get(&self, sample: &str) -> Option<&str> {
        self.ct_values.get(sample).map(String::as_str)
    }

    /// Looks up the Ct value for a sample, failing if the sample is absent.
    pub fn require(&self, sample: &str) -> Result<&str> {
        self.get(sample).ok_or_else(|| Error::MissingKey {
            sample: sample.to_string(),
        })
    }

    /// The number of samples in the index.
    pub fn len(&self) -> usize {
        self.ct_values.len()
    }

    /// Whether the index contains no samples.
    pub fn is_empty(&self) -> bool {
        self.ct_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_with_header() {
        let index = MetadataIndex::from_reader(&b"sample\tct\ns1\t21.5\ns2\t30.1\n"[..]).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("s1"), Some("21.5"));
        assert_eq!(index.get("s2"), Some("30.1"));
        assert_eq!(index.get("sample"), None);
    }

    #[test]
    fn test_index_with_uppercase_header() {
        let index = MetadataIndex::from_reader(&b"SAMPLE\tCT\ns1\t21.5\n"[..]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("s1"), Some("21.5"));
    }

    #[test]
    fn test_index_without_header() {
        let index = MetadataIndex::from_reader(&b"s1\t18\n s2\t19 \r\n"[..]).unwrap();
        assert_eq!(index.get("s1"), Some("18"));
        assert_eq!(index.get("s2"), Some("19"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let index = MetadataIndex::from_reader(&b"s1\t18\ns1\t25\n"[..]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("s1"), Some("25"));
    }

    #[test]
    fn test_require_missing_sample() {
        let index = MetadataIndex::from_reader(&b"s1\t18\n"[..]).unwrap();
        assert_eq!(index.require("s1").unwrap(), "18");
        assert!(matches!(
            index.require("s9"),
            Err(Error::MissingKey { sample }) if sample == "s9"
        ));
    }

    #[test]
    fn test_short_line_is_format_error() {
        let err = MetadataIndex::from_reader(&b"s1\t18\ns2\n"[..]).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_header_only_index_is_empty() {
        let index = MetadataIndex::from_reader(&b"sample\tct\n"[..]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.get("sample"), None);
    }
}
