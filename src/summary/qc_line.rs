//! Parsing of the single-line QC summary file written for each sample.

use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::errors::Result;
use crate::utils::formats::table::Column;
use crate::utils::formats::table::Rows;
use crate::utils::formats::table::TableSchema;

/// The sample name column.
pub const SAMPLE_NAME: Column = Column::new(0, "sample_name", 0);

/// The percentage of `N` bases in the consensus.
pub const PCT_N_BASES: Column = Column::new(1, "pct_n_bases", 1);

/// The percentage of reference bases covered by the consensus.
pub const PCT_COVERED_BASES: Column = Column::new(2, "pct_covered_bases", 2);

/// The overall pass/fail call for the sample.
pub const QC_PASS: Column = Column::new(3, "qc_pass", 6);

/// Layout of the comma-delimited QC summary file.
pub static QC_LINE: TableSchema = TableSchema {
    name: "QC summary line",
    delimiter: b',',
    header_prefix: "sample_name",
    header_case_insensitive: false,
    columns: &[SAMPLE_NAME, PCT_N_BASES, PCT_COVERED_BASES, QC_PASS],
};

/// The fields of interest from a sample's QC summary line. Numeric values are
/// passed through exactly as written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcFields {
    /// The name of the sample; the key used to join the other inputs.
    pub sample_name: String,

    /// The percentage of `N` bases, as written.
    pub pct_n_bases: String,

    /// The percentage of covered bases, as written.
    pub pct_covered_bases: String,

    /// The pass/fail token, as written.
    pub qc_pass: String,
}

fn parse<R>(mut rows: Rows<'_, R>) -> Result<QcFields>
where
    R: BufRead,
{
    let row = match rows.next() {
        Some(result) => result?,
        None => {
            return Err(Error::format(
                QC_LINE.name,
                rows.lines_read(),
                "no data line found",
            ))
        }
    };

    if let Some(result) = rows.next() {
        let extra = result?;
        return Err(Error::format(
            QC_LINE.name,
            extra.line_number(),
            "expected exactly one data line",
        ));
    }

    Ok(QcFields {
        sample_name: row.get(&SAMPLE_NAME).to_string(),
        pct_n_bases: row.get(&PCT_N_BASES).to_string(),
        pct_covered_bases: row.get(&PCT_COVERED_BASES).to_string(),
        qc_pass: row.get(&QC_PASS).to_string(),
    })
}

/// Parses a QC summary file read from `reader`.
pub fn parse_qc_line<R>(reader: R) -> Result<QcFields>
where
    R: BufRead,
{
    parse(QC_LINE.rows(reader))
}

/// Parses the QC summary file at `src`.
pub fn parse_qc_line_from_path<P>(src: P) -> Result<QcFields>
where
    P: AsRef<Path>,
{
    parse(QC_LINE.rows_from_path(src)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "sample_name,pct_N_bases,pct_covered_bases,longest_no_N_run,\
                          num_aligned_reads,qc_flags,qc_pass\n";

    #[test]
    fn test_parse_qc_line() {
        let data = format!("{}sample-01,1.23,98.50,29000,150000,none,TRUE\n", HEADER);
        let fields = parse_qc_line(data.as_bytes()).unwrap();
        assert_eq!(
            fields,
            QcFields {
                sample_name: String::from("sample-01"),
                pct_n_bases: String::from("1.23"),
                pct_covered_bases: String::from("98.50"),
                qc_pass: String::from("TRUE"),
            }
        );
    }

    #[test]
    fn test_parse_qc_line_without_header() {
        let fields = parse_qc_line(&b"s2,0.0,100.0,a,b,c,FALSE"[..]).unwrap();
        assert_eq!(fields.sample_name, "s2");
        assert_eq!(fields.qc_pass, "FALSE");
    }

    #[test]
    fn test_header_only_is_format_error() {
        let err = parse_qc_line(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_too_few_fields_is_format_error() {
        let data = format!("{}sample-01,1.23,98.50\n", HEADER);
        let err = parse_qc_line(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_multiple_data_lines_is_format_error() {
        let data = format!("{}a,1,2,3,4,5,TRUE\nb,1,2,3,4,5,TRUE\n", HEADER);
        let err = parse_qc_line(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
    }
}
