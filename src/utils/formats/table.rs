//! Named-column access over the delimited, line-oriented tables written by the
//! sequencing pipeline.
//!
//! # Overview
//!
//! None of the pipeline's tables quote or escape their fields, so each one is
//! read with a [`csv`] reader that has quoting turned off and a single
//! delimiter byte. What differs between the tables is the delimiter, the
//! literal prefix that identifies a header line, and where the columns of
//! interest live. A [`TableSchema`] captures exactly those
//! three things so that the reducers elsewhere in the crate can ask for a
//! field by name (for example, `ALT`) rather than by a bare position.
//!
//! Columns are declared with a default position. When a header line is
//! present, each column is looked up by name (case-insensitively) within the
//! header and, if found, the header's position wins. Columns whose names do
//! not appear in the header keep their default position. Without a header, the
//! defaults are used as-is.
//!
//! ```
//! use ncov_qc::utils::formats::table::{Column, TableSchema};
//!
//! const NAME: Column = Column::new(0, "name", 0);
//! const VALUE: Column = Column::new(1, "value", 1);
//!
//! static SCHEMA: TableSchema = TableSchema {
//!     name: "example table",
//!     delimiter: b'\t',
//!     header_prefix: "value\tname",
//!     header_case_insensitive: false,
//!     columns: &[NAME, VALUE],
//! };
//!
//! let data = "value\tname\n42\tanswer\n";
//! let rows = SCHEMA
//!     .rows(data.as_bytes())
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get(&NAME), "answer");
//! assert_eq!(rows[0].get(&VALUE), "42");
//! ```

use std::io::BufRead;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;

use csv::ReaderBuilder;
use csv::StringRecord;
use itertools::Itertools;
use tracing::debug;

use crate::errors::Error;
use crate::errors::Result;
use crate::utils::formats::utils::open;

//========//
// Column //
//========//

/// A named column within a [`TableSchema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// The index of this column within [`TableSchema::columns`].
    slot: usize,

    /// The name of the column as it appears in a header line.
    name: &'static str,

    /// The position of the column when no header names it.
    default_position: usize,
}

impl Column {
    /// Creates a new [`Column`]. The `slot` must be the column's index within
    /// the schema's `columns` slice.
    pub const fn new(slot: usize, name: &'static str, default_position: usize) -> Self {
        Self {
            slot,
            name,
            default_position,
        }
    }

    /// The name of the column.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The position of the column when no header names it.
    pub fn default_position(&self) -> usize {
        self.default_position
    }
}

//=============//
// TableSchema //
//=============//

/// Describes the layout of a delimited table.
#[derive(Debug)]
pub struct TableSchema {
    /// Human readable name of the table, used in error messages.
    pub name: &'static str,

    /// The field delimiter. Must be a single ASCII byte.
    pub delimiter: u8,

    /// Any line starting with this literal is considered a header line.
    pub header_prefix: &'static str,

    /// Whether the header prefix is matched without regard to case.
    pub header_case_insensitive: bool,

    /// The columns read from each data row.
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Returns whether a line is a header line for this table.
    pub fn is_header(&self, line: &str) -> bool {
        if self.header_case_insensitive {
            line.len() >= self.header_prefix.len()
                && line.is_char_boundary(self.header_prefix.len())
                && line[..self.header_prefix.len()].eq_ignore_ascii_case(self.header_prefix)
        } else {
            line.starts_with(self.header_prefix)
        }
    }

    /// Same as [`is_header`](Self::is_header), for a record that has already
    /// been split on the delimiter.
    fn is_header_record(&self, record: &StringRecord) -> bool {
        let delimiter = char::from(self.delimiter).to_string();
        self.is_header(&record.iter().join(&delimiter))
    }

    /// The number of fields a data row needs for the given positions.
    fn required_fields(positions: &[usize]) -> usize {
        positions.iter().max().map_or(0, |p| p + 1)
    }

    /// The column positions used when no header has been seen.
    fn default_positions(&self) -> Rc<[usize]> {
        self.columns.iter().map(|c| c.default_position).collect()
    }

    /// Resolves each column against the fields of a header line. A header
    /// with fewer fields than the resolved positions need is malformed.
    fn resolve_positions(&self, header: &StringRecord, line_number: usize) -> Result<Rc<[usize]>> {
        let positions: Rc<[usize]> = self
            .columns
            .iter()
            .map(|column| {
                match header
                    .iter()
                    .position(|name| name.trim().eq_ignore_ascii_case(column.name))
                {
                    Some(position) => position,
                    None => {
                        debug!(
                            "  [*] {}: column `{}` not named in header, using position {}.",
                            self.name, column.name, column.default_position
                        );
                        column.default_position
                    }
                }
            })
            .collect();

        let required = Self::required_fields(&positions);
        if header.len() < required {
            return Err(Error::format(
                self.name,
                line_number,
                format!(
                    "header has {} fields, but at least {} are needed",
                    header.len(),
                    required
                ),
            ));
        }

        Ok(positions)
    }

    /// Iterates over the data rows of a table read from `reader`.
    pub fn rows<R>(&self, reader: R) -> Rows<'_, R>
    where
        R: Read,
    {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .delimiter(self.delimiter)
            .from_reader(reader);

        Rows {
            schema: self,
            reader,
            source: PathBuf::from(self.name),
            line_number: 0,
            positions: self.default_positions(),
            seen_header: false,
        }
    }

    /// Opens the file at `src` and iterates over its data rows.
    pub fn rows_from_path<P>(&self, src: P) -> Result<Rows<'_, Box<dyn BufRead>>>
    where
        P: AsRef<Path>,
    {
        let path = src.as_ref();
        let reader = open(path)?;

        let mut rows = self.rows(reader);
        rows.source = path.to_path_buf();
        Ok(rows)
    }
}

//=====//
// Row //
//=====//

/// A single data row of a table.
#[derive(Debug)]
pub struct Row {
    line_number: usize,
    record: StringRecord,
    positions: Rc<[usize]>,
}

impl Row {
    /// The 1-based line number this row was read from.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Gets the value of a column, with surrounding whitespace removed.
    pub fn get(&self, column: &Column) -> &str {
        // Every position was checked against the field count when the row
        // was read.
        self.record[self.positions[column.slot]].trim()
    }
}

//======//
// Rows //
//======//

/// An iterator over the data rows of a table. Header lines are skipped
/// wherever they appear; the first one seen determines column positions.
/// Blank lines are skipped as well.
pub struct Rows<'s, R> {
    schema: &'s TableSchema,
    reader: csv::Reader<R>,
    source: PathBuf,
    line_number: usize,
    positions: Rc<[usize]>,
    seen_header: bool,
}

impl<R> Rows<'_, R> {
    /// The line number of the last record read, or zero before any.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn error(&self, err: csv::Error) -> Error {
        let line = err
            .position()
            .map_or(self.line_number + 1, |p| p.line() as usize);
        let reason = err.to_string();

        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::io(self.source.clone(), e),
            _ => Error::format(self.schema.name, line, reason),
        }
    }
}

impl<R> Iterator for Rows<'_, R>
where
    R: Read,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(self.error(e))),
            }

            self.line_number = record
                .position()
                .map_or(self.line_number + 1, |p| p.line() as usize);

            if self.schema.is_header_record(&record) {
                if !self.seen_header {
                    self.positions = match self.schema.resolve_positions(&record, self.line_number)
                    {
                        Ok(positions) => positions,
                        Err(e) => return Some(Err(e)),
                    };
                    self.seen_header = true;
                }
                continue;
            }

            let required = TableSchema::required_fields(&self.positions);
            if record.len() < required {
                return Some(Err(Error::format(
                    self.schema.name,
                    self.line_number,
                    format!(
                        "expected at least {} fields, found {}",
                        required,
                        record.len()
                    ),
                )));
            }

            return Some(Ok(Row {
                line_number: self.line_number,
                record,
                positions: Rc::clone(&self.positions),
            }));
        }
    }
}
