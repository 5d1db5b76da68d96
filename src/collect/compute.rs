//! Module holding the logic for aggregating per-sample summary files into a
//! corpus table.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use csv::ReaderBuilder;
use csv::StringRecord;
use csv::Trim;
use itertools::Itertools;
use tracing::debug;

use crate::errors::Error;
use crate::errors::Result;
use crate::summary::record::SUMMARY_HEADER_PREFIX;
use crate::utils::formats::utils::open;

/// The filename suffix of per-sample summary files.
pub const DEFAULT_SUFFIX: &str = ".summary.qc.tsv";

/// The summary rows gathered from a directory of per-sample summary files.
#[derive(Debug, Default)]
pub struct CorpusTable {
    /// The files that were read, in the order they were read.
    pub files: Vec<PathBuf>,

    /// The summary rows, headers excluded, with surrounding whitespace
    /// removed from every field.
    pub rows: Vec<StringRecord>,
}

/// Whether a file name is a candidate summary file: visible and ending with
/// `suffix`. The name does not need to be valid UTF-8.
fn is_summary_file(name: &OsStr, suffix: &str) -> bool {
    let name = name.as_encoded_bytes();
    !name.starts_with(b".") && name.ends_with(suffix.as_bytes())
}

/// Finds the summary files within `directory`, in the order the filesystem
/// enumerates them.
pub fn find_summary_files<P>(directory: P, suffix: &str) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let directory = directory.as_ref();
    let mut files = Vec::new();

    let entries = fs::read_dir(directory).map_err(|e| Error::io(directory, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(directory, e))?;
        let path = entry.path();

        if is_summary_file(&entry.file_name(), suffix) && path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}

/// Whether a record is a summary header line.
fn is_header(record: &StringRecord) -> bool {
    record.iter().join("\t").starts_with(SUMMARY_HEADER_PREFIX)
}

/// Reads the summary rows from a single file, dropping header lines, blank
/// lines and whitespace around fields.
pub fn read_summary_rows<P>(src: P) -> Result<Vec<StringRecord>>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .delimiter(b'\t')
        .from_reader(open(path)?);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let reason = e.to_string();
            let line = e.position().map_or(0, |p| p.line() as usize);
            match e.into_kind() {
                csv::ErrorKind::Io(e) => Error::io(path, e),
                _ => Error::format("summary file", line, reason),
            }
        })?;

        if !is_header(&record) {
            rows.push(record);
        }
    }

    Ok(rows)
}

/// Collects the summary rows of every file in `directory` whose name ends
/// with `suffix`. Rows keep their order within a file, and files are visited
/// in filesystem enumeration order. Any unreadable file fails the whole
/// collection.
pub fn collect_summaries<P>(directory: P, suffix: &str) -> Result<CorpusTable>
where
    P: AsRef<Path>,
{
    let mut table = CorpusTable::default();

    for file in find_summary_files(directory, suffix)? {
        let rows = read_summary_rows(&file)?;
        debug!("  [*] {} summary rows from {}.", rows.len(), file.display());

        table.rows.extend(rows);
        table.files.push(file);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::summary::record::SUMMARY_HEADER;

    fn summary_file(dir: &Path, name: &str, lines: &[&str]) {
        let mut contents = SUMMARY_HEADER.join("\t") + "\n";
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        fs::write(dir.join(name), contents).unwrap();
    }

    fn lines(table: &CorpusTable) -> Vec<String> {
        table.rows.iter().map(|r| r.iter().join("\t")).collect()
    }

    #[test]
    fn test_is_summary_file() {
        let is_summary = |name: &str| is_summary_file(OsStr::new(name), DEFAULT_SUFFIX);
        assert!(is_summary("s1.summary.qc.tsv"));
        assert!(!is_summary(".s1.summary.qc.tsv"));
        assert!(!is_summary("s1.summary.qc.tsv.bak"));
        assert!(!is_summary("s1.qc.csv"));
    }

    #[test]
    fn test_collect_two_files() {
        let dir = TempDir::new().unwrap();
        summary_file(dir.path(), "a.summary.qc.tsv", &["a\t1", "a\t2"]);
        summary_file(dir.path(), "b.summary.qc.tsv", &["b\t1", "b\t2"]);
        fs::write(dir.path().join("notes.txt"), "sample_name\nignored\n").unwrap();

        let table = collect_summaries(dir.path(), DEFAULT_SUFFIX).unwrap();
        assert_eq!(table.files.len(), 2);
        let lines = lines(&table);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| !l.starts_with("sample_name")));

        // Rows stay in order within each file.
        let position = |l: &str| lines.iter().position(|x| x == l).unwrap();
        assert!(position("a\t1") < position("a\t2"));
        assert!(position("b\t1") < position("b\t2"));
    }

    #[test]
    fn test_collect_custom_suffix_and_no_dedup() {
        let dir = TempDir::new().unwrap();
        summary_file(dir.path(), "a.qc.summary", &["same\t1", "same\t1  ", "", "  same\t2"]);
        summary_file(dir.path(), "b.summary.qc.tsv", &["other"]);

        let table = collect_summaries(dir.path(), ".qc.summary").unwrap();
        assert_eq!(lines(&table), vec!["same\t1", "same\t1", "same\t2"]);
    }

    #[test]
    fn test_collect_empty_directory() {
        let dir = TempDir::new().unwrap();
        let table = collect_summaries(dir.path(), DEFAULT_SUFFIX).unwrap();
        assert!(table.files.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_collect_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            collect_summaries(missing, DEFAULT_SUFFIX),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_directories_matching_suffix_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.summary.qc.tsv")).unwrap();
        summary_file(dir.path(), "a.summary.qc.tsv", &["a\t1"]);

        let table = collect_summaries(dir.path(), DEFAULT_SUFFIX).unwrap();
        assert_eq!(lines(&table), vec!["a\t1"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_names_are_collected() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xff.summary.qc.tsv");
        fs::write(dir.path().join(name), "c\t1\n").unwrap();
        summary_file(dir.path(), "b.summary.qc.tsv", &["b\t1"]);

        let table = collect_summaries(dir.path(), DEFAULT_SUFFIX).unwrap();
        assert_eq!(table.files.len(), 2);
        let mut lines = lines(&table);
        lines.sort();
        assert_eq!(lines, vec!["b\t1", "c\t1"]);
    }
}
