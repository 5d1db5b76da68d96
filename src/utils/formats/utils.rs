//! Utilities related to opening the line-oriented files produced by the
//! sequencing pipeline.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::errors::Error;
use crate::errors::Result;

/// Compression applied to an input file, as detected from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    /// The file is plain text.
    None,

    /// The file is gzip (or BGZF) compressed.
    Gzip,
}

impl Compression {
    /// Detects the compression of a file from its extension.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz") => {
                Compression::Gzip
            }
            _ => Compression::None,
        }
    }
}

/// Opens a file as a buffered reader, transparently decompressing gzipped
/// inputs. The returned reader owns the file handle, so the handle is closed
/// as soon as the reader is dropped.
pub fn open<P>(src: P) -> Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    match Compression::detect(path) {
        Compression::Gzip => {
            debug!("  [*] Opening {} as gzip.", path.display());
            Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
        }
        Compression::None => Ok(Box::new(BufReader::new(file))),
    }
}
