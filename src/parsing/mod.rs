//! Loaders for read libraries and reference sequences.
//!
//! This module provides loaders for:
//!
//! - **Read libraries**: collapsed FASTA (`>id-count`), raw FASTA and FASTQ,
//!   normalised to reads per million and combined across libraries
//! - **References**: FASTA sequences with precomputed reverse complements
//! - **Mature miRNAs**: FASTA of known mature sequences with duplication weights
//!
//! Any input may be gzip or bgzip compressed (`.gz`/`.bgz`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use srna_quant::core::types::AbundanceKind;
//! use srna_quant::parsing::reads::{load_read_libraries, LoadConfig};
//! use srna_quant::parsing::reference::load_references;
//! use srna_quant::quant::PoolConfig;
//!
//! let files = vec![PathBuf::from("rep1.fa"), PathBuf::from("rep2.fa")];
//! let table = load_read_libraries(
//!     &files,
//!     &LoadConfig::default(),
//!     AbundanceKind::Summary,
//!     &PoolConfig::default(),
//! )
//! .unwrap();
//! let refs = load_references(&PathBuf::from("refs.fa")).unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::core::error::QuantError;
use crate::quant::pool::PoolError;
use crate::utils::validation::{MAX_LIBRARIES, MAX_REFERENCES};

pub mod mirna;
pub mod reads;
pub mod reference;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Too many references: {0} exceeds maximum allowed ({max})", max = MAX_REFERENCES)]
    TooManyReferences(usize),

    #[error(
        "Too many read libraries: {0} exceeds maximum allowed ({max})",
        max = MAX_LIBRARIES
    )]
    TooManyLibraries(usize),

    #[error("Worker pool failure: {0}")]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Quant(#[from] QuantError),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open `path` for buffered reading, decompressing gzip/bgzip input.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("reads.fa.gz")));
        assert!(is_gzipped(Path::new("reads.FQ.BGZ")));
        assert!(!is_gzipped(Path::new("reads.fa")));
    }

    #[test]
    fn test_open_gzipped() {
        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">1-2\nACGT\n").unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        let mut content = String::new();
        open_reader(temp.path())
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, ">1-2\nACGT\n");
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_reader(Path::new("/nonexistent/reads.fa"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
