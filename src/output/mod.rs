//! Writers for comparison and profile results.
//!
//! Every result set is written to `{prefix}_{len}.{ext}` (or
//! `{prefix}_miR.{ext}` for miRNA comparisons) as CSV or pretty-printed
//! JSON. Rows are sorted so that output is reproducible across runs.

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub mod compare;
pub mod profile;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record for {header} does not match the output columns: {reason}")]
    ColumnMismatch { header: String, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Which result set a file holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputLabel {
    /// Alignments of one read length
    Length(usize),
    /// Exact miRNA lookup
    Mirna,
}

impl fmt::Display for OutputLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(f, "{len}"),
            Self::Mirna => write!(f, "miR"),
        }
    }
}

/// Abundance columns of an output file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Mean count and standard error
    Summary,
    /// One count column per named library
    PerLibrary(Vec<String>),
}

/// `{prefix}_{label}.{ext}`
pub fn output_path(prefix: &Path, label: OutputLabel, format: OutputFormat) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("_{label}.{}", format.extension()));
    PathBuf::from(name)
}

/// Create `path` for writing, creating missing parent directories.
///
/// # Errors
///
/// Returns `WriteError::Io` if the directory or file cannot be created.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Fixed-precision number formatting used by every CSV writer
pub(crate) fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        let prefix = Path::new("out/run1");
        assert_eq!(
            output_path(prefix, OutputLabel::Length(24), OutputFormat::Csv),
            PathBuf::from("out/run1_24.csv")
        );
        assert_eq!(
            output_path(prefix, OutputLabel::Mirna, OutputFormat::Json),
            PathBuf::from("out/run1_miR.json")
        );
    }

    #[test]
    fn test_create_output_makes_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/run_21.csv");
        create_output(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(500_000.0, 3), "500000.000");
        assert_eq!(fixed(0.125, 8), "0.12500000");
    }
}
