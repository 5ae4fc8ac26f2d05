//! Input validation tests
//!
//! Malformed or oversized inputs must be rejected with a typed error
//! before any alignment work starts.

use std::io::Write;
use std::path::PathBuf;

use srna_quant::core::types::AbundanceKind;
use srna_quant::parsing::reads::{load_read_libraries, LoadConfig};
use srna_quant::parsing::reference::load_references_from_reader;
use srna_quant::parsing::ParseError;
use srna_quant::quant::PoolConfig;
use srna_quant::utils::validation::{
    check_library_limit, check_reference_limit, validate_length_range, validate_lengths,
    validate_min_count, ValidationError, MAX_LIBRARIES, MAX_REFERENCES,
};
use tempfile::NamedTempFile;

fn fasta_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".fa").expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(files: &[PathBuf]) -> Result<srna_quant::ReadAbundanceTable, ParseError> {
    load_read_libraries(
        files,
        &LoadConfig::default(),
        AbundanceKind::Summary,
        &PoolConfig::with_threads(2),
    )
}

/// Test collapsed headers that do not carry a count
#[test]
fn test_malformed_collapsed_headers() {
    let read = "ACGTACGTACGTACGTACGTAC";
    for header in ["read", "1-2-3", "1-many"] {
        let file = fasta_file(&format!(">{header}\n{read}\n"));
        let result = load(&[file.path().to_path_buf()]);
        assert!(
            matches!(result, Err(ParseError::InvalidFormat(_))),
            "header {header:?} should be rejected"
        );
    }
}

/// Test that one bad library fails the whole condition
#[test]
fn test_bad_library_among_good() {
    let good = fasta_file(">1-5\nACGTACGTACGTACGTACGTAC\n");
    let bad = fasta_file(">no_count\nACGTACGTACGTACGTACGTAC\n");
    let result = load(&[good.path().to_path_buf(), bad.path().to_path_buf()]);
    assert!(result.is_err());
}

/// Test that an empty file list is rejected
#[test]
fn test_no_libraries() {
    assert!(matches!(load(&[]), Err(ParseError::InvalidFormat(_))));
}

/// Test the library count limit
#[test]
fn test_library_limit() {
    assert!(check_library_limit(MAX_LIBRARIES).is_none());
    assert!(check_library_limit(MAX_LIBRARIES + 1).is_some());

    let files: Vec<PathBuf> = (0..=MAX_LIBRARIES)
        .map(|i| PathBuf::from(format!("lib_{i}.fa")))
        .collect();
    assert!(matches!(
        load(&files),
        Err(ParseError::TooManyLibraries(n)) if n == MAX_LIBRARIES + 1
    ));
}

/// Test the reference count limit
#[test]
fn test_reference_limit() {
    assert!(check_reference_limit(MAX_REFERENCES - 1).is_none());
    assert!(check_reference_limit(MAX_REFERENCES).is_some());
}

/// Test that an empty reference file is rejected
#[test]
fn test_empty_reference_file() {
    let result = load_references_from_reader(&b""[..]);
    assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
}

/// Test length and count option validation
#[test]
fn test_option_validation() {
    assert_eq!(
        validate_length_range(30, 20),
        Err(ValidationError::InvalidLengthRange { min: 30, max: 20 })
    );
    assert_eq!(
        validate_lengths(&[], 18, 32),
        Err(ValidationError::NoLengths)
    );
    assert_eq!(validate_lengths(&[0], 18, 32), Err(ValidationError::ZeroLength));
    assert_eq!(
        validate_lengths(&[17], 18, 32),
        Err(ValidationError::LengthOutOfRange {
            length: 17,
            min: 18,
            max: 32
        })
    );
    assert!(validate_lengths(&[18, 24, 32], 18, 32).is_ok());

    assert!(validate_min_count(f64::NAN).is_err());
    assert!(validate_min_count(-1.0).is_err());
    assert!(validate_min_count(2.0).is_ok());
}
