//! Reference FASTA loader using noodles.
//!
//! Supports uncompressed and gzip/bgzip compressed files. Record order is
//! preserved, since profile output is written in reference order.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use noodles::fasta;
use tracing::{info, warn};

use crate::core::reference::{ReferenceRecord, ReferenceSet};
use crate::parsing::{open_reader, ParseError};
use crate::utils::validation::{check_reference_limit, is_nucleotide_sequence};

/// Load a reference FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if parsing fails, `ParseError::InvalidFormat` if no records are found, or
/// `ParseError::TooManyReferences` if the limit is exceeded.
pub fn load_references(path: &Path) -> Result<ReferenceSet, ParseError> {
    let start = Instant::now();
    let refs = load_references_from_reader(open_reader(path)?)?;

    info!(
        file = %path.display(),
        references = refs.len(),
        elapsed = ?start.elapsed(),
        "Reference file processed"
    );
    Ok(refs)
}

/// Load reference records from any buffered FASTA source.
///
/// Sequences are uppercased. A header seen twice keeps its first record.
///
/// # Errors
///
/// See [`load_references`].
pub fn load_references_from_reader<R: BufRead>(reader: R) -> Result<ReferenceSet, ParseError> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_reference_limit(records.len()).is_some() {
            return Err(ParseError::TooManyReferences(records.len()));
        }

        let header = String::from_utf8_lossy(record.name()).to_string();
        if !seen.insert(header.clone()) {
            warn!(header = %header, "Duplicate reference header, keeping the first record");
            continue;
        }

        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_ascii_uppercase();
        if !is_nucleotide_sequence(&sequence) {
            warn!(header = %header, "Reference contains non-ACGTN characters");
        }
        records.push(ReferenceRecord::new(header, sequence));
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(ReferenceSet::new(records))
}
