use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use noodles::fasta;
use tracing::{info, warn};

use crate::core::reference::{MirnaReference, MirnaReferenceSet};
use crate::core::types::count_to_f64;
use crate::parsing::{open_reader, ParseError};
use crate::utils::validation::check_reference_limit;

/// Load mature miRNA sequences from a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if parsing fails, `ParseError::InvalidFormat` if no records are found, or
/// `ParseError::TooManyReferences` if the limit is exceeded.
pub fn load_mirna_references(path: &Path) -> Result<MirnaReferenceSet, ParseError> {
    let mirnas = load_mirna_references_from_reader(open_reader(path)?)?;
    info!(file = %path.display(), mirnas = mirnas.len(), "miRNA file processed");
    Ok(mirnas)
}

/// Load mature miRNA sequences from any buffered FASTA source.
///
/// RNA sequences are converted to the DNA alphabet. A header seen twice keeps
/// its first record. Every header whose sequence is shared by `k` kept headers
/// gets duplication weight `k`.
///
/// # Errors
///
/// See [`load_mirna_references`].
pub fn load_mirna_references_from_reader<R: BufRead>(
    reader: R,
) -> Result<MirnaReferenceSet, ParseError> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_reference_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyReferences(entries.len()));
        }

        let header = String::from_utf8_lossy(record.name()).to_string();
        if !seen.insert(header.clone()) {
            warn!(header = %header, "Duplicate miRNA header, keeping the first record");
            continue;
        }
        let sequence = String::from_utf8_lossy(record.sequence().as_ref())
            .to_ascii_uppercase()
            .replace('U', "T");
        entries.push((header, sequence));
    }

    if entries.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in miRNA file".to_string(),
        ));
    }

    let mut shared: HashMap<&str, usize> = HashMap::new();
    for (_, sequence) in &entries {
        *shared.entry(sequence.as_str()).or_insert(0) += 1;
    }

    let mirnas = entries
        .iter()
        .map(|(header, sequence)| {
            let weight = count_to_f64(shared.get(sequence.as_str()).copied().unwrap_or(1));
            (header.clone(), MirnaReference::new(sequence.clone(), weight))
        })
        .collect();
    Ok(mirnas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplication_weights() {
        let content = format!(
            ">mir_1\n{a}\n>mir_2\n{g}\n>mir_3\n{a}\n",
            a = "A".repeat(24),
            g = "G".repeat(24)
        );
        let mirnas = load_mirna_references_from_reader(content.as_bytes()).unwrap();

        assert_eq!(mirnas.len(), 3);
        assert_eq!(mirnas["mir_1"].duplication_weight, 2.0);
        assert_eq!(mirnas["mir_2"].duplication_weight, 1.0);
        assert_eq!(mirnas["mir_3"].duplication_weight, 2.0);
    }

    #[test]
    fn test_duplicate_header_keeps_first() {
        let a = "A".repeat(24);
        let g = "G".repeat(24);

        let repeated = format!(">mir_1\n{a}\n>mir_1\n{a}\n");
        let mirnas = load_mirna_references_from_reader(repeated.as_bytes()).unwrap();
        assert_eq!(mirnas.len(), 1);
        assert_eq!(mirnas["mir_1"].duplication_weight, 1.0);

        let conflicting = format!(">mir_1\n{a}\n>mir_1\n{g}\n>mir_2\n{g}\n");
        let mirnas = load_mirna_references_from_reader(conflicting.as_bytes()).unwrap();
        assert_eq!(mirnas.len(), 2);
        assert_eq!(mirnas["mir_1"].sequence, a);
        assert_eq!(mirnas["mir_1"].duplication_weight, 1.0);
        assert_eq!(mirnas["mir_2"].duplication_weight, 1.0);
    }

    #[test]
    fn test_rna_converted_to_dna() {
        let content = ">hsa-miR-1\nuggaauguaaagaaguauguau\n";
        let mirnas = load_mirna_references_from_reader(content.as_bytes()).unwrap();
        assert_eq!(mirnas["hsa-miR-1"].sequence, "TGGAATGTAAAGAAGTATGTAT");
    }

    #[test]
    fn test_empty_input() {
        let result = load_mirna_references_from_reader(&b""[..]);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }
}
