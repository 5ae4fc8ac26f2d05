use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reverse complement a nucleotide sequence.
///
/// A and T, C and G are swapped; N and any base outside the alphabet become N.
pub fn reverse_complement(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'C' => 'G',
            b'G' => 'C',
            b'T' => 'A',
            _ => 'N',
        })
        .collect()
}

/// A reference sequence with its precomputed reverse complement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Sequence name, unique within a [`ReferenceSet`]
    pub header: String,

    /// Forward strand, uppercase
    pub forward: String,

    /// Reverse complement of `forward`, same length
    pub reverse_complement: String,
}

impl ReferenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        let forward = sequence.into();
        let reverse_complement = reverse_complement(&forward);
        Self {
            header: header.into(),
            forward,
            reverse_complement,
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Ordered collection of reference sequences.
///
/// Order is significant for output; headers are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub records: Vec<ReferenceRecord>,
}

impl ReferenceSet {
    #[must_use]
    pub fn new(records: Vec<ReferenceRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, header: &str) -> Option<&ReferenceRecord> {
        self.records.iter().find(|r| r.header == header)
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a ReferenceRecord;
    type IntoIter = std::slice::Iter<'a, ReferenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A known mature miRNA sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirnaReference {
    /// Mature sequence, uppercase DNA alphabet
    pub sequence: String,

    /// Number of reference entries sharing this exact sequence
    pub duplication_weight: f64,
}

impl MirnaReference {
    pub fn new(sequence: impl Into<String>, duplication_weight: f64) -> Self {
        Self {
            sequence: sequence.into(),
            duplication_weight,
        }
    }
}

/// Known miRNAs keyed by header
pub type MirnaReferenceSet = HashMap<String, MirnaReference>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("ACGTN"), "NACGT");
        assert_eq!(reverse_complement("AAAC"), "GTTT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        for seq in ["ACGT", "GGGGTAAAAC", "NNACN", "TTTTTTTTTTTTTTTTTTTTTTTTT"] {
            assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
        }
    }

    #[test]
    fn test_reference_record() {
        let record = ReferenceRecord::new(
            "ref_2",
            "GGGGGGGGGGGGGGGGGGGGGGGGTAAAAAAAAAAAAAAAAAAAAAAAAG",
        );
        assert_eq!(record.len(), 50);
        assert_eq!(
            record.reverse_complement,
            "CTTTTTTTTTTTTTTTTTTTTTTTTACCCCCCCCCCCCCCCCCCCCCCCC"
        );
    }

    #[test]
    fn test_reference_set_lookup() {
        let set = ReferenceSet::new(vec![
            ReferenceRecord::new("a", "ACGT"),
            ReferenceRecord::new("b", "GG"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("b").map(ReferenceRecord::len), Some(2));
        assert!(set.get("c").is_none());
        assert_eq!(
            set.iter().map(|r| r.header.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
