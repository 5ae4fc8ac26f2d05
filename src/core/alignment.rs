use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::core::types::{Abundance, Strand};

/// Signed alignment position.
///
/// Positive `p`: forward-strand match starting at 1-based offset `p`.
/// Negative `p`: reverse-complement match, `|p|` measured from the forward
/// 5' end of the reference.
pub type Position = i64;

/// Read sequence -> positions where it matched within one reference
pub type ReadAlignments = BTreeMap<String, Vec<Position>>;

/// Reference header -> read alignments.
///
/// References without any match are absent, never present with an empty entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentMap {
    references: HashMap<String, ReadAlignments>,
}

impl AlignmentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reference's alignments. Empty alignment sets are ignored.
    pub fn insert(&mut self, header: impl Into<String>, alignments: ReadAlignments) {
        if !alignments.is_empty() {
            self.references.insert(header.into(), alignments);
        }
    }

    pub fn get(&self, header: &str) -> Option<&ReadAlignments> {
        self.references.get(header)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.references.contains_key(header)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ReadAlignments)> {
        self.references.iter()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Total number of recorded positions across all references and reads
    pub fn alignment_count(&self) -> usize {
        self.references
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

impl FromIterator<(String, ReadAlignments)> for AlignmentMap {
    fn from_iter<I: IntoIterator<Item = (String, ReadAlignments)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (header, alignments) in iter {
            map.insert(header, alignments);
        }
        map
    }
}

/// One read aligned at one position of a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleAlignment {
    /// Aligned read sequence
    pub read: String,

    /// Number of positions the read aligned to across the whole reference set
    pub times_aligned: usize,

    /// 1-based position from the forward 5' end of the reference
    pub position: u64,

    pub strand: Strand,

    /// Read abundance, divided by `times_aligned` when counts are split
    pub abundance: Abundance,
}
