use std::collections::HashMap;

use crate::core::alignment::AlignmentMap;

/// Number of positions each read aligned to, summed over all references and
/// both strands of one [`AlignmentMap`].
///
/// Derived per alignment run: a read's multiplicity depends on the reference
/// set it was aligned against, so tables are never reused across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiplicityTable {
    counts: HashMap<String, usize>,
}

impl MultiplicityTable {
    pub fn from_alignments(alignments: &AlignmentMap) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (_, reads) in alignments.iter() {
            for (read, positions) in reads {
                *counts.entry(read.clone()).or_insert(0) += positions.len();
            }
        }
        Self { counts }
    }

    /// Multiplicity of `read`, 0 if it never aligned
    pub fn get(&self, read: &str) -> usize {
        self.counts.get(read).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.counts.iter()
    }
}

/// Count how many times each read aligned anywhere in `alignments`
pub fn count_multiplicity(alignments: &AlignmentMap) -> MultiplicityTable {
    MultiplicityTable::from_alignments(alignments)
}
