use std::collections::HashMap;

use crate::core::error::QuantError;
use crate::core::types::{Abundance, AbundanceKind};

/// Immutable mapping from read sequence to its abundance.
///
/// All entries share one [`AbundanceKind`], and per-library entries all carry
/// the same number of libraries. Both invariants are checked on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadAbundanceTable {
    reads: HashMap<String, Abundance>,
    kind: Option<AbundanceKind>,
    libraries: Option<usize>,
}

impl ReadAbundanceTable {
    /// Build a table from read sequences and their abundances.
    ///
    /// # Errors
    ///
    /// Returns `QuantError::TagMismatch` if summary and per-library values are
    /// mixed, or `QuantError::LibraryCountMismatch` if per-library vectors
    /// differ in length.
    pub fn new(reads: HashMap<String, Abundance>) -> Result<Self, QuantError> {
        let mut kind = None;
        let mut libraries = None;

        for abundance in reads.values() {
            match kind {
                None => {
                    kind = Some(abundance.kind());
                    libraries = abundance.library_count();
                }
                Some(expected) if expected != abundance.kind() => {
                    return Err(QuantError::TagMismatch {
                        expected,
                        found: abundance.kind(),
                    });
                }
                Some(_) => {
                    if let (Some(expected), Some(found)) = (libraries, abundance.library_count()) {
                        if expected != found {
                            return Err(QuantError::LibraryCountMismatch { expected, found });
                        }
                    }
                }
            }
        }

        Ok(Self {
            reads,
            kind,
            libraries,
        })
    }

    pub fn get(&self, read: &str) -> Option<&Abundance> {
        self.reads.get(read)
    }

    pub fn contains(&self, read: &str) -> bool {
        self.reads.contains_key(read)
    }

    /// Representation shared by every entry, `None` for an empty table
    pub fn kind(&self) -> Option<AbundanceKind> {
        self.kind
    }

    /// Number of libraries per entry for per-library tables
    pub fn library_count(&self) -> Option<usize> {
        self.libraries
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Abundance)> {
        self.reads.iter()
    }
}
