use serde::{Deserialize, Serialize};

use crate::core::error::QuantError;

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Normalised mean count and its standard error across libraries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanSe {
    pub mean: f64,
    pub se: f64,
}

impl MeanSe {
    pub fn new(mean: f64, se: f64) -> Self {
        Self { mean, se }
    }
}

/// Which representation an abundance value uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbundanceKind {
    /// Cross-library mean and standard error
    Summary,
    /// One normalised count per input library
    PerLibrary,
}

impl std::fmt::Display for AbundanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::PerLibrary => write!(f, "per-library"),
        }
    }
}

/// Abundance of a read, or of everything aligned to a reference.
///
/// Exactly one variant is used throughout a single run. Aggregation code
/// matches on the variant once per unit of work; mixing the two is a
/// [`QuantError::TagMismatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Abundance {
    Summary(MeanSe),
    PerLibrary(Vec<f64>),
}

/// Abundance of a single read sequence
pub type ReadAbundance = Abundance;

/// Aggregated abundance of the reads aligned to one reference
pub type ReferenceStat = Abundance;

impl Abundance {
    pub fn summary(mean: f64, se: f64) -> Self {
        Self::Summary(MeanSe::new(mean, se))
    }

    pub fn per_library(counts: impl Into<Vec<f64>>) -> Self {
        Self::PerLibrary(counts.into())
    }

    pub fn kind(&self) -> AbundanceKind {
        match self {
            Self::Summary(_) => AbundanceKind::Summary,
            Self::PerLibrary(_) => AbundanceKind::PerLibrary,
        }
    }

    /// Number of libraries carried, `None` for summary values
    pub fn library_count(&self) -> Option<usize> {
        match self {
            Self::Summary(_) => None,
            Self::PerLibrary(counts) => Some(counts.len()),
        }
    }

    /// Divide every component (mean, standard error, or each library count)
    #[must_use]
    pub fn divided_by(&self, divisor: f64) -> Self {
        match self {
            Self::Summary(ms) => Self::summary(ms.mean / divisor, ms.se / divisor),
            Self::PerLibrary(counts) => {
                Self::PerLibrary(counts.iter().map(|c| c / divisor).collect())
            }
        }
    }
}

/// Strand of a single alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Positive alignment positions are forward-strand hits, negative ones
    /// are reverse-complement hits.
    pub fn from_position(position: i64) -> Self {
        if position > 0 {
            Self::Plus
        } else {
            Self::Minus
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// Whether a multiply-aligned read's abundance is split across its loci
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Divide each read's contribution by the number of places it aligned
    #[default]
    Split,
    /// Every alignment carries the read's full abundance
    NoSplit,
}

/// Shape of a paired comparison record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairedKind {
    /// `[mean_a, se_a, mean_b, se_b]`
    Scalar,
    /// Condition A library counts followed by condition B library counts
    Vector,
}

/// Two conditions' statistics for one reference, flattened for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedRecord {
    pub kind: PairedKind,
    pub values: Vec<f64>,
}

impl PairedRecord {
    pub fn scalar(a: MeanSe, b: MeanSe) -> Self {
        Self {
            kind: PairedKind::Scalar,
            values: vec![a.mean, a.se, b.mean, b.se],
        }
    }

    pub fn vector(a: &[f64], b: &[f64]) -> Self {
        let mut values = Vec::with_capacity(a.len() + b.len());
        values.extend_from_slice(a);
        values.extend_from_slice(b);
        Self {
            kind: PairedKind::Vector,
            values,
        }
    }

    /// Pair two statistics of the same representation.
    ///
    /// # Errors
    ///
    /// Returns `QuantError::TagMismatch` if one side is a summary and the
    /// other per-library.
    pub fn pair(a: &Abundance, b: &Abundance) -> Result<Self, QuantError> {
        match (a, b) {
            (Abundance::Summary(a), Abundance::Summary(b)) => Ok(Self::scalar(*a, *b)),
            (Abundance::PerLibrary(a), Abundance::PerLibrary(b)) => Ok(Self::vector(a, b)),
            _ => Err(QuantError::TagMismatch {
                expected: a.kind(),
                found: b.kind(),
            }),
        }
    }
}
