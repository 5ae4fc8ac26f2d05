use std::collections::HashMap;
use std::time::Instant;

use tracing::info;

use crate::core::abundance::ReadAbundanceTable;
use crate::core::alignment::{AlignmentMap, ReadAlignments};
use crate::core::error::QuantError;
use crate::core::types::{
    count_to_f64, Abundance, AbundanceKind, CountMode, MeanSe, ReferenceStat,
};
use crate::quant::multiplicity::MultiplicityTable;

/// Reference header -> aggregated statistic
pub type QuantMap = HashMap<String, ReferenceStat>;

/// Running total for one reference
enum Accumulator {
    Summary { total: f64, errors: Vec<f64> },
    PerLibrary(Vec<f64>),
}

impl Accumulator {
    fn for_abundance(abundance: &Abundance) -> Self {
        match abundance {
            Abundance::Summary(_) => Self::Summary {
                total: 0.0,
                errors: Vec::new(),
            },
            Abundance::PerLibrary(counts) => Self::PerLibrary(vec![0.0; counts.len()]),
        }
    }

    fn kind(&self) -> AbundanceKind {
        match self {
            Self::Summary { .. } => AbundanceKind::Summary,
            Self::PerLibrary(_) => AbundanceKind::PerLibrary,
        }
    }

    fn add(&mut self, abundance: &Abundance, weight: f64) -> Result<(), QuantError> {
        match (self, abundance) {
            (Self::Summary { total, errors }, Abundance::Summary(ms)) => {
                *total += ms.mean * weight;
                errors.push(ms.se * weight);
                Ok(())
            }
            (Self::PerLibrary(sums), Abundance::PerLibrary(counts)) => {
                if sums.len() != counts.len() {
                    return Err(QuantError::LibraryCountMismatch {
                        expected: sums.len(),
                        found: counts.len(),
                    });
                }
                for (sum, count) in sums.iter_mut().zip(counts) {
                    *sum += count * weight;
                }
                Ok(())
            }
            (acc, other) => Err(QuantError::TagMismatch {
                expected: acc.kind(),
                found: other.kind(),
            }),
        }
    }

    fn finish(self) -> ReferenceStat {
        match self {
            Self::Summary { total, errors } => {
                Abundance::Summary(MeanSe::new(total, root_sum_of_squares(&errors)))
            }
            Self::PerLibrary(sums) => Abundance::PerLibrary(sums),
        }
    }
}

/// Euclidean norm of independent error contributions
fn root_sum_of_squares(errors: &[f64]) -> f64 {
    errors.iter().map(|e| e * e).sum::<f64>().sqrt()
}

/// Reduce each reference's alignments to a single statistic.
///
/// Every recorded position contributes the read's full abundance, or, in
/// [`CountMode::Split`], the abundance divided by the read's multiplicity over
/// the whole alignment map. For summary abundances a read contributes
/// `se * hits [/ multiplicity]` to the error list of a reference, and the
/// reference's standard error is the root of the sum of squares of that list.
/// Per-library abundances are summed component-wise.
///
/// References absent from `alignments` are absent from the result.
///
/// # Errors
///
/// Returns `QuantError::UnknownRead` if an aligned read is missing from
/// `table`, or a mismatch error if abundance representations are mixed.
pub fn quantify(
    alignments: &AlignmentMap,
    table: &ReadAbundanceTable,
    mode: CountMode,
) -> Result<QuantMap, QuantError> {
    let start = Instant::now();
    let multiplicity = match mode {
        CountMode::Split => Some(MultiplicityTable::from_alignments(alignments)),
        CountMode::NoSplit => None,
    };

    let mut stats = QuantMap::with_capacity(alignments.len());
    for (header, reads) in alignments.iter() {
        if let Some(stat) = quantify_reference(reads, table, multiplicity.as_ref())? {
            stats.insert(header.clone(), stat);
        }
    }

    info!(
        mode = ?mode,
        references = stats.len(),
        elapsed = ?start.elapsed(),
        "Aligned read set quantified"
    );
    Ok(stats)
}

/// Quantify one reference's reads; `None` when no read aligned.
///
/// # Errors
///
/// See [`quantify`].
pub fn quantify_reference(
    reads: &ReadAlignments,
    table: &ReadAbundanceTable,
    multiplicity: Option<&MultiplicityTable>,
) -> Result<Option<ReferenceStat>, QuantError> {
    let mut acc: Option<Accumulator> = None;

    for (read, positions) in reads {
        if positions.is_empty() {
            continue;
        }
        let abundance = table
            .get(read)
            .ok_or_else(|| QuantError::UnknownRead(read.clone()))?;

        let hits = count_to_f64(positions.len());
        let weight = match multiplicity {
            Some(m) => hits / count_to_f64(m.get(read).max(1)),
            None => hits,
        };

        acc.get_or_insert_with(|| Accumulator::for_abundance(abundance))
            .add(abundance, weight)?;
    }

    Ok(acc.map(Accumulator::finish))
}
