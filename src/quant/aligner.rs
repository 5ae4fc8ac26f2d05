use std::time::Instant;

use tracing::{debug, info};

use crate::core::abundance::ReadAbundanceTable;
use crate::core::alignment::{AlignmentMap, Position, ReadAlignments};
use crate::core::error::QuantError;
use crate::core::reference::{ReferenceRecord, ReferenceSet};
use crate::quant::pool::{fan_out_fan_in, PoolConfig};

#[inline]
fn to_position(offset: usize) -> Position {
    #[allow(clippy::cast_possible_wrap)]
    {
        offset as Position
    }
}

/// Exact-match scanner mapping a read abundance table onto reference sequences
pub struct Aligner<'a> {
    table: &'a ReadAbundanceTable,
    config: PoolConfig,
}

impl<'a> Aligner<'a> {
    /// Create an aligner with the default pool configuration
    pub fn new(table: &'a ReadAbundanceTable) -> Self {
        Self {
            table,
            config: PoolConfig::default(),
        }
    }

    /// Create an aligner with a custom pool configuration
    pub fn with_config(table: &'a ReadAbundanceTable, config: PoolConfig) -> Self {
        Self { table, config }
    }

    /// Align every `window`-length read in the table to every reference, in
    /// both orientations.
    ///
    /// Each reference is an independent unit of work on the pool. References
    /// without a match are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `QuantError::InvalidWindow` for a zero window, or
    /// `QuantError::Pool` if a worker fails.
    pub fn align(&self, refs: &ReferenceSet, window: usize) -> Result<AlignmentMap, QuantError> {
        if window == 0 {
            return Err(QuantError::InvalidWindow(window));
        }
        let start = Instant::now();
        let table = self.table;

        let units: Vec<&ReferenceRecord> = refs.iter().collect();
        let alignments = fan_out_fan_in(
            units,
            &self.config,
            |record| {
                let alignments = align_reference(table, record, window);
                (record.header.clone(), alignments)
            },
            AlignmentMap::new(),
            |map, (header, alignments)| map.insert(header, alignments),
        )?;

        info!(
            window,
            references = refs.len(),
            aligned_references = alignments.len(),
            elapsed = ?start.elapsed(),
            "Read set aligned to references"
        );
        Ok(alignments)
    }
}

/// Align reads of length `window` to the reference set.
///
/// # Errors
///
/// See [`Aligner::align`].
pub fn align_reads(
    table: &ReadAbundanceTable,
    refs: &ReferenceSet,
    window: usize,
    config: &PoolConfig,
) -> Result<AlignmentMap, QuantError> {
    Aligner::with_config(table, *config).align(refs, window)
}

/// Scan one reference for exact `window`-length matches on both strands.
///
/// For offset `i` the forward hit is recorded as `i + 1` and the reverse
/// complement hit as `-(1 + len - i - window)`. A reference shorter than the
/// window is never scanned.
pub fn align_reference(
    table: &ReadAbundanceTable,
    record: &ReferenceRecord,
    window: usize,
) -> ReadAlignments {
    let mut alignments = ReadAlignments::new();
    let ref_len = record.len();
    let offsets = (ref_len + 1).saturating_sub(window);

    for i in 0..offsets {
        if let Some(fwd) = record.forward.get(i..i + window) {
            if table.contains(fwd) {
                alignments
                    .entry(fwd.to_string())
                    .or_default()
                    .push(to_position(i) + 1);
            }
        }
        if let Some(rvs) = record.reverse_complement.get(i..i + window) {
            if table.contains(rvs) {
                alignments
                    .entry(rvs.to_string())
                    .or_default()
                    .push(-1 - to_position(ref_len - i - window));
            }
        }
    }

    if !alignments.is_empty() {
        debug!(
            reference = %record.header,
            reads = alignments.len(),
            "Reference has alignments"
        );
    }
    alignments
}
