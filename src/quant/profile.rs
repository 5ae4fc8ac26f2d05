use std::collections::HashMap;
use std::time::Instant;

use tracing::{info, warn};

use crate::core::abundance::ReadAbundanceTable;
use crate::core::alignment::{AlignmentMap, ReadAlignments, SingleAlignment};
use crate::core::error::QuantError;
use crate::core::types::{count_to_f64, CountMode, Strand};
use crate::quant::multiplicity::MultiplicityTable;
use crate::quant::pool::{fan_out_fan_in, PoolConfig};

/// Reference header -> alignments sorted by position
pub type ProfileMap = HashMap<String, Vec<SingleAlignment>>;

/// Expands an alignment map into position-resolved records per reference
pub struct Profiler<'a> {
    table: &'a ReadAbundanceTable,
    config: PoolConfig,
}

impl<'a> Profiler<'a> {
    pub fn new(table: &'a ReadAbundanceTable) -> Self {
        Self {
            table,
            config: PoolConfig::default(),
        }
    }

    pub fn with_config(table: &'a ReadAbundanceTable, config: PoolConfig) -> Self {
        Self { table, config }
    }

    /// Emit one [`SingleAlignment`] per recorded position of every reference.
    ///
    /// Each reference is profiled on the pool. Within a reference, records
    /// are sorted by position; records sharing a position keep read order.
    ///
    /// # Errors
    ///
    /// Returns the first `QuantError` raised by any reference, or
    /// `QuantError::Pool` if a worker fails.
    pub fn profile(
        &self,
        alignments: &AlignmentMap,
        mode: CountMode,
    ) -> Result<ProfileMap, QuantError> {
        let start = Instant::now();
        let multiplicity = MultiplicityTable::from_alignments(alignments);
        let table = self.table;
        let multiplicity = &multiplicity;

        let units: Vec<(&String, &ReadAlignments)> = alignments.iter().collect();
        let (profiles, errors) = fan_out_fan_in(
            units,
            &self.config,
            |(header, reads)| {
                let result = profile_reference(reads, table, multiplicity, mode);
                (header.clone(), result)
            },
            (ProfileMap::new(), Vec::new()),
            |(profiles, errors), (header, result)| match result {
                Ok(records) => {
                    profiles.insert(header, records);
                }
                Err(e) => errors.push(e),
            },
        )?;

        if let Some(first) = errors.into_iter().next() {
            warn!(error = %first, "Profiling failed");
            return Err(first);
        }

        info!(
            mode = ?mode,
            references = profiles.len(),
            elapsed = ?start.elapsed(),
            "Alignment profiles built"
        );
        Ok(profiles)
    }
}

/// Profile an alignment map with an explicit pool configuration.
///
/// # Errors
///
/// See [`Profiler::profile`].
pub fn profile_alignments(
    alignments: &AlignmentMap,
    table: &ReadAbundanceTable,
    mode: CountMode,
    config: &PoolConfig,
) -> Result<ProfileMap, QuantError> {
    Profiler::with_config(table, *config).profile(alignments, mode)
}

/// Expand one reference's reads into position-sorted records.
///
/// # Errors
///
/// Returns `QuantError::UnknownRead` if a read is missing from `table`.
pub fn profile_reference(
    reads: &ReadAlignments,
    table: &ReadAbundanceTable,
    multiplicity: &MultiplicityTable,
    mode: CountMode,
) -> Result<Vec<SingleAlignment>, QuantError> {
    let mut records = Vec::new();

    for (read, positions) in reads {
        let abundance = table
            .get(read)
            .ok_or_else(|| QuantError::UnknownRead(read.clone()))?;
        let times_aligned = multiplicity.get(read).max(positions.len());
        let abundance = match mode {
            CountMode::Split => abundance.divided_by(count_to_f64(times_aligned.max(1))),
            CountMode::NoSplit => abundance.clone(),
        };

        for &position in positions {
            records.push(SingleAlignment {
                read: read.clone(),
                times_aligned,
                position: position.unsigned_abs(),
                strand: Strand::from_position(position),
                abundance: abundance.clone(),
            });
        }
    }

    // stable: ties stay in read order
    records.sort_by_key(|r| r.position);
    Ok(records)
}
