use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::abundance::ReadAbundanceTable;
use crate::core::error::QuantError;
use crate::core::reference::MirnaReferenceSet;
use crate::core::types::{Abundance, CountMode, PairedRecord};
use crate::quant::compare::ComparisonMap;

/// A mature sequence found verbatim in the read table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirnaHit {
    pub abundance: Abundance,
    /// Number of reference entries sharing this exact sequence
    pub duplication_weight: f64,
}

impl MirnaHit {
    /// Abundance as reported for `mode`
    pub fn reported(&self, mode: CountMode) -> Abundance {
        match mode {
            CountMode::Split => self.abundance.divided_by(self.duplication_weight.max(1.0)),
            CountMode::NoSplit => self.abundance.clone(),
        }
    }
}

/// Mirna header -> exact hit
pub type MirnaMap = HashMap<String, MirnaHit>;

/// Look up every mirna sequence in `table`, full length and sense strand only.
///
/// Entries without an exact hit are absent.
pub fn align_mirnas(table: &ReadAbundanceTable, mirnas: &MirnaReferenceSet) -> MirnaMap {
    let hits: MirnaMap = mirnas
        .iter()
        .filter_map(|(header, mirna)| {
            table.get(&mirna.sequence).map(|abundance| {
                (
                    header.clone(),
                    MirnaHit {
                        abundance: abundance.clone(),
                        duplication_weight: mirna.duplication_weight,
                    },
                )
            })
        })
        .collect();

    debug!(mirnas = mirnas.len(), hits = hits.len(), "Mirna lookup finished");
    hits
}

/// Pair two conditions' mirna hits on shared headers.
///
/// In [`CountMode::Split`] each side is divided by its own duplication
/// weight before pairing.
///
/// # Errors
///
/// Returns `QuantError::TagMismatch` if the conditions use different
/// abundance representations.
pub fn mirna_compare(a: &MirnaMap, b: &MirnaMap, mode: CountMode) -> Result<ComparisonMap, QuantError> {
    let mut paired = ComparisonMap::new();
    for (header, hit_a) in a {
        if let Some(hit_b) = b.get(header) {
            let record = PairedRecord::pair(&hit_a.reported(mode), &hit_b.reported(mode))?;
            paired.insert(header.clone(), record);
        }
    }
    Ok(paired)
}
