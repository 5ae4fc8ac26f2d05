use std::collections::HashMap;

use tracing::debug;

use crate::core::error::QuantError;
use crate::core::types::PairedRecord;
use crate::quant::quantify::QuantMap;

/// Reference header -> both conditions side by side
pub type ComparisonMap = HashMap<String, PairedRecord>;

/// Pair two conditions' statistics on the references quantified in both.
///
/// References present in only one condition are dropped.
///
/// # Errors
///
/// Returns `QuantError::TagMismatch` if the two maps use different abundance
/// representations for a shared reference.
pub fn compare(a: &QuantMap, b: &QuantMap) -> Result<ComparisonMap, QuantError> {
    let mut paired = ComparisonMap::new();
    for (header, stat_a) in a {
        if let Some(stat_b) = b.get(header) {
            paired.insert(header.clone(), PairedRecord::pair(stat_a, stat_b)?);
        }
    }

    debug!(
        condition_a = a.len(),
        condition_b = b.len(),
        shared = paired.len(),
        "Conditions paired"
    );
    Ok(paired)
}
