use thiserror::Error;

use crate::core::types::AbundanceKind;
use crate::quant::pool::PoolError;

/// Failures raised by the alignment and quantification engine.
///
/// The engine only sees already-loaded inputs, so these are contract
/// violations rather than data errors. They are returned to the caller and
/// never terminate the process.
#[derive(Error, Debug)]
pub enum QuantError {
    #[error("Abundance representation mismatch: expected {expected}, found {found}")]
    TagMismatch {
        expected: AbundanceKind,
        found: AbundanceKind,
    },

    #[error("Library count mismatch: expected {expected} libraries, found {found}")]
    LibraryCountMismatch { expected: usize, found: usize },

    #[error("Aligned read {0} is missing from the abundance table")]
    UnknownRead(String),

    #[error("Invalid alignment window length: {0}")]
    InvalidWindow(usize),

    #[error("Worker pool failure: {0}")]
    Pool(#[from] PoolError),
}
