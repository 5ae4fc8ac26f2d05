//! Centralized validation and input limits.

/// Maximum number of reference records allowed in a single file (DOS protection)
pub const MAX_REFERENCES: usize = 1_000_000;

/// Maximum number of read libraries allowed per condition
pub const MAX_LIBRARIES: usize = 1_000;

/// Check if adding another reference would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_reference_limit(records.len()).is_some() {
///     return Err(...);
/// }
/// records.push(new_record); // Safe to add
/// ```
#[must_use]
pub fn check_reference_limit(count: usize) -> Option<String> {
    if count >= MAX_REFERENCES {
        Some(format!(
            "Too many references: adding another would exceed maximum of {MAX_REFERENCES}"
        ))
    } else {
        None
    }
}

/// Check whether `count` read libraries exceed the per-condition maximum.
#[must_use]
pub fn check_library_limit(count: usize) -> Option<String> {
    if count > MAX_LIBRARIES {
        Some(format!(
            "Too many read libraries: {count} exceeds maximum of {MAX_LIBRARIES}"
        ))
    } else {
        None
    }
}

/// Validate that a sequence only uses the uppercase `ACGTN` alphabet.
///
/// # Examples
///
/// ```
/// use srna_quant::utils::validation::is_nucleotide_sequence;
///
/// assert!(is_nucleotide_sequence("ACGTN"));
/// assert!(is_nucleotide_sequence(""));
/// assert!(!is_nucleotide_sequence("ACGU"));
/// ```
#[must_use]
pub fn is_nucleotide_sequence(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Input validation error types
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid read length range: min {min} is greater than max {max}")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("Alignment length must be positive")]
    ZeroLength,

    #[error("Alignment length {length} is outside the read length range {min}-{max}")]
    LengthOutOfRange { length: usize, min: usize, max: usize },

    #[error("At least one alignment length is required")]
    NoLengths,

    #[error("Minimum read count must be a finite, non-negative number: {0}")]
    InvalidMinCount(f64),
}

/// Validate the read length range used when loading libraries.
///
/// # Errors
///
/// Returns `ValidationError::InvalidLengthRange` if `min > max`.
pub fn validate_length_range(min: usize, max: usize) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::InvalidLengthRange { min, max });
    }
    Ok(())
}

/// Validate the alignment lengths requested on the command line.
///
/// Every length must be positive and lie within the loaded read length range,
/// otherwise no read could ever align at that length.
///
/// # Errors
///
/// Returns `ValidationError::NoLengths`, `ValidationError::ZeroLength` or
/// `ValidationError::LengthOutOfRange`.
pub fn validate_lengths(lengths: &[usize], min: usize, max: usize) -> Result<(), ValidationError> {
    if lengths.is_empty() {
        return Err(ValidationError::NoLengths);
    }
    for &length in lengths {
        if length == 0 {
            return Err(ValidationError::ZeroLength);
        }
        if !(min..=max).contains(&length) {
            return Err(ValidationError::LengthOutOfRange { length, min, max });
        }
    }
    Ok(())
}

/// Validate a minimum read count.
///
/// # Errors
///
/// Returns `ValidationError::InvalidMinCount` for negative, NaN or infinite values.
pub fn validate_min_count(min_count: f64) -> Result<(), ValidationError> {
    if min_count.is_finite() && min_count >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidMinCount(min_count))
    }
}
