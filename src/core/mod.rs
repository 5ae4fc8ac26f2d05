//! Core data types for small RNA quantification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Abundance`]: Summary (mean + standard error) or per-library counts
//! - [`ReadAbundanceTable`]: Read sequence to abundance, shared read-only by all workers
//! - [`ReferenceRecord`], [`ReferenceSet`]: Reference sequences with reverse complements
//! - [`AlignmentMap`]: Signed positions of every matched read, per reference
//! - [`SingleAlignment`]: One position- and strand-resolved alignment
//! - [`PairedRecord`]: Two conditions' statistics side by side
//!
//! ## Position Convention
//!
//! | Sign | Strand | Magnitude |
//! |------|--------|-----------|
//! | `+`  | forward | 1-based start of the window on the forward strand |
//! | `-`  | reverse complement | `1 + (ref_len - offset - window)`, from the forward 5' end |
//!
//! [`Abundance`]: types::Abundance
//! [`ReadAbundanceTable`]: abundance::ReadAbundanceTable
//! [`ReferenceRecord`]: reference::ReferenceRecord
//! [`ReferenceSet`]: reference::ReferenceSet
//! [`AlignmentMap`]: alignment::AlignmentMap
//! [`SingleAlignment`]: alignment::SingleAlignment
//! [`PairedRecord`]: types::PairedRecord

pub mod abundance;
pub mod alignment;
pub mod error;
pub mod reference;
pub mod types;
