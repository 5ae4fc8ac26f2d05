//! # srna-quant
//!
//! A library for aligning and quantifying small RNA sequencing reads.
//!
//! Small RNA libraries are usually summarized as collapsed read counts. `srna-quant`
//! matches every distinct read of a chosen length exactly against a set of reference
//! sequences, on both strands, and turns the matches into normalized abundances.
//!
//! ## Features
//!
//! - **Exact matching**: Fixed-window lookup on the forward and reverse-complement strands
//! - **Multi-mapping aware**: Reads can be split evenly across every locus they hit
//! - **Replicate statistics**: Mean and standard error over libraries, or raw per-library columns
//! - **Profiles**: Position- and strand-resolved alignments along each reference
//! - **Comparisons**: Two conditions side by side on shared references or known miRNAs
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use srna_quant::core::types::{AbundanceKind, CountMode};
//! use srna_quant::parsing::reads::{load_read_libraries, LoadConfig};
//! use srna_quant::parsing::reference::load_references;
//! use srna_quant::quant::{align_reads, quantify, PoolConfig};
//!
//! let pool = PoolConfig::default();
//! let reads = vec![PathBuf::from("rep1.fa"), PathBuf::from("rep2.fa")];
//! let table =
//!     load_read_libraries(&reads, &LoadConfig::default(), AbundanceKind::Summary, &pool).unwrap();
//! let refs = load_references(Path::new("refs.fa")).unwrap();
//!
//! let alignments = align_reads(&table, &refs, 24, &pool).unwrap();
//! for (header, stat) in quantify(&alignments, &table, CountMode::Split).unwrap() {
//!     println!("{header}: {stat:?}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Abundances, references, alignments and error types
//! - [`parsing`]: Read library and reference loaders
//! - [`quant`]: Alignment, quantification, profiling and comparison
//! - [`output`]: CSV and JSON writers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod output;
pub mod parsing;
pub mod quant;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::abundance::ReadAbundanceTable;
pub use core::alignment::{AlignmentMap, SingleAlignment};
pub use core::error::QuantError;
pub use core::reference::{ReferenceRecord, ReferenceSet};
pub use core::types::*;
pub use quant::{Aligner, Profiler};
