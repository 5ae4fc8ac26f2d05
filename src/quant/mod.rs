//! Alignment and quantification engine.
//!
//! - [`Aligner`]: exact fixed-window matching on both strands of every reference
//! - [`MultiplicityTable`]: how many positions each read aligned to
//! - [`quantify`]: one statistic per reference, optionally splitting reads
//!   over their loci
//! - [`Profiler`]: position-resolved alignments per reference
//! - [`compare`]: two conditions paired on shared references
//! - [`align_mirnas`], [`mirna_compare`]: exact mature-sequence lookup
//!
//! ## Concurrency
//!
//! Alignment and profiling run one unit of work per reference on
//! [`pool::fan_out_fan_in`]. The read table and the reference set are shared
//! read-only by all workers; each result is handed to a single collector.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use srna_quant::core::abundance::ReadAbundanceTable;
//! use srna_quant::core::reference::{ReferenceRecord, ReferenceSet};
//! use srna_quant::core::types::{Abundance, CountMode};
//! use srna_quant::quant::{quantify, Aligner};
//!
//! let table = ReadAbundanceTable::new(HashMap::from([
//!     ("AAAA".to_string(), Abundance::summary(10.0, 0.0)),
//! ]))
//! .unwrap();
//! let refs = ReferenceSet::new(vec![ReferenceRecord::new("r", "AAAAA")]);
//!
//! let alignments = Aligner::new(&table).align(&refs, 4).unwrap();
//! let stats = quantify(&alignments, &table, CountMode::NoSplit).unwrap();
//! assert_eq!(stats["r"], Abundance::summary(20.0, 0.0));
//! ```
//!
//! [`Aligner`]: aligner::Aligner
//! [`MultiplicityTable`]: multiplicity::MultiplicityTable
//! [`quantify`]: quantify::quantify
//! [`Profiler`]: profile::Profiler
//! [`compare`]: compare::compare
//! [`align_mirnas`]: mirna::align_mirnas
//! [`mirna_compare`]: mirna::mirna_compare

pub mod aligner;
pub mod compare;
pub mod mirna;
pub mod multiplicity;
pub mod pool;
pub mod profile;
pub mod quantify;

pub use aligner::{align_reads, Aligner};
pub use compare::{compare, ComparisonMap};
pub use mirna::{align_mirnas, mirna_compare, MirnaHit, MirnaMap};
pub use multiplicity::{count_multiplicity, MultiplicityTable};
pub use pool::{PoolConfig, PoolError};
pub use profile::{profile_alignments, ProfileMap, Profiler};
pub use quantify::{quantify, QuantMap};
