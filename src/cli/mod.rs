//! Command-line interface for srna-quant.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **profile**: Position-resolved alignments of one condition, per read length
//! - **compare**: Per-reference counts of two conditions side by side, per read length
//! - **mirna**: Exact mature miRNA counts of two conditions side by side
//!
//! ## Usage
//!
//! ```text
//! # Profile 21, 22 and 24 nt reads against a reference set
//! srna-quant profile --reads rep1.fa rep2.fa --ref refs.fa --lengths 21,22,24 --out out/wt
//!
//! # Compare two conditions, keeping one column per library
//! srna-quant compare --reads1 wt1.fa wt2.fa --reads2 mut1.fa mut2.fa \
//!     --ref refs.fa --lengths 21 --out out/wt_v_mut --per-library
//!
//! # Known miRNAs, JSON output
//! srna-quant mirna --reads1 wt1.fa --reads2 mut1.fa --mirnas mature.fa --out out/mir --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::types::{AbundanceKind, CountMode};
use crate::output::Layout;
use crate::parsing::reads::{library_name, LoadConfig, ReadFormat};
use crate::quant::pool::PoolConfig;
use crate::utils::validation::{validate_length_range, validate_min_count};

pub use crate::output::OutputFormat;

pub mod compare;
pub mod mirna;
pub mod profile;

#[derive(Parser)]
#[command(name = "srna-quant")]
#[command(version)]
#[command(about = "Align and quantify small RNA reads against reference sequences")]
#[command(
    long_about = "srna-quant aligns collapsed or raw small RNA reads to reference sequences by exact fixed-length matching on both strands.\n\nIt provides:\n- Position-resolved alignment profiles\n- Per-reference counts for two conditions, side by side\n- Exact mature miRNA counts\n\nMulti-mapping reads are split across their loci unless --no-split is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "csv")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile read alignments of one condition along each reference
    Profile(profile::ProfileArgs),

    /// Compare per-reference counts of two conditions
    Compare(compare::CompareArgs),

    /// Compare exact mature miRNA counts of two conditions
    Mirna(mirna::MirnaArgs),
}

/// Read loading and counting options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Read file format
    #[arg(long, value_enum, default_value = "cfa")]
    pub read_format: ReadFormat,

    /// 3' adapter to trim from FASTA/FASTQ reads
    #[arg(long)]
    pub adapter: Option<String>,

    /// Minimum read length
    #[arg(long, default_value = "18")]
    pub min_len: usize,

    /// Maximum read length
    #[arg(long, default_value = "32")]
    pub max_len: usize,

    /// Minimum raw read count in a library
    #[arg(long, default_value = "1.0")]
    pub min_count: f64,

    /// Give every alignment of a multi-mapping read its full count
    #[arg(long)]
    pub no_split: bool,

    /// Report one count per library instead of mean and standard error
    #[arg(long)]
    pub per_library: bool,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

impl LoadArgs {
    /// Validated loader configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted length range or an invalid minimum count.
    pub fn load_config(&self) -> anyhow::Result<LoadConfig> {
        validate_length_range(self.min_len, self.max_len)?;
        validate_min_count(self.min_count)?;
        Ok(LoadConfig {
            read_format: self.read_format,
            adapter: self.adapter.clone(),
            min_len: self.min_len,
            max_len: self.max_len,
            min_count: self.min_count,
        })
    }

    pub fn count_mode(&self) -> CountMode {
        if self.no_split {
            CountMode::NoSplit
        } else {
            CountMode::Split
        }
    }

    pub fn abundance_kind(&self) -> AbundanceKind {
        if self.per_library {
            AbundanceKind::PerLibrary
        } else {
            AbundanceKind::Summary
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        self.threads
            .map_or_else(PoolConfig::default, PoolConfig::with_threads)
    }

    /// Output columns for the given read files, in order
    pub fn layout(&self, files: &[&[PathBuf]]) -> Layout {
        match self.abundance_kind() {
            AbundanceKind::Summary => Layout::Summary,
            AbundanceKind::PerLibrary => Layout::PerLibrary(
                files
                    .iter()
                    .flat_map(|group| group.iter())
                    .map(|path| library_name(path))
                    .collect(),
            ),
        }
    }
}
