//! Small RNA read library loader.
//!
//! Each library is reduced to distinct read sequences with their counts,
//! normalised to reads per million, and the libraries of one condition are
//! combined into a single [`ReadAbundanceTable`].
//!
//! Supported formats:
//! - collapsed FASTA (`cfa`): one record per distinct read, header `>id-count`
//! - raw FASTA (`fa`) and FASTQ (`fq`): every record counts once, with
//!   optional 3' adapter trimming

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use noodles::{fasta, fastq};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::abundance::ReadAbundanceTable;
use crate::core::types::{count_to_f64, Abundance, AbundanceKind, MeanSe};
use crate::parsing::{open_reader, ParseError};
use crate::quant::pool::{fan_out_fan_in, PoolConfig, PoolError};
use crate::utils::validation::check_library_limit;

/// Longest adapter prefix used as a trimming seed
const MAX_SEED_LEN: usize = 11;

/// Read library file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFormat {
    /// Collapsed FASTA with `>id-count` headers
    #[default]
    Cfa,
    /// FASTA, one record per read
    Fa,
    /// FASTQ, one record per read
    Fq,
}

/// Configuration for loading read libraries
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub read_format: ReadFormat,
    /// 3' adapter to trim from raw FASTA/FASTQ reads
    pub adapter: Option<String>,
    /// Shortest read kept, inclusive
    pub min_len: usize,
    /// Longest read kept, inclusive
    pub max_len: usize,
    /// Minimum raw count for a read to be kept
    pub min_count: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            read_format: ReadFormat::Cfa,
            adapter: None,
            min_len: 18,
            max_len: 32,
            min_count: 1.0,
        }
    }
}

impl LoadConfig {
    fn accepts_len(&self, len: usize) -> bool {
        (self.min_len..=self.max_len).contains(&len)
    }

    /// Uppercased trimming seed, `None` when no adapter is configured
    pub fn seed(&self) -> Option<String> {
        self.adapter
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| adapter_seed(a).to_ascii_uppercase())
    }
}

/// Distinct read sequence -> count within one library
pub type LibraryCounts = HashMap<String, f64>;

/// The first 11 nt of an adapter, or the whole adapter if shorter than 12 nt
pub fn adapter_seed(adapter: &str) -> &str {
    if adapter.len() < MAX_SEED_LEN + 1 {
        adapter
    } else {
        adapter.get(..MAX_SEED_LEN).unwrap_or(adapter)
    }
}

/// 5' part of `read` if `seed` occurs in it exactly once
pub fn trim_adapter<'a>(read: &'a str, seed: &str) -> Option<&'a str> {
    let (five_prime, rest) = read.split_once(seed)?;
    if rest.contains(seed) {
        None
    } else {
        Some(five_prime)
    }
}

/// Scale counts to reads per million of the library total
pub fn rpm_normalize(counts: LibraryCounts) -> LibraryCounts {
    let total: f64 = counts.values().sum();
    counts
        .into_iter()
        .map(|(read, count)| (read, 1_000_000.0 * count / total))
        .collect()
}

/// Mean and standard error of one read over `counts.len()` libraries.
///
/// The standard error is the sample standard deviation over `sqrt(n)`, and 0
/// for a single library.
pub fn mean_se(counts: &[f64]) -> MeanSe {
    let n = count_to_f64(counts.len());
    match counts {
        [] => MeanSe::new(0.0, 0.0),
        [only] => MeanSe::new(*only, 0.0),
        _ => {
            let mean = counts.iter().sum::<f64>() / n;
            let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
            MeanSe::new(mean, variance.sqrt() / n.sqrt())
        }
    }
}

/// Library name used in per-library output columns: the file stem
pub fn library_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".bgz"))
        .unwrap_or(&name);
    Path::new(name)
        .file_stem()
        .map_or_else(|| name.to_string(), |s| s.to_string_lossy().to_string())
}

/// Load one library file and normalise it to reads per million.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// for malformed records, or `ParseError::InvalidFormat` for a collapsed
/// FASTA header without exactly one `-` separated count.
pub fn load_library(path: &Path, config: &LoadConfig) -> Result<LibraryCounts, ParseError> {
    let start = Instant::now();
    let reader = open_reader(path)?;

    let counts = match config.read_format {
        ReadFormat::Cfa => count_collapsed(reader, config)?,
        ReadFormat::Fa => remove_below_min(count_fasta(reader, config)?, config.min_count),
        ReadFormat::Fq => remove_below_min(count_fastq(reader, config)?, config.min_count),
    };
    let counts = rpm_normalize(counts);

    debug!(
        file = %path.display(),
        reads = counts.len(),
        elapsed = ?start.elapsed(),
        "Read library loaded"
    );
    Ok(counts)
}

/// Count a collapsed FASTA library.
///
/// # Errors
///
/// See [`load_library`].
pub fn count_collapsed<R: BufRead>(
    reader: R,
    config: &LoadConfig,
) -> Result<LibraryCounts, ParseError> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut counts = LibraryCounts::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        let mut definition = String::from_utf8_lossy(record.name()).to_string();
        if let Some(description) = record.description() {
            definition.push(' ');
            definition.push_str(&String::from_utf8_lossy(description));
        }
        let count = collapsed_count(&definition)?;

        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_ascii_uppercase();
        if count >= config.min_count && config.accepts_len(sequence.len()) {
            *counts.entry(sequence).or_insert(0.0) += count;
        }
    }
    Ok(counts)
}

/// Raw count from a full collapsed FASTA definition line such as `12-340`
fn collapsed_count(name: &str) -> Result<f64, ParseError> {
    let mut fields = name.split('-');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_), Some(count), None) => count.parse::<f64>().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid read count in collapsed header: {name}"))
        }),
        _ => Err(ParseError::InvalidFormat(format!(
            "Collapsed FASTA header must be '>id-count': {name}"
        ))),
    }
}

/// Count a raw FASTA library.
///
/// # Errors
///
/// See [`load_library`].
pub fn count_fasta<R: BufRead>(reader: R, config: &LoadConfig) -> Result<LibraryCounts, ParseError> {
    let mut reader = fasta::io::Reader::new(reader);
    let seed = config.seed();
    let mut counts = LibraryCounts::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        add_read(&mut counts, record.sequence().as_ref(), seed.as_deref(), config);
    }
    Ok(counts)
}

/// Count a FASTQ library.
///
/// # Errors
///
/// See [`load_library`].
pub fn count_fastq<R: BufRead>(reader: R, config: &LoadConfig) -> Result<LibraryCounts, ParseError> {
    let mut reader = fastq::io::Reader::new(reader);
    let seed = config.seed();
    let mut counts = LibraryCounts::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;
        add_read(&mut counts, record.sequence(), seed.as_deref(), config);
    }
    Ok(counts)
}

fn add_read(counts: &mut LibraryCounts, sequence: &[u8], seed: Option<&str>, config: &LoadConfig) {
    let read = String::from_utf8_lossy(sequence).to_ascii_uppercase();
    let kept = match seed {
        Some(seed) => trim_adapter(&read, seed),
        None => Some(read.as_str()),
    };
    if let Some(kept) = kept.filter(|r| config.accepts_len(r.len())) {
        *counts.entry(kept.to_string()).or_insert(0.0) += 1.0;
    }
}

/// Drop reads seen fewer than `min_count` times; a no-op unless `min_count > 1`
fn remove_below_min(mut counts: LibraryCounts, min_count: f64) -> LibraryCounts {
    if min_count > 1.0 {
        counts.retain(|_, count| *count >= min_count);
    }
    counts
}

/// Merge normalised libraries, in input order, into one abundance table.
///
/// A read missing from a library counts as 0 in that library.
///
/// # Errors
///
/// Returns `ParseError::Quant` if the combined table is inconsistent.
pub fn combine_libraries(
    libraries: &[LibraryCounts],
    kind: AbundanceKind,
) -> Result<ReadAbundanceTable, ParseError> {
    let n = libraries.len();
    let mut per_read: HashMap<String, Vec<f64>> = HashMap::new();
    for (i, library) in libraries.iter().enumerate() {
        for (read, count) in library {
            per_read.entry(read.clone()).or_insert_with(|| vec![0.0; n])[i] = *count;
        }
    }

    let reads = per_read
        .into_iter()
        .map(|(read, counts)| {
            let abundance = match kind {
                AbundanceKind::Summary => Abundance::Summary(mean_se(&counts)),
                AbundanceKind::PerLibrary => Abundance::PerLibrary(counts),
            };
            (read, abundance)
        })
        .collect();

    Ok(ReadAbundanceTable::new(reads)?)
}

/// Load every library of one condition on the pool and combine them.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if no files are given,
/// `ParseError::TooManyLibraries` above the library limit, or the first error
/// raised while loading a file.
pub fn load_read_libraries(
    files: &[PathBuf],
    config: &LoadConfig,
    kind: AbundanceKind,
    pool: &PoolConfig,
) -> Result<ReadAbundanceTable, ParseError> {
    if files.is_empty() {
        return Err(ParseError::InvalidFormat(
            "At least one read file is required".to_string(),
        ));
    }
    if check_library_limit(files.len()).is_some() {
        return Err(ParseError::TooManyLibraries(files.len()));
    }
    let start = Instant::now();

    let units: Vec<(usize, &PathBuf)> = files.iter().enumerate().collect();
    let slots: Vec<Option<Result<LibraryCounts, ParseError>>> =
        (0..files.len()).map(|_| None).collect();
    let slots = fan_out_fan_in(
        units,
        pool,
        |(i, path)| (i, load_library(path, config)),
        slots,
        |slots, (i, result)| slots[i] = Some(result),
    )?;

    let libraries = slots
        .into_iter()
        .map(|slot| slot.unwrap_or(Err(ParseError::Pool(PoolError::Disconnected))))
        .collect::<Result<Vec<_>, _>>()?;
    let table = combine_libraries(&libraries, kind)?;

    info!(
        libraries = files.len(),
        reads = table.len(),
        elapsed = ?start.elapsed(),
        "Read file set processed"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ADAPTER: &str = "TGGAATTCTCGGGTGCCAAGG";

    fn a24() -> String {
        "A".repeat(24)
    }

    fn g24() -> String {
        "G".repeat(24)
    }

    fn g23c() -> String {
        format!("{}C", "G".repeat(23))
    }

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    fn collapsed(records: &[(String, u32)]) -> String {
        records
            .iter()
            .enumerate()
            .map(|(i, (seq, count))| format!(">{}-{count}\n{seq}\n", i + 1))
            .collect()
    }

    fn library_1() -> NamedTempFile {
        write_temp(
            ".fa",
            &collapsed(&[
                (a24(), 4),
                (g24(), 2),
                (g23c(), 2),
                ("T".repeat(24), 1),
                ("C".repeat(17), 10),
            ]),
        )
    }

    fn library_2() -> NamedTempFile {
        write_temp(".fa", &collapsed(&[(a24(), 2), (g24(), 4), (g23c(), 2)]))
    }

    fn config(min_count: f64) -> LoadConfig {
        LoadConfig {
            min_count,
            ..LoadConfig::default()
        }
    }

    #[test]
    fn test_adapter_seed() {
        assert_eq!(adapter_seed(ADAPTER), "TGGAATTCTCG");
        assert_eq!(adapter_seed("TGGAATTCTCGG"), "TGGAATTCTCG");
        assert_eq!(adapter_seed("TGGAATTCTC"), "TGGAATTCTC");
    }

    #[test]
    fn test_trim_adapter() {
        assert_eq!(trim_adapter("AAAAXXTT", "XX"), Some("AAAA"));
        assert_eq!(trim_adapter("AAAAXXTTXX", "XX"), None);
        assert_eq!(trim_adapter("AAAA", "XX"), None);
    }

    #[test]
    fn test_mean_se() {
        assert_eq!(mean_se(&[500_000.0]), MeanSe::new(500_000.0, 0.0));

        let ms = mean_se(&[500_000.0, 250_000.0]);
        assert!((ms.mean - 375_000.0).abs() < 1e-6);
        assert!((ms.se - 125_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_library_name() {
        assert_eq!(library_name(Path::new("/data/rep1.fa")), "rep1");
        assert_eq!(library_name(Path::new("rep2.fq.gz")), "rep2");
        assert_eq!(library_name(Path::new("rep3")), "rep3");
    }

    #[test]
    fn test_load_collapsed_single() {
        let file = library_1();
        let counts = load_library(file.path(), &config(2.0)).unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&a24()], 500_000.0);
        assert_eq!(counts[&g24()], 250_000.0);
        assert_eq!(counts[&g23c()], 250_000.0);
    }

    #[test]
    fn test_collapsed_min_count_one_keeps_all_in_range() {
        let file = library_1();
        let counts = load_library(file.path(), &config(1.0)).unwrap();
        // 17 nt read is below the default length range
        assert_eq!(counts.len(), 4);
        assert!((counts[&a24()] - 1_000_000.0 * 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_collapsed_lowercase_is_uppercased() {
        let file = write_temp(".fa", ">1-1\naaaaaaaaaaaaaaaaaaaaaaaa\n");
        let counts = load_library(file.path(), &config(1.0)).unwrap();
        assert_eq!(counts[&a24()], 1_000_000.0);
    }

    #[test]
    fn test_collapsed_bad_header() {
        for content in [
            ">read1\nACGTACGTACGTACGTACGT\n",
            ">1-2-3\nACGTACGTACGTACGTACGT\n",
            ">1-4 x-y\nACGTACGTACGTACGTACGT\n",
            ">1-4 extra\nACGTACGTACGTACGTACGT\n",
        ] {
            let file = write_temp(".fa", content);
            let result = load_library(file.path(), &config(1.0));
            assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
        }
    }

    #[test]
    fn test_load_fasta_counts_occurrences() {
        let a25 = "A".repeat(25);
        let ta24 = format!("T{}", "A".repeat(24));
        let content = format!(">r1\n{a25}\n>r2\n{a25}\n>r3\n{ta24}\n>r4\n{ta24}\n>r5\nACGT\n");
        let file = write_temp(".fasta", &content);
        let config = LoadConfig {
            read_format: ReadFormat::Fa,
            ..config(2.0)
        };

        let counts = load_library(file.path(), &config).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&a25], 500_000.0);
        assert_eq!(counts[&ta24], 500_000.0);
    }

    #[test]
    fn test_fasta_min_count_removes_rare_reads() {
        let a25 = "A".repeat(25);
        let c25 = "C".repeat(25);
        let content = format!(">r1\n{a25}\n>r2\n{a25}\n>r3\n{a25}\n>r4\n{c25}\n");
        let file = write_temp(".fa", &content);
        let config = LoadConfig {
            read_format: ReadFormat::Fa,
            ..config(2.0)
        };
        let counts = load_library(file.path(), &config).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&a25], 1_000_000.0);
    }

    #[test]
    fn test_load_fastq_with_adapter() {
        let a20 = "A".repeat(20);
        let c20 = "C".repeat(20);
        let trimmed = format!("{a20}{ADAPTER}");
        let twice = format!("{c20}TGGAATTCTCGTGGAATTCTCG");
        let untrimmed = "G".repeat(24);
        let qual = |s: &str| "I".repeat(s.len());
        let content = format!(
            "@r1\n{trimmed}\n+\n{}\n@r2\n{twice}\n+\n{}\n@r3\n{untrimmed}\n+\n{}\n",
            qual(&trimmed),
            qual(&twice),
            qual(&untrimmed)
        );
        let file = write_temp(".fq", &content);
        let config = LoadConfig {
            read_format: ReadFormat::Fq,
            adapter: Some(ADAPTER.to_string()),
            ..LoadConfig::default()
        };

        let counts = load_library(file.path(), &config).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&a20], 1_000_000.0);
    }

    #[test]
    fn test_load_summary_multi() {
        let (one, two) = (library_1(), library_2());
        let files = vec![one.path().to_path_buf(), two.path().to_path_buf()];
        let table = load_read_libraries(
            &files,
            &config(2.0),
            AbundanceKind::Summary,
            &PoolConfig::with_threads(2),
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        let Some(Abundance::Summary(a)) = table.get(&a24()) else {
            panic!("expected summary");
        };
        assert!((a.mean - 375_000.0).abs() < 1e-6);
        assert!((a.se - 125_000.0).abs() < 1e-6);

        let Some(Abundance::Summary(gc)) = table.get(&g23c()) else {
            panic!("expected summary");
        };
        assert!((gc.mean - 250_000.0).abs() < 1e-6);
        assert!(gc.se.abs() < 1e-6);
    }

    #[test]
    fn test_load_per_library_keeps_file_order() {
        let (one, two) = (library_1(), library_2());
        let files = vec![one.path().to_path_buf(), two.path().to_path_buf()];
        let table = load_read_libraries(
            &files,
            &config(2.0),
            AbundanceKind::PerLibrary,
            &PoolConfig::with_threads(2),
        )
        .unwrap();

        assert_eq!(table.library_count(), Some(2));
        assert_eq!(
            table.get(&a24()),
            Some(&Abundance::per_library(vec![500_000.0, 250_000.0]))
        );
        assert_eq!(
            table.get(&g24()),
            Some(&Abundance::per_library(vec![250_000.0, 500_000.0]))
        );
    }

    #[test]
    fn test_read_missing_from_library_counts_zero() {
        let only_one = write_temp(".fa", &collapsed(&[(a24(), 1)]));
        let other = write_temp(".fa", &collapsed(&[(g24(), 1)]));
        let files = vec![only_one.path().to_path_buf(), other.path().to_path_buf()];
        let table = load_read_libraries(
            &files,
            &config(1.0),
            AbundanceKind::PerLibrary,
            &PoolConfig::with_threads(1),
        )
        .unwrap();
        assert_eq!(
            table.get(&a24()),
            Some(&Abundance::per_library(vec![1_000_000.0, 0.0]))
        );
    }

    #[test]
    fn test_no_files() {
        let result = load_read_libraries(
            &[],
            &LoadConfig::default(),
            AbundanceKind::Summary,
            &PoolConfig::default(),
        );
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let files = vec![PathBuf::from("/nonexistent/reads.fa")];
        let result = load_read_libraries(
            &files,
            &LoadConfig::default(),
            AbundanceKind::Summary,
            &PoolConfig::default(),
        );
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
