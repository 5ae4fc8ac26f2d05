use std::path::PathBuf;

use clap::Args;

use crate::cli::{LoadArgs, OutputFormat};
use crate::output::profile::write_profile;
use crate::parsing::reads::load_read_libraries;
use crate::parsing::reference::load_references;
use crate::quant::{align_reads, profile_alignments};
use crate::utils::validation::validate_lengths;

#[derive(Args)]
pub struct ProfileArgs {
    /// Read files of one condition
    #[arg(long, required = true, num_args = 1..)]
    pub reads: Vec<PathBuf>,

    /// Reference FASTA file
    #[arg(long = "ref", required = true)]
    pub reference: PathBuf,

    /// Read lengths to align, comma separated
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub lengths: Vec<usize>,

    /// Output prefix; files are written to `<out>_<len>.<ext>`
    #[arg(short, long, required = true)]
    pub out: PathBuf,

    #[command(flatten)]
    pub load: LoadArgs,
}

/// Execute profile subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, alignment fails, or an
/// output file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ProfileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.load.load_config()?;
    validate_lengths(&args.lengths, config.min_len, config.max_len)?;
    let pool = args.load.pool_config();
    let mode = args.load.count_mode();

    let table = load_read_libraries(&args.reads, &config, args.load.abundance_kind(), &pool)?;
    let refs = load_references(&args.reference)?;
    let layout = args.load.layout(&[args.reads.as_slice()]);

    if verbose {
        eprintln!(
            "Loaded {} distinct reads from {} files and {} references",
            table.len(),
            args.reads.len(),
            refs.len()
        );
    }

    for &window in &args.lengths {
        let alignments = align_reads(&table, &refs, window, &pool)?;
        let profiles = profile_alignments(&alignments, &table, mode, &pool)?;
        let path = write_profile(&args.out, window, format, &profiles, &refs, &layout)?;

        if verbose {
            eprintln!(
                "{window} nt: {} alignments on {} references written to {}",
                alignments.alignment_count(),
                profiles.len(),
                path.display()
            );
        }
    }

    Ok(())
}
