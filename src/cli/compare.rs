use std::path::PathBuf;

use clap::Args;

use crate::cli::{LoadArgs, OutputFormat};
use crate::output::compare::write_comparison;
use crate::output::OutputLabel;
use crate::parsing::reads::load_read_libraries;
use crate::parsing::reference::load_references;
use crate::quant::{align_reads, compare, quantify};
use crate::utils::validation::validate_lengths;

#[derive(Args)]
pub struct CompareArgs {
    /// Read files of the first condition
    #[arg(long, required = true, num_args = 1..)]
    pub reads1: Vec<PathBuf>,

    /// Read files of the second condition
    #[arg(long, required = true, num_args = 1..)]
    pub reads2: Vec<PathBuf>,

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

/// Execute compare subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, alignment or comparison
/// fails, or an output file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.load.load_config()?;
    validate_lengths(&args.lengths, config.min_len, config.max_len)?;
    let pool = args.load.pool_config();
    let mode = args.load.count_mode();
    let kind = args.load.abundance_kind();

    let table_1 = load_read_libraries(&args.reads1, &config, kind, &pool)?;
    let table_2 = load_read_libraries(&args.reads2, &config, kind, &pool)?;
    let refs = load_references(&args.reference)?;
    let layout = args
        .load
        .layout(&[args.reads1.as_slice(), args.reads2.as_slice()]);

    if verbose {
        eprintln!(
            "Condition 1: {} distinct reads, condition 2: {} distinct reads, {} references",
            table_1.len(),
            table_2.len(),
            refs.len()
        );
    }

    for &window in &args.lengths {
        let counts_1 = quantify(&align_reads(&table_1, &refs, window, &pool)?, &table_1, mode)?;
        let counts_2 = quantify(&align_reads(&table_2, &refs, window, &pool)?, &table_2, mode)?;
        let comparison = compare(&counts_1, &counts_2)?;
        let path = write_comparison(
            &args.out,
            OutputLabel::Length(window),
            format,
            &comparison,
            &layout,
        )?;

        if verbose {
            eprintln!(
                "{window} nt: {} references in both conditions written to {}",
                comparison.len(),
                path.display()
            );
        }
    }

    Ok(())
}
