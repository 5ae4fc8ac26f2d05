use std::path::PathBuf;

use clap::Args;

use crate::cli::{LoadArgs, OutputFormat};
use crate::output::compare::write_comparison;
use crate::output::OutputLabel;
use crate::parsing::mirna::load_mirna_references;
use crate::parsing::reads::load_read_libraries;
use crate::quant::{align_mirnas, mirna_compare};

#[derive(Args)]
pub struct MirnaArgs {
    /// Read files of the first condition
    #[arg(long, required = true, num_args = 1..)]
    pub reads1: Vec<PathBuf>,

    /// Read files of the second condition
    #[arg(long, required = true, num_args = 1..)]
    pub reads2: Vec<PathBuf>,

    /// FASTA of mature miRNA sequences
    #[arg(long, required = true)]
    pub mirnas: PathBuf,

    /// Output prefix; results are written to `<out>_miR.<ext>`
    #[arg(short, long, required = true)]
    pub out: PathBuf,

    #[command(flatten)]
    pub load: LoadArgs,
}

/// Execute mirna subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, the comparison fails, or
/// the output file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MirnaArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.load.load_config()?;
    let pool = args.load.pool_config();
    let kind = args.load.abundance_kind();

    let table_1 = load_read_libraries(&args.reads1, &config, kind, &pool)?;
    let table_2 = load_read_libraries(&args.reads2, &config, kind, &pool)?;
    let mirnas = load_mirna_references(&args.mirnas)?;

    let hits_1 = align_mirnas(&table_1, &mirnas);
    let hits_2 = align_mirnas(&table_2, &mirnas);
    let comparison = mirna_compare(&hits_1, &hits_2, args.load.count_mode())?;

    let layout = args
        .load
        .layout(&[args.reads1.as_slice(), args.reads2.as_slice()]);
    let path = write_comparison(&args.out, OutputLabel::Mirna, format, &comparison, &layout)?;

    if verbose {
        eprintln!(
            "{} of {} miRNAs found in condition 1, {} in condition 2, {} in both; written to {}",
            hits_1.len(),
            mirnas.len(),
            hits_2.len(),
            comparison.len(),
            path.display()
        );
    }

    Ok(())
}
