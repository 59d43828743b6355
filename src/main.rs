use anyhow::Result;
use clap::Parser;
use hotel_overlap::overlap::{overlapping_hotel_names, write_overlap_report};
use hotel_overlap::utils;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare overlap between two hotel offer snapshots")]
struct Args {
    /// Path to the first snapshot
    file1: PathBuf,

    /// Path to the second snapshot
    file2: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(false);

    let first = utils::load_snapshot(&args.file1)?;
    let second = utils::load_snapshot(&args.file2)?;
    info!(
        "Comparing {} offers from {} against {} offers from {}",
        first.len(),
        args.file1.display(),
        second.len(),
        args.file2.display()
    );

    let names = overlapping_hotel_names(&first, &second);

    write_overlap_report(std::io::stdout().lock(), &names)?;

    Ok(())
}
