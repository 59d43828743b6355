use anyhow::Result;
use clap::Parser;
use hotel_overlap::config::{parse_key_value, OutputOptions, VerychicConfig, VERYCHIC_ENDPOINT};
use hotel_overlap::fetcher::run_fetcher;
use hotel_overlap::utils;
use hotel_overlap::verychic::VerychicSource;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Verychic hotel offer fetcher")]
struct Args {
    /// Directory receiving the dated snapshot
    #[clap(long, env = "HOTELS_OUTPUT_DIR", default_value = "data")]
    output_dir: PathBuf,

    /// Write the snapshot to this exact path instead
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Products endpoint
    #[clap(long, env = "VERYCHIC_ENDPOINT", default_value = VERYCHIC_ENDPOINT)]
    endpoint: String,

    /// Query parameter override as key=value (repeatable)
    #[clap(short, long = "param", env = "VERYCHIC_PARAMS", value_delimiter = ',', value_parser = parse_key_value)]
    params: Vec<(String, String)>,

    /// Also dump the extracted listings as JSON
    #[clap(long)]
    raw_json: Option<PathBuf>,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(args.debug);

    let config = VerychicConfig {
        endpoint: args.endpoint,
        raw_json: args.raw_json,
        ..VerychicConfig::default()
    }
    .with_param_overrides(&args.params);

    let options = OutputOptions {
        output_dir: args.output_dir,
        output: args.output,
    };

    let source = VerychicSource::new(config)?;
    let result = run_fetcher(&source, &options)?;

    println!(
        "Saved {} offers to {}",
        result.offer_count,
        result.output_path.display()
    );
    Ok(())
}
