use anyhow::Result;
use clap::Parser;
use hotel_overlap::config::{Credentials, OutputOptions, VoyagePriveConfig, VOYAGE_PRIVE_LOGIN_URL};
use hotel_overlap::fetcher::run_fetcher;
use hotel_overlap::utils;
use hotel_overlap::voyageprive::VoyagePriveSource;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Voyage Privé hotel offer fetcher")]
struct Args {
    /// Directory receiving the dated snapshot
    #[clap(long, env = "HOTELS_OUTPUT_DIR", default_value = "data")]
    output_dir: PathBuf,

    /// Write the snapshot to this exact path instead
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Account e-mail
    #[clap(long, env = "VOYAGEPRIVE_EMAIL")]
    email: String,

    /// Account password
    #[clap(long, env = "VOYAGEPRIVE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Login page
    #[clap(long, env = "VOYAGEPRIVE_LOGIN_URL", default_value = VOYAGE_PRIVE_LOGIN_URL)]
    login_url: String,

    /// Run Chrome with a visible window
    #[clap(long)]
    show_browser: bool,

    /// Maximum wait for any page element, in seconds
    #[clap(long, default_value = "20")]
    timeout_secs: u64,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(args.debug);

    let mut config = VoyagePriveConfig::new(Credentials {
        email: args.email,
        password: args.password,
    });
    config.login_url = args.login_url;
    config.browser.headless = !args.show_browser;
    config.browser.timeout = Duration::from_secs(args.timeout_secs);

    let options = OutputOptions {
        output_dir: args.output_dir,
        output: args.output,
    };

    let source = VoyagePriveSource::new(config);
    let result = run_fetcher(&source, &options)?;

    println!(
        "Saved {} offers to {}",
        result.offer_count,
        result.output_path.display()
    );
    Ok(())
}
