use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use promoscan::{
    config::ScanConfig,
    info_time, logging,
    process::{ScanOptions, Scanner},
    report::{format_listing, format_matches},
    store::RecordStore,
    Result, BASE_URL, DEFAULT_DELAY_SECS, LOG_FILE, RESULTS_FILE,
};

#[derive(Debug, Parser)]
#[command(name = "promoscan", about = "Find promo code URLs and the organizations behind them")]
struct Cli {
    /// Search for new promo codes
    #[arg(long)]
    search: bool,

    /// Look up stored promos by organization name
    #[arg(long)]
    company: Option<String>,

    /// List all found promos
    #[arg(long)]
    list: bool,

    /// Maximum number of codes to check
    #[arg(long)]
    max_codes: Option<usize>,

    /// Start searching from a specific code
    #[arg(long)]
    start_from: Option<String>,

    /// Delay between requests (seconds)
    #[arg(long, env = "PROMOSCAN_DELAY", default_value_t = DEFAULT_DELAY_SECS)]
    delay: f64,

    /// Results file
    #[arg(long, env = "PROMOSCAN_RESULTS_FILE", default_value = RESULTS_FILE)]
    results_file: PathBuf,

    /// Base URL promo codes are appended to
    #[arg(long, env = "PROMOSCAN_BASE_URL", default_value = BASE_URL)]
    base_url: String,

    /// Log file, written alongside stdout
    #[arg(long, env = "PROMOSCAN_LOG_FILE", default_value = LOG_FILE)]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_file)?;

    let config = ScanConfig::default()
        .with_base_url(cli.base_url)
        .with_results_file(cli.results_file)
        .with_delay_secs(cli.delay)?;
    let store = RecordStore::load(&config.results_file).await;

    if cli.search {
        let start_time = Local::now();
        let mut scanner = Scanner::new(&config, store)?;
        let options = ScanOptions {
            max_codes: cli.max_codes,
            start_from: cli.start_from,
        };
        scanner.scan(&options).await;
        info_time!(start_time, "Full program time:");
    } else if let Some(query) = cli.company {
        let matches = store.search_by_organization(&query);
        print!("{}", format_matches(&query, &matches));
    } else if cli.list {
        print!("{}", format_listing(&store));
    } else {
        print_usage();
    }

    Ok(())
}

fn print_usage() {
    println!("Usage examples:");
    println!("  promoscan --search");
    println!("  promoscan --search --max-codes 100");
    println!("  promoscan --company 'Microsoft'");
    println!("  promoscan --list");
}
