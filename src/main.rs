//! AmanaRemit CLI
//!
//! Interactive MYR to USD transfer calculator, plus a scriptable `quote`
//! command that prints quotes as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                   # interactive screens
//! cargo run -- quote --send 100 --receive 22.50
//! cargo run -- --offline quote --input amounts.csv > quotes.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `AMANA_RATE_URL`, `AMANA_FIXED_RATE`, `AMANA_HTTP_TIMEOUT_SECS`,
//!   `AMANA_INVOICE_DIR`: see [`amana_remit::Config::from_env`]

use amana_remit::config::parse_rate;
use amana_remit::{
    App, BatchQuoter, Config, ConversionEngine, Direction, RateProvider, RemitError, Result,
};
use clap::{Parser, Subcommand};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

/// MYR to USD transfer calculator and invoice generator
#[derive(Parser, Debug)]
#[command(name = "amana-remit", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Fixed effective rate (USD per MYR); skips fetching
    #[arg(long, global = true)]
    rate: Option<String>,

    /// Use the default rate without fetching
    #[arg(long, global = true)]
    offline: bool,

    /// Rate service base URL
    #[arg(long, global = true)]
    rate_url: Option<String>,

    /// Directory for printed invoices
    #[arg(long, global = true)]
    invoice_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive calculator (default)
    Run {
        /// Path to open first
        #[arg(long, default_value = "/")]
        path: String,
    },

    /// Print quotes as CSV
    Quote {
        /// MYR amount to send (repeatable)
        #[arg(long)]
        send: Vec<String>,

        /// USD amount to receive (repeatable)
        #[arg(long)]
        receive: Vec<String>,

        /// CSV file with `direction,amount` rows; stdin when no amounts are given
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = configure(&cli)?;

    match cli.command {
        None => run_screens(config, "/"),
        Some(Command::Run { path }) => run_screens(config, &path),
        Some(Command::Quote {
            send,
            receive,
            input,
        }) => run_quotes(&config, &send, &receive, input),
    }
}

fn configure(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env();

    if let Some(raw) = &cli.rate {
        let rate = parse_rate(raw).ok_or_else(|| RemitError::InvalidAmount(raw.clone()))?;
        config.fixed_rate = Some(rate);
    }
    if cli.offline {
        config.offline = true;
    }
    if let Some(url) = &cli.rate_url {
        config.rate_url = url.clone();
    }
    if let Some(dir) = &cli.invoice_dir {
        config.invoice_dir = dir.clone();
    }

    Ok(config)
}

fn run_screens(config: Config, path: &str) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    App::new(config, stdin.lock(), stdout.lock()).run_from(path)
}

fn run_quotes(
    config: &Config,
    send: &[String],
    receive: &[String],
    input: Option<PathBuf>,
) -> Result<()> {
    let mut provider = RateProvider::new(config);
    let rate = provider.load();
    info!("Quoting at {} ({:?})", rate, provider.source());

    let mut quoter = BatchQuoter::new(ConversionEngine::new(rate, config.fee_rate));

    for (direction, amounts) in [(Direction::Send, send), (Direction::Receive, receive)] {
        for amount in amounts {
            if !quoter.push(direction, amount) {
                return Err(RemitError::InvalidAmount(amount.clone()));
            }
        }
    }

    match input {
        Some(path) => quoter.process_csv(BufReader::new(File::open(path)?))?,
        None if send.is_empty() && receive.is_empty() => quoter.process_csv(io::stdin().lock())?,
        None => {}
    }

    let stdout = io::stdout();
    quoter.write_output(stdout.lock())
}
