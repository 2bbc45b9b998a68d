//! Runtime configuration.
//!
//! Defaults match the production pricing. Environment variables are applied
//! on top of the defaults, and command-line flags on top of those.

use crate::rate::ExchangeRate;
use log::warn;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Endpoint serving the latest spot rates.
pub const DEFAULT_RATE_URL: &str = "https://api.frankfurter.app/latest";

/// Margin multiplied into the fetched spot rate (2.1% below market).
pub const DEFAULT_MARGIN: Decimal = Decimal::from_parts(979, 0, 0, false, 3);

/// Rate used until, or instead of, a successful fetch.
pub const DEFAULT_FALLBACK_RATE: Decimal = Decimal::from_parts(2245, 0, 0, false, 4);

/// Transfer fee as a fraction of the send amount (1%).
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by the rate provider, the calculator and the printer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the rate service; the currency pair is added as query.
    pub rate_url: String,

    /// Multiplier applied to a fetched rate.
    pub margin: Decimal,

    /// Effective rate used when fetching fails.
    pub fallback_rate: Decimal,

    /// Fixed effective rate. When set, no fetch is attempted.
    pub fixed_rate: Option<Decimal>,

    /// Skip fetching and use the fallback rate.
    pub offline: bool,

    /// Fee as a fraction of the send amount.
    pub fee_rate: Decimal,

    /// Client timeout for the rate request.
    pub http_timeout: Duration,

    /// Directory printed invoices are written to.
    pub invoice_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rate_url: DEFAULT_RATE_URL.to_string(),
            margin: DEFAULT_MARGIN,
            fallback_rate: DEFAULT_FALLBACK_RATE,
            fixed_rate: None,
            offline: false,
            fee_rate: DEFAULT_FEE_RATE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            invoice_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Builds a configuration from defaults plus `AMANA_*` environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AMANA_RATE_URL`: rate service base URL
    /// - `AMANA_FIXED_RATE`: fixed effective rate, disables fetching
    /// - `AMANA_HTTP_TIMEOUT_SECS`: rate request timeout in seconds
    /// - `AMANA_INVOICE_DIR`: where printed invoices go
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("AMANA_RATE_URL") {
            config.rate_url = url;
        }

        if let Some(raw) = lookup("AMANA_FIXED_RATE") {
            match parse_rate(&raw) {
                Some(rate) => config.fixed_rate = Some(rate),
                None => warn!("Ignoring AMANA_FIXED_RATE={:?}: not a usable rate", raw),
            }
        }

        if let Some(raw) = lookup("AMANA_HTTP_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring AMANA_HTTP_TIMEOUT_SECS={:?}: not a positive integer", raw),
            }
        }

        if let Some(dir) = lookup("AMANA_INVOICE_DIR") {
            config.invoice_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Parses a rate the calculator can use (see [`ExchangeRate::new`]).
pub fn parse_rate(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|rate| ExchangeRate::new(*rate).is_some())
}
