//! Exchange rate model and the one-shot rate provider.
//!
//! The provider makes a single best-effort request for the MYR→USD spot
//! rate, either blocking or on a background thread. Whatever goes wrong, the
//! calculator keeps working on the fallback rate; failures are only logged.

use crate::config::Config;
use crate::error::{RemitError, Result};
use log::{debug, info, warn};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Currency the sender pays in.
pub const SEND_CURRENCY: &str = "MYR";

/// Currency the receiver is paid in.
pub const RECEIVE_CURRENCY: &str = "USD";

/// Smallest accepted rate (10^-6).
pub const MIN_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Largest accepted rate (10^6).
pub const MAX_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Effective exchange rate: USD received per 1 MYR sent.
///
/// Always within `MIN_RATE..=MAX_RATE`, which keeps conversions of any
/// accepted amount from overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Wraps a rate, rejecting values outside `MIN_RATE..=MAX_RATE`.
    pub fn new(value: Decimal) -> Option<Self> {
        if (MIN_RATE..=MAX_RATE).contains(&value) {
            Some(ExchangeRate(value))
        } else {
            None
        }
    }

    /// Returns the USD-per-MYR value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the MYR-per-USD value.
    pub fn inverse(&self) -> Decimal {
        Decimal::ONE / self.0
    }

    /// The two-line badge shown above the calculator and on the invoice.
    pub fn badge(&self) -> String {
        format!(
            "1.00 {} = {} {}\n1.00 {} = {} {}",
            SEND_CURRENCY,
            four_places(self.0),
            RECEIVE_CURRENCY,
            RECEIVE_CURRENCY,
            four_places(self.inverse()),
            SEND_CURRENCY
        )
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", four_places(self.0))
    }
}

fn four_places(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(4);
    rounded.to_string()
}

/// Where the current rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Preset default, either before loading or after a failed fetch.
    Fallback,
    /// Fetched spot rate with the margin applied.
    Fetched,
    /// Supplied by configuration; never fetched.
    Fixed,
}

/// Shape of the rate service response: `{"rates": {"USD": 0.2293}, ...}`.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: Option<QuotedRates>,
}

#[derive(Debug, Deserialize)]
struct QuotedRates {
    #[serde(rename = "USD")]
    usd: Option<f64>,
}

/// Extracts the raw spot rate from a rate service response body.
pub fn parse_spot_rate(body: &str) -> Result<Decimal> {
    let latest: LatestRates =
        serde_json::from_str(body).map_err(|e| RemitError::MalformedRate(e.to_string()))?;

    let raw = latest
        .rates
        .and_then(|rates| rates.usd)
        .ok_or_else(|| RemitError::MalformedRate("missing rates.USD".to_string()))?;

    Decimal::from_f64(raw)
        .filter(|rate| ExchangeRate::new(*rate).is_some())
        .ok_or_else(|| RemitError::MalformedRate(format!("unusable rate {}", raw)))
}

/// Holds the effective rate for one calculator session.
///
/// Created in the loading state with the fallback rate. The single fetch runs
/// either blocking through [`RateProvider::load`] or in the background after
/// [`RateProvider::start`], with [`RateProvider::poll`] picking up the result.
#[derive(Debug)]
pub struct RateProvider {
    rate: ExchangeRate,
    source: RateSource,
    loading: bool,
    pending: Option<Receiver<Result<Decimal>>>,
    config: Config,
}

impl RateProvider {
    /// Creates a provider primed with the fallback (or fixed) rate.
    pub fn new(config: &Config) -> Self {
        let fallback = ExchangeRate::new(config.fallback_rate)
            .unwrap_or(ExchangeRate(crate::config::DEFAULT_FALLBACK_RATE));

        let (rate, source, loading) = match config.fixed_rate.and_then(ExchangeRate::new) {
            Some(fixed) => (fixed, RateSource::Fixed, false),
            None => (fallback, RateSource::Fallback, !config.offline),
        };

        RateProvider {
            rate,
            source,
            loading,
            pending: None,
            config: config.clone(),
        }
    }

    /// Current effective rate.
    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    /// Where the current rate came from.
    pub fn source(&self) -> RateSource {
        self.source
    }

    /// `true` until the fetch has completed, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts the fetch on a background thread. Does nothing if the fetch
    /// already ran or is running.
    pub fn start(&mut self) {
        if !self.loading || self.pending.is_some() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        thread::spawn(move || {
            // The receiver is gone if the calculator was left before the reply
            let _ = tx.send(fetch_spot(&config));
        });
        self.pending = Some(rx);
    }

    /// Applies the background fetch result if it has arrived.
    ///
    /// Returns the rate when loading finished during this call, `None` while
    /// the fetch is still running or when there was nothing to wait for.
    pub fn poll(&mut self) -> Option<ExchangeRate> {
        let result = match self.pending.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(RemitError::FetchAborted),
        };

        self.pending = None;
        self.finish(result);
        Some(self.rate)
    }

    /// Runs the one-shot fetch if it has not run yet and returns the rate.
    ///
    /// Waits for a fetch already started in the background. A failure leaves
    /// the fallback rate in place. Calling this again after the first attempt
    /// does nothing.
    pub fn load(&mut self) -> ExchangeRate {
        if !self.loading {
            return self.rate;
        }

        let result = match self.pending.take() {
            Some(rx) => rx.recv().unwrap_or(Err(RemitError::FetchAborted)),
            None => fetch_spot(&self.config),
        };

        self.finish(result);
        self.rate
    }

    fn finish(&mut self, result: Result<Decimal>) {
        match result {
            Ok(spot) => match ExchangeRate::new(spot * self.config.margin) {
                Some(effective) => {
                    info!("Fetched spot rate {}, effective rate {}", spot, effective);
                    self.rate = effective;
                    self.source = RateSource::Fetched;
                }
                None => warn!("Spot rate {} unusable after margin, using default", spot),
            },
            Err(e) => warn!("Failed to fetch rate, using default {}: {}", self.rate, e),
        }

        self.loading = false;
    }
}

fn fetch_spot(config: &Config) -> Result<Decimal> {
    debug!("Requesting {} -> {} from {}", SEND_CURRENCY, RECEIVE_CURRENCY, config.rate_url);

    let client = reqwest::blocking::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let body = client
        .get(&config.rate_url)
        .query(&[("from", SEND_CURRENCY), ("to", RECEIVE_CURRENCY)])
        .send()?
        .error_for_status()?
        .text()?;

    parse_spot_rate(&body)
}
