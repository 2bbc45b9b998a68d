//! # AmanaRemit
//!
//! A MYR to USD transfer calculator with a three-screen terminal flow:
//! quote, sender/receiver details, printable invoice.
//!
//! ## Design Principles
//!
//! - **Round up, never down**: every amount shown is rounded up to 0.10
//! - **Fixed-point arithmetic**: money uses `rust_decimal`, not floats
//! - **Best-effort rate**: one fetch per calculator mount, silent fallback
//! - **Explicit handoff**: screens pass owned state forward, nothing global
//!
//! ## Example
//!
//! ```
//! use amana_remit::{ConversionEngine, ExchangeRate};
//! use rust_decimal::Decimal;
//!
//! let rate = ExchangeRate::new(Decimal::new(2245, 4)).unwrap();
//! let engine = ConversionEngine::new(rate, Decimal::new(1, 2));
//!
//! let quote = engine.from_send(Decimal::from(100));
//! assert_eq!(quote.receive.to_string(), "22.50");
//! assert_eq!(quote.total.to_string(), "101.00");
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod invoice;
pub mod money;
pub mod navigation;
pub mod quote;
pub mod rate;
pub mod screens;
pub mod transfer;

pub use batch::BatchQuoter;
pub use config::Config;
pub use error::{RemitError, Result};
pub use money::Money;
pub use navigation::{Handoff, Navigation, Route, Screen};
pub use quote::{Calculator, ConversionEngine, Direction, Quote};
pub use rate::{ExchangeRate, RateProvider, RateSource};
pub use screens::App;
pub use transfer::{PayMethod, TransactionRecord, TransferDetails, TransferQuote};
