//! Error types for the transfer calculator.

use thiserror::Error;

/// Result type alias for remit operations
pub type Result<T> = std::result::Result<T, RemitError>;

/// Errors that can occur while quoting, fetching rates or driving the screens.
#[derive(Error, Debug)]
pub enum RemitError {
    /// Failed to read input, write output or save an invoice
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Rate request failed at the transport or HTTP status level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate response arrived but did not carry a usable rate
    #[error("Malformed rate response: {0}")]
    MalformedRate(String),

    /// Background rate request stopped before sending its result
    #[error("Rate request ended without a reply")]
    FetchAborted,

    /// Amount or rate text that is not a usable decimal
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    /// Details form submitted with a required field left blank
    #[error("Please fill in all required fields")]
    MissingRequiredFields,
}
