//! Routes and the forward handoff of transfer state between screens.
//!
//! Each screen receives what it needs as an owned value from the screen
//! before it. A screen reached without that value (a direct path, or state
//! of the wrong kind) is replaced by the calculator.

use crate::transfer::{TransactionRecord, TransferQuote};
use log::{debug, info};
use std::fmt;

/// Client-side paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Calculator,
    /// `/details`
    Details,
    /// `/invoice`
    Invoice,
}

impl Route {
    /// Maps a path to a route; unknown paths go to the calculator.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match normalized {
            "/" => Route::Calculator,
            "/details" => Route::Details,
            "/invoice" => Route::Invoice,
            _ => {
                debug!("Unknown path {:?}, redirecting to /", trimmed);
                Route::Calculator
            }
        }
    }

    /// Canonical path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Calculator => "/",
            Route::Details => "/details",
            Route::Invoice => "/invoice",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// State carried along with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Nothing carried (direct navigation, restart).
    Empty,
    /// Calculator to details.
    Quote(TransferQuote),
    /// Details to invoice.
    Record(TransactionRecord),
}

/// A screen together with the state it was mounted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Calculator,
    Details(TransferQuote),
    Invoice(TransactionRecord),
}

impl Screen {
    /// Route this screen is mounted at.
    pub fn route(&self) -> Route {
        match self {
            Screen::Calculator => Route::Calculator,
            Screen::Details(_) => Route::Details,
            Screen::Invoice(_) => Route::Invoice,
        }
    }
}

/// Requested transition out of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Move to `route`, carrying `handoff`.
    To(Route, Handoff),
    /// Leave the application.
    Exit,
}

impl Navigation {
    /// Direct navigation to a path with no carried state.
    pub fn to_path(path: &str) -> Self {
        Navigation::To(Route::parse(path), Handoff::Empty)
    }
}

/// Resolves a route and its handoff into the screen to mount.
///
/// Details needs a quote and the invoice needs a record; without them the
/// calculator is mounted instead and nothing is reported to the user.
pub fn resolve(route: Route, handoff: Handoff) -> Screen {
    let screen = match (route, handoff) {
        (Route::Details, Handoff::Quote(quote)) => Screen::Details(quote),
        (Route::Invoice, Handoff::Record(record)) => Screen::Invoice(record),
        (Route::Calculator, _) => Screen::Calculator,
        (route, _) => {
            info!("No transfer state for {}, redirecting to /", route);
            Screen::Calculator
        }
    };

    debug!("Mounted {}", screen.route());
    screen
}
