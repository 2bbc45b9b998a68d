//! Fixed-point money type with 2 decimal places of display precision.
//!
//! Every monetary value the calculator shows passes through
//! [`Money::round_up`], which rounds to the next 0.10 by ceiling. The
//! platform never collects less than the true cost, and the receiver never
//! gets fractions finer than ten cents.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A monetary amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use amana_remit::Money;
///
/// let fee = Money::round_up(Decimal::new(1003, 3)); // 1.003
/// assert_eq!(fee.to_string(), "1.10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places shown.
    pub const SCALE: u32 = 2;

    /// Zero value, displayed as `0.00`.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Rounds `value` up to the nearest 0.10: `ceil(value * 10) / 10`.
    pub fn round_up(value: Decimal) -> Self {
        let tenths = (value * Decimal::TEN).ceil();
        Money::new(tenths / Decimal::TEN)
    }

    /// Formats `value` to 2 places, rounding half away from zero.
    ///
    /// Used for amounts the user typed, which are handed on as entered
    /// rather than rounded up.
    pub fn fixed(value: Decimal) -> Self {
        Money::new(value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Returns the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Largest amount magnitude accepted in either field (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Smallest non-zero amount magnitude (10^-12). Finer non-zero input is
/// raised to it so it still quotes as a positive amount.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Parses what the user typed into an amount field.
///
/// Returns `None` for empty or non-numeric text, and for magnitudes above
/// [`MAX_AMOUNT`]. Surrounding whitespace is ignored and scientific notation
/// (`1e3`) is accepted. Digit separators (`1_000`) are not numeric.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains('_') {
        return None;
    }

    let amount = match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(amount) => amount,
        // Too small for Decimal, e.g. 1e-40
        Err(_) => trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.abs() < 1.0)
            .map(|_| Decimal::ZERO)?,
    };

    if amount.abs() < MIN_AMOUNT && has_nonzero_digit(trimmed) {
        let smallest = if trimmed.starts_with('-') { -MIN_AMOUNT } else { MIN_AMOUNT };
        return Some(smallest);
    }

    Some(amount).filter(|amount| amount.abs() <= MAX_AMOUNT)
}

fn has_nonzero_digit(literal: &str) -> bool {
    literal
        .split(|c| c == 'e' || c == 'E')
        .next()
        .map_or(false, |mantissa| mantissa.chars().any(|c| matches!(c, '1'..='9')))
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::fixed(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Decimal;

    /// Sums two amounts without rounding; callers decide how to round.
    fn add(self, rhs: Self) -> Self::Output {
        self.0 + rhs.0
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}
