//! Conversion engine and the calculator's two linked amount fields.
//!
//! Either field can be the source of truth. Editing one recomputes the other
//! field plus fee and total; nothing records which field was edited last.

use crate::money::{parse_amount, Money};
use crate::rate::ExchangeRate;
use crate::transfer::TransferQuote;
use log::debug;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Which field a quote was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the MYR amount the sender pays.
    Send,
    /// From the USD amount the receiver gets.
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Send => write!(f, "send"),
            Direction::Receive => write!(f, "receive"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "send" | "myr" => Ok(Direction::Send),
            "receive" | "usd" => Ok(Direction::Receive),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Result of one conversion.
///
/// `total` is `round_up(send + fee)` where `fee` is computed from the send
/// amount, never from the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub direction: Direction,
    /// MYR principal.
    pub send: Money,
    /// USD paid out.
    pub receive: Money,
    /// MYR fee.
    pub fee: Money,
    /// MYR charged in total.
    pub total: Money,
}

/// Pure conversion functions for a fixed effective rate.
#[derive(Debug, Clone, Copy)]
pub struct ConversionEngine {
    rate: ExchangeRate,
    fee_rate: Decimal,
}

impl ConversionEngine {
    /// Creates an engine quoting at `rate` with `fee_rate` charged on the send amount.
    pub fn new(rate: ExchangeRate, fee_rate: Decimal) -> Self {
        ConversionEngine { rate, fee_rate }
    }

    /// Effective rate this engine quotes at.
    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    /// Quotes a MYR send amount.
    pub fn from_send(&self, myr: Decimal) -> Quote {
        let fee = self.fee_for(myr);
        Quote {
            direction: Direction::Send,
            send: Money::fixed(myr),
            receive: Money::round_up(myr * self.rate.value()),
            fee,
            total: Money::round_up(myr + fee.value()),
        }
    }

    /// Quotes a USD receive amount.
    ///
    /// The derived MYR amount is rounded up first and the fee is charged on
    /// that rounded amount, so send→receive→send does not always return to
    /// the starting value.
    pub fn from_receive(&self, usd: Decimal) -> Quote {
        let send = Money::round_up(usd / self.rate.value());
        let fee = self.fee_for(send.value());
        Quote {
            direction: Direction::Receive,
            send,
            receive: Money::fixed(usd),
            fee,
            total: Money::round_up(send + fee),
        }
    }

    /// Quotes raw field text in the given direction.
    ///
    /// Returns `None` for empty or non-numeric text.
    pub fn quote_text(&self, direction: Direction, text: &str) -> Option<Quote> {
        let amount = parse_amount(text)?;
        Some(match direction {
            Direction::Send => self.from_send(amount),
            Direction::Receive => self.from_receive(amount),
        })
    }

    fn fee_for(&self, myr: Decimal) -> Money {
        Money::round_up(myr * self.fee_rate)
    }
}

/// State of the calculator screen.
///
/// Fields hold text exactly as typed or derived, so an invalid entry stays
/// visible in the field the user is editing while the other field clears.
#[derive(Debug, Clone)]
pub struct Calculator {
    engine: ConversionEngine,
    send: String,
    receive: String,
    /// Quote behind the current fields; `None` while either field is unusable.
    quote: Option<Quote>,
}

impl Calculator {
    /// Creates a calculator with both fields empty.
    pub fn new(engine: ConversionEngine) -> Self {
        Calculator {
            engine,
            send: String::new(),
            receive: String::new(),
            quote: None,
        }
    }

    /// Handles an edit of the "You send" (MYR) field.
    pub fn edit_send(&mut self, text: &str) {
        self.send = text.to_string();
        self.quote = self.engine.quote_text(Direction::Send, text);
        match &self.quote {
            Some(quote) => {
                self.receive = quote.receive.to_string();
                log_quote(quote);
            }
            None => self.receive.clear(),
        }
    }

    /// Handles an edit of the "They receive" (USD) field.
    pub fn edit_receive(&mut self, text: &str) {
        self.receive = text.to_string();
        self.quote = self.engine.quote_text(Direction::Receive, text);
        match &self.quote {
            Some(quote) => {
                self.send = quote.send.to_string();
                log_quote(quote);
            }
            None => self.send.clear(),
        }
    }

    /// Switches to a newly loaded rate. The fields keep their values; the
    /// rate applies from the next edit on.
    pub fn set_rate(&mut self, rate: ExchangeRate) {
        self.engine = ConversionEngine::new(rate, self.engine.fee_rate);
    }

    /// Text of the MYR field.
    pub fn send(&self) -> &str {
        &self.send
    }

    /// Text of the USD field.
    pub fn receive(&self) -> &str {
        &self.receive
    }

    /// Fee of the current quote, zero when there is none.
    pub fn fee(&self) -> Money {
        self.quote.map_or(Money::ZERO, |quote| quote.fee)
    }

    /// Total of the current quote, zero when there is none.
    pub fn total(&self) -> Money {
        self.quote.map_or(Money::ZERO, |quote| quote.total)
    }

    /// Rate the next edit is quoted at.
    pub fn rate(&self) -> ExchangeRate {
        self.engine.rate()
    }

    /// `true` when both fields hold amounts and the send amount is positive.
    pub fn can_continue(&self) -> bool {
        self.handoff().is_some()
    }

    /// Builds the quote handed to the details screen, if the fields allow it.
    pub fn handoff(&self) -> Option<TransferQuote> {
        let quote = self.quote?;
        let send_positive = match quote.direction {
            Direction::Send => parse_amount(&self.send).map_or(false, |send| send > Decimal::ZERO),
            Direction::Receive => quote.send.value() > Decimal::ZERO,
        };
        if !send_positive {
            return None;
        }

        Some(TransferQuote {
            send_amount: quote.send,
            receive_amount: quote.receive,
            fee: quote.fee,
            total: quote.total,
            rate: self.engine.rate(),
        })
    }
}

fn log_quote(quote: &Quote) {
    debug!(
        "Quote from {}: send {} receive {} fee {} total {}",
        quote.direction, quote.send, quote.receive, quote.fee, quote.total
    );
}
