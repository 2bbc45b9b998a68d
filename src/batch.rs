//! CSV batch quoting.
//!
//! Reads `direction,amount` rows and writes one quote per valid row. Rows
//! that cannot be quoted are logged at warn level and skipped.

use crate::error::Result;
use crate::quote::{ConversionEngine, Direction, Quote};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};

/// Raw request row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// `send`/`myr` or `receive`/`usd`
    pub direction: String,

    /// Amount in the direction's currency, as typed.
    pub amount: String,
}

/// Collects quotes for a fixed rate, in input order.
pub struct BatchQuoter {
    engine: ConversionEngine,
    quotes: Vec<(String, Quote)>,
}

impl BatchQuoter {
    /// Creates an empty quoter for `engine`.
    pub fn new(engine: ConversionEngine) -> Self {
        BatchQuoter {
            engine,
            quotes: Vec::new(),
        }
    }

    /// Quotes one amount. Returns `false` if the amount is not numeric.
    pub fn push(&mut self, direction: Direction, amount: &str) -> bool {
        match self.engine.quote_text(direction, amount) {
            Some(quote) => {
                debug!("Quoted {} {} -> total {}", direction, amount.trim(), quote.total);
                self.quotes.push((amount.trim().to_string(), quote));
                true
            }
            None => false,
        }
    }

    /// Quotes every row of a CSV reader with a `direction,amount` header.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<QuoteRequest>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(request) => match request.direction.parse::<Direction>() {
                    Ok(direction) => {
                        if !self.push(direction, &request.amount) {
                            warn!("Row {}: Invalid amount {:?}", row_num, request.amount);
                        }
                    }
                    Err(e) => warn!("Row {}: {}", row_num, e),
                },
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    /// Number of quotes collected.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns `true` if no quotes were collected.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Writes all quotes as CSV, in the order they were added.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["direction", "input", "send", "receive", "fee", "total", "rate"])?;

        let rate = self.engine.rate().to_string();
        for (input, quote) in &self.quotes {
            csv_writer.write_record([
                quote.direction.to_string(),
                input.clone(),
                quote.send.to_string(),
                quote.receive.to_string(),
                quote.fee.to_string(),
                quote.total.to_string(),
                rate.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_FALLBACK_RATE, DEFAULT_FEE_RATE};
    use crate::rate::ExchangeRate;
    use std::io::Cursor;

    fn quoter() -> BatchQuoter {
        BatchQuoter::new(ConversionEngine::new(
            ExchangeRate::new(DEFAULT_FALLBACK_RATE).unwrap(),
            DEFAULT_FEE_RATE,
        ))
    }

    fn output_of(quoter: &BatchQuoter) -> String {
        let mut output = Vec::new();
        quoter.write_output(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_process_csv_both_directions() {
        let csv = r#"direction,amount
send,100
receive,22.50"#;

        let mut quoter = quoter();
        quoter.process_csv(Cursor::new(csv)).unwrap();

        let output = output_of(&quoter);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "direction,input,send,receive,fee,total,rate");
        assert_eq!(lines[1], "send,100,100.00,22.50,1.00,101.00,0.2245");
        assert_eq!(lines[2], "receive,22.50,100.30,22.50,1.10,101.40,0.2245");
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let csv = r#"direction,amount
send,abc
sideways,10
send,
receive, 1.12
send"#;

        let mut quoter = quoter();
        quoter.process_csv(Cursor::new(csv)).unwrap();

        assert_eq!(quoter.len(), 1);
        assert!(output_of(&quoter).contains("receive,1.12,5.00,1.12,0.10,5.10,0.2245"));
    }

    #[test]
    fn test_push_keeps_input_order() {
        let mut quoter = quoter();
        assert!(quoter.push(Direction::Send, "10"));
        assert!(quoter.push(Direction::Send, "1"));
        assert!(!quoter.push(Direction::Receive, "x"));

        let output = output_of(&quoter);
        let inputs: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(inputs, vec!["10", "1"]);
    }

    #[test]
    fn test_empty_batch_writes_header_only() {
        let quoter = quoter();
        assert!(quoter.is_empty());
        assert_eq!(output_of(&quoter), "direction,input,send,receive,fee,total,rate\n");
    }
}
