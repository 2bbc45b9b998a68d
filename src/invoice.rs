//! Printable transfer confirmation.

use crate::error::Result;
use crate::rate::{RECEIVE_CURRENCY, SEND_CURRENCY};
use crate::transfer::TransactionRecord;
use log::info;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const RULE: &str = "- - - - - - - - - - - - - - - - - - - -";
const WIDTH: usize = 40;

/// Fee line label, e.g. `Transfer Fee (1%)`.
pub fn fee_label(fee_rate: Decimal) -> String {
    format!("Transfer Fee ({}%)", (fee_rate * Decimal::ONE_HUNDRED).normalize())
}

/// Writes the invoice document for `record`.
pub fn render<W: Write>(record: &TransactionRecord, fee_rate: Decimal, mut out: W) -> Result<()> {
    let quote = &record.quote;
    let details = &record.details;

    writeln!(out, "AmanaRemit")?;
    writeln!(out, "Transfer Successful!")?;
    writeln!(out, "Your AmanaRemit transaction is complete.")?;
    writeln!(out, "Reference: {}", record.transaction_id)?;
    writeln!(out, "{}", record.timestamp)?;
    writeln!(out, "{}", RULE)?;

    line(&mut out, "You Paid", &format!("{} {}", quote.total, SEND_CURRENCY))?;
    line(&mut out, "Receiver Got", &format!("{} {}", quote.receive_amount, RECEIVE_CURRENCY))?;
    writeln!(
        out,
        "Rate Used: 1 {} = {} {}",
        SEND_CURRENCY, quote.rate, RECEIVE_CURRENCY
    )?;
    writeln!(out)?;

    writeln!(out, "BREAKDOWN")?;
    line(&mut out, "Amount Sent (Principal)", &format!("{} {}", quote.send_amount, SEND_CURRENCY))?;
    line(&mut out, &fee_label(fee_rate), &format!("{} {}", quote.fee, SEND_CURRENCY))?;
    line(&mut out, "Total Amount Charged", &format!("{} {}", quote.total, SEND_CURRENCY))?;
    writeln!(out)?;

    writeln!(out, "DETAILS")?;
    match details.contact() {
        Some(contact) => writeln!(out, "Sender: {} ({})", details.sender_name.trim(), contact)?,
        None => writeln!(out, "Sender: {}", details.sender_name.trim())?,
    }
    writeln!(out, "Pay Method: {}", details.pay_method)?;
    writeln!(out, "Receiver: {}", details.receiver_name.trim())?;
    writeln!(out, "Account: {}", details.receiver_account.trim())?;

    out.flush()?;
    Ok(())
}

fn line<W: Write>(out: &mut W, label: &str, value: &str) -> std::io::Result<()> {
    let pad = WIDTH.saturating_sub(label.len()).max(1);
    writeln!(out, "{}{:>pad$}", label, value, pad = pad)
}

/// Saves the invoice as `<dir>/<transaction id>.txt` and returns the path.
pub fn print(record: &TransactionRecord, fee_rate: Decimal, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", record.transaction_id));

    let file = File::create(&path)?;
    render(record, fee_rate, BufWriter::new(file))?;

    info!("Printed invoice {} to {}", record.transaction_id, path.display());
    Ok(path)
}
