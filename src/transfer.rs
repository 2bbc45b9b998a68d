//! Transfer data handed between screens.
//!
//! The data grows as the user moves forward: a [`TransferQuote`] leaves the
//! calculator, and the details screen turns it plus [`TransferDetails`] into
//! an immutable [`TransactionRecord`].

use crate::error::{RemitError, Result};
use crate::money::Money;
use crate::rate::ExchangeRate;
use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Prefix of every transaction reference.
pub const TRANSACTION_PREFIX: &str = "AM";

/// Amounts agreed on the calculator screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuote {
    /// MYR principal.
    pub send_amount: Money,

    /// USD paid to the receiver.
    pub receive_amount: Money,

    /// MYR transfer fee.
    pub fee: Money,

    /// MYR charged in total.
    pub total: Money,

    /// Effective rate the amounts were computed with.
    pub rate: ExchangeRate,
}

/// How the sender pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayMethod {
    #[default]
    MobileWallet,
    BankTransfer,
    CashDeposit,
}

impl PayMethod {
    /// All methods in menu order.
    pub const ALL: [PayMethod; 3] = [
        PayMethod::MobileWallet,
        PayMethod::BankTransfer,
        PayMethod::CashDeposit,
    ];

    /// Name shown on the form and the invoice.
    pub fn label(&self) -> &'static str {
        match self {
            PayMethod::MobileWallet => "Mobile Wallet",
            PayMethod::BankTransfer => "Bank Transfer",
            PayMethod::CashDeposit => "Cash Deposit",
        }
    }
}

impl fmt::Display for PayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PayMethod {
    type Err = String;

    /// Accepts a 1-based menu number or the method name in any case, with
    /// spaces, dashes or underscores between words.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        match normalized.as_str() {
            "1" | "mobilewallet" | "wallet" => Ok(PayMethod::MobileWallet),
            "2" | "banktransfer" | "bank" => Ok(PayMethod::BankTransfer),
            "3" | "cashdeposit" | "cash" => Ok(PayMethod::CashDeposit),
            _ => Err(format!("unknown pay method '{}'", s.trim())),
        }
    }
}

/// Sender and receiver details entered on the details screen.
///
/// Sender name, receiver name and receiver account are required. An empty
/// contact means none was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDetails {
    pub sender_name: String,
    pub sender_contact: String,
    pub pay_method: PayMethod,
    pub receiver_name: String,
    pub receiver_account: String,
}

impl TransferDetails {
    /// Checks that every required field holds more than whitespace.
    pub fn validate(&self) -> Result<()> {
        let required = [&self.sender_name, &self.receiver_name, &self.receiver_account];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(RemitError::MissingRequiredFields);
        }
        Ok(())
    }

    /// Contact with surrounding whitespace removed, if one was given.
    pub fn contact(&self) -> Option<&str> {
        let contact = self.sender_contact.trim();
        (!contact.is_empty()).then_some(contact)
    }
}

/// A submitted transfer as shown on the invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub quote: TransferQuote,
    pub details: TransferDetails,
    /// `AM` followed by six digits.
    pub transaction_id: String,
    /// Local submission time, e.g. `10/16/2026, 3:04:05 PM`.
    pub timestamp: String,
}

impl TransactionRecord {
    /// Validates the details and stamps a new record with a fresh id and the
    /// current local time.
    pub fn submit(quote: TransferQuote, details: &TransferDetails) -> Result<Self> {
        Self::submit_with(quote, details, &mut rand::thread_rng(), &Local::now())
    }

    /// [`TransactionRecord::submit`] with an explicit id source and clock.
    pub fn submit_with<R, Tz>(
        quote: TransferQuote,
        details: &TransferDetails,
        rng: &mut R,
        now: &DateTime<Tz>,
    ) -> Result<Self>
    where
        R: Rng,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        details.validate()?;

        Ok(TransactionRecord {
            quote,
            details: details.clone(),
            transaction_id: generate_transaction_id(rng),
            timestamp: format_timestamp(now),
        })
    }
}

/// Generates a reference of the form `AM123456`.
pub fn generate_transaction_id<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", TRANSACTION_PREFIX, rng.gen_range(100_000..=999_999))
}

/// Formats a timestamp for humans: `M/D/YYYY, h:MM:SS AM`.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    fn quote() -> TransferQuote {
        TransferQuote {
            send_amount: Money::from_str("100").unwrap(),
            receive_amount: Money::from_str("22.5").unwrap(),
            fee: Money::from_str("1").unwrap(),
            total: Money::from_str("101").unwrap(),
            rate: ExchangeRate::new(Decimal::new(2245, 4)).unwrap(),
        }
    }

    fn filled() -> TransferDetails {
        TransferDetails {
            sender_name: "Ali Bin Abu".to_string(),
            sender_contact: "+60123456789".to_string(),
            pay_method: PayMethod::BankTransfer,
            receiver_name: "Abdi Hassan".to_string(),
            receiver_account: "Dahabshiil, 0012345".to_string(),
        }
    }

    #[test]
    fn test_pay_method_defaults_to_mobile_wallet() {
        assert_eq!(TransferDetails::default().pay_method, PayMethod::MobileWallet);
    }

    #[test]
    fn test_pay_method_parse() {
        assert_eq!("1".parse::<PayMethod>().unwrap(), PayMethod::MobileWallet);
        assert_eq!("Bank Transfer".parse::<PayMethod>().unwrap(), PayMethod::BankTransfer);
        assert_eq!("cash-deposit".parse::<PayMethod>().unwrap(), PayMethod::CashDeposit);
        assert_eq!("  bank ".parse::<PayMethod>().unwrap(), PayMethod::BankTransfer);
        assert!("crypto".parse::<PayMethod>().is_err());
        assert!("4".parse::<PayMethod>().is_err());
    }

    #[test]
    fn test_validate_requires_names_and_account() {
        assert!(filled().validate().is_ok());

        let mut details = filled();
        details.sender_contact.clear();
        assert!(details.validate().is_ok());

        for blank in 0..3 {
            let mut details = filled();
            match blank {
                0 => details.sender_name = "   ".to_string(),
                1 => details.receiver_name.clear(),
                _ => details.receiver_account.clear(),
            }
            assert!(matches!(details.validate(), Err(RemitError::MissingRequiredFields)));
        }
    }

    #[test]
    fn test_contact_is_optional() {
        let mut details = filled();
        assert_eq!(details.contact(), Some("+60123456789"));
        details.sender_contact = "  ".to_string();
        assert_eq!(details.contact(), None);
    }

    #[test]
    fn test_transaction_id_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let id = generate_transaction_id(&mut rng);
            assert_eq!(id.len(), 8);
            assert!(id.starts_with("AM"));
            assert!(id[2..].chars().all(|c| c.is_ascii_digit()));
            assert_ne!(&id[2..3], "0");
        }
    }

    #[test]
    fn test_timestamp_format() {
        let time = Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 5).unwrap();
        assert_eq!(format_timestamp(&time), "10/16/2026, 3:04:05 PM");

        let morning = Utc.with_ymd_and_hms(2026, 1, 2, 0, 30, 0).unwrap();
        assert_eq!(format_timestamp(&morning), "1/2/2026, 12:30:00 AM");
    }

    #[test]
    fn test_submit_builds_record() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

        let record = TransactionRecord::submit_with(quote(), &filled(), &mut rng, &now).unwrap();

        assert_eq!(record.quote, quote());
        assert_eq!(record.details, filled());
        assert!(record.transaction_id.starts_with("AM"));
        assert_eq!(record.timestamp, "10/16/2026, 9:00:00 AM");
    }

    #[test]
    fn test_submit_rejects_missing_fields() {
        let mut details = filled();
        details.receiver_account = String::new();

        let result = TransactionRecord::submit(quote(), &details);
        assert!(matches!(result, Err(RemitError::MissingRequiredFields)));
    }
}
