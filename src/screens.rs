//! Terminal screens: calculator, details and invoice.
//!
//! Screens read one command per line and render to any writer, so a whole
//! session can be scripted. Each screen returns a [`Navigation`] carrying the
//! state the next screen needs; the [`App`] loop resolves it.

use crate::config::Config;
use crate::error::{RemitError, Result};
use crate::invoice;
use crate::navigation::{resolve, Handoff, Navigation, Route, Screen};
use crate::quote::{Calculator, ConversionEngine};
use crate::rate::{RateProvider, RECEIVE_CURRENCY, SEND_CURRENCY};
use crate::transfer::{PayMethod, TransactionRecord, TransferDetails, TransferQuote};
use log::debug;
use std::io::{BufRead, Write};

const BRAND: &str = "AmanaRemit";
const REQUIRED_FIELDS_ALERT: &str = "Please fill in all required fields";

const CALCULATOR_HELP: &str = "\
Commands:
  send <MYR>       set the amount you send
  receive <USD>    set the amount they receive
  next             continue to details
  go <path>        open a path (/, /details, /invoice)
  quit             exit";

const DETAILS_HELP: &str = "\
Commands:
  sender <name>      sender full name (required)
  contact <phone>    sender contact (optional)
  method <1|2|3>     pay method: 1 Mobile Wallet, 2 Bank Transfer, 3 Cash Deposit
  receiver <name>    receiver full name (required)
  account <details>  receiver account details (required)
  show               show the form
  submit             confirm and pay
  back               return to the calculator
  go <path>          open a path
  quit               exit";

const INVOICE_HELP: &str = "\
Commands:
  print       save the invoice to a file
  new         make another transfer
  go <path>   open a path
  quit        exit";

/// Drives the three screens over a line-based input and an output writer.
pub struct App<R, W> {
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Creates an app reading commands from `input` and rendering to `output`.
    pub fn new(config: Config, input: R, output: W) -> Self {
        App {
            config,
            input,
            output,
        }
    }

    /// Runs from `/` until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.run_from("/")
    }

    /// Runs starting at `path`. Paths other than `/` redirect, as they carry
    /// no transfer state.
    pub fn run_from(&mut self, path: &str) -> Result<()> {
        let mut screen = resolve(Route::parse(path), Handoff::Empty);

        loop {
            let next = match screen {
                Screen::Calculator => self.calculator()?,
                Screen::Details(quote) => self.details(quote)?,
                Screen::Invoice(record) => self.invoice(record)?,
            };

            match next {
                Navigation::To(route, handoff) => screen = resolve(route, handoff),
                Navigation::Exit => {
                    self.output.flush()?;
                    return Ok(());
                }
            }
        }
    }

    /// Reads the next command as `(name, argument)`. `None` at end of input.
    fn read_command(&mut self, prompt: &str) -> Result<Option<(String, String)>> {
        write!(self.output, "{}> ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        let trimmed = line.trim();
        let (name, arg) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        Ok(Some((name.to_lowercase(), arg.trim().to_string())))
    }

    fn unknown(&mut self, name: &str) -> Result<()> {
        if !name.is_empty() {
            writeln!(self.output, "Unknown command '{}'. Type 'help'.", name)?;
        }
        Ok(())
    }

    fn calculator(&mut self) -> Result<Navigation> {
        writeln!(self.output, "\n{}", BRAND)?;

        let mut provider = RateProvider::new(&self.config);
        if provider.is_loading() {
            writeln!(self.output, "Loading rate...")?;
            provider.start();
        }
        let rate = provider.rate();
        writeln!(self.output, "{}", rate.badge())?;

        let mut calc = Calculator::new(ConversionEngine::new(rate, self.config.fee_rate));
        self.render_calculator(&calc)?;

        loop {
            let Some((name, arg)) = self.read_command("calculator")? else {
                return Ok(Navigation::Exit);
            };

            if let Some(loaded) = provider.poll() {
                if loaded != calc.rate() {
                    calc.set_rate(loaded);
                    writeln!(self.output, "Rate updated\n{}", loaded.badge())?;
                }
            }

            match name.as_str() {
                "send" | "s" => {
                    calc.edit_send(&arg);
                    self.render_calculator(&calc)?;
                }
                "receive" | "r" => {
                    calc.edit_receive(&arg);
                    self.render_calculator(&calc)?;
                }
                "next" | "n" => match calc.handoff() {
                    Some(quote) => return Ok(Navigation::To(Route::Details, Handoff::Quote(quote))),
                    None => writeln!(self.output, "Enter an amount to send first.")?,
                },
                "go" => return Ok(Navigation::to_path(&arg)),
                "help" | "?" => writeln!(self.output, "{}", CALCULATOR_HELP)?,
                "quit" | "exit" | "q" => return Ok(Navigation::Exit),
                other => self.unknown(other)?,
            }
        }
    }

    fn render_calculator(&mut self, calc: &Calculator) -> Result<()> {
        writeln!(self.output, "You send:       {} {}", or_placeholder(calc.send()), SEND_CURRENCY)?;
        writeln!(self.output, "They receive:   {} {}", or_placeholder(calc.receive()), RECEIVE_CURRENCY)?;
        writeln!(
            self.output,
            "{}: {} {}",
            invoice::fee_label(self.config.fee_rate),
            calc.fee(),
            SEND_CURRENCY
        )?;
        writeln!(self.output, "Total to Pay:   {} {}", calc.total(), SEND_CURRENCY)?;
        Ok(())
    }

    fn details(&mut self, quote: TransferQuote) -> Result<Navigation> {
        writeln!(self.output, "\nDetails  ({})", BRAND)?;
        writeln!(
            self.output,
            "Sending {} {}. Receiver gets {} {}.",
            quote.total, SEND_CURRENCY, quote.receive_amount, RECEIVE_CURRENCY
        )?;

        let mut form = TransferDetails::default();
        self.render_form(&form)?;

        loop {
            let Some((name, arg)) = self.read_command("details")? else {
                return Ok(Navigation::Exit);
            };

            match name.as_str() {
                "sender" => form.sender_name = arg,
                "contact" => form.sender_contact = arg,
                "receiver" => form.receiver_name = arg,
                "account" => form.receiver_account = arg,
                "method" => match arg.parse::<PayMethod>() {
                    Ok(method) => form.pay_method = method,
                    Err(e) => {
                        writeln!(self.output, "{}", e)?;
                        self.render_methods()?;
                    }
                },
                "show" => self.render_form(&form)?,
                "submit" => match TransactionRecord::submit(quote.clone(), &form) {
                    Ok(record) => {
                        debug!("Submitted transfer {}", record.transaction_id);
                        return Ok(Navigation::To(Route::Invoice, Handoff::Record(record)));
                    }
                    Err(RemitError::MissingRequiredFields) => {
                        writeln!(self.output, "! {}", REQUIRED_FIELDS_ALERT)?;
                    }
                    Err(e) => return Err(e),
                },
                "back" => return Ok(Navigation::To(Route::Calculator, Handoff::Empty)),
                "go" => return Ok(Navigation::to_path(&arg)),
                "help" | "?" => writeln!(self.output, "{}", DETAILS_HELP)?,
                "quit" | "exit" | "q" => return Ok(Navigation::Exit),
                other => self.unknown(other)?,
            }
        }
    }

    fn render_form(&mut self, form: &TransferDetails) -> Result<()> {
        writeln!(self.output, "Sender Full Name:          {}", form.sender_name)?;
        writeln!(self.output, "Sender Contact / Phone:    {}", form.sender_contact)?;
        writeln!(self.output, "Pay Method (Sender):       {}", form.pay_method)?;
        writeln!(self.output, "Receiver Full Name:        {}", form.receiver_name)?;
        writeln!(self.output, "Receiver Account Details:  {}", form.receiver_account)?;
        Ok(())
    }

    fn render_methods(&mut self) -> Result<()> {
        for (idx, method) in PayMethod::ALL.iter().enumerate() {
            writeln!(self.output, "  {} {}", idx + 1, method)?;
        }
        Ok(())
    }

    fn invoice(&mut self, record: TransactionRecord) -> Result<Navigation> {
        writeln!(self.output)?;
        invoice::render(&record, self.config.fee_rate, &mut self.output)?;

        loop {
            let Some((name, arg)) = self.read_command("invoice")? else {
                return Ok(Navigation::Exit);
            };

            match name.as_str() {
                "print" | "p" => {
                    let path = invoice::print(&record, self.config.fee_rate, &self.config.invoice_dir)?;
                    writeln!(self.output, "Saved invoice to {}", path.display())?;
                }
                "new" => return Ok(Navigation::To(Route::Calculator, Handoff::Empty)),
                "go" => return Ok(Navigation::to_path(&arg)),
                "help" | "?" => writeln!(self.output, "{}", INVOICE_HELP)?,
                "quit" | "exit" | "q" => return Ok(Navigation::Exit),
                other => self.unknown(other)?,
            }
        }
    }
}

fn or_placeholder(field: &str) -> &str {
    if field.is_empty() {
        "0.00"
    } else {
        field
    }
}
