//! Edge case tests for the conversion engine and calculator fields.

use amana_remit::{BatchQuoter, Calculator, ConversionEngine, ExchangeRate, Money};
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn engine_at(rate: &str) -> ConversionEngine {
    ConversionEngine::new(ExchangeRate::new(dec(rate)).unwrap(), dec("0.01"))
}

fn run_csv(csv: &str) -> String {
    let mut quoter = BatchQuoter::new(engine_at("0.2245"));
    quoter.process_csv(Cursor::new(csv)).unwrap();

    let mut output = Vec::new();
    quoter.write_output(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Returns (send, receive, fee, total) of the first quote for `input`.
fn quote_line(output: &str, input: &str) -> Option<(String, String, String, String)> {
    output
        .lines()
        .skip(1) // Skip header
        .map(|line| line.split(',').collect::<Vec<_>>())
        .find(|parts| parts[1] == input)
        .map(|parts| {
            (
                parts[2].to_string(),
                parts[3].to_string(),
                parts[4].to_string(),
                parts[5].to_string(),
            )
        })
}

// ==================== SEND EDGE CASES ====================

#[test]
fn test_send_one_cent_rounds_everything_up() {
    let output = run_csv("direction,amount\nsend,0.01");
    let (send, receive, fee, total) = quote_line(&output, "0.01").unwrap();

    assert_eq!(send, "0.01");
    assert_eq!(receive, "0.10");
    assert_eq!(fee, "0.10");
    // 0.01 + 0.10 = 0.11 -> 0.20
    assert_eq!(total, "0.20");
}

#[test]
fn test_send_large_amount() {
    let output = run_csv("direction,amount\nsend,1000000");
    let (_, receive, fee, total) = quote_line(&output, "1000000").unwrap();

    assert_eq!(receive, "224500.00");
    assert_eq!(fee, "10000.00");
    assert_eq!(total, "1010000.00");
}

#[test]
fn test_send_scientific_notation() {
    let output = run_csv("direction,amount\nsend,1e2");
    let (send, receive, _, total) = quote_line(&output, "1e2").unwrap();

    assert_eq!(send, "100.00");
    assert_eq!(receive, "22.50");
    assert_eq!(total, "101.00");
}

#[test]
fn test_send_already_on_a_tenth_is_not_bumped() {
    let output = run_csv("direction,amount\nsend,1000");
    let (_, receive, fee, total) = quote_line(&output, "1000").unwrap();

    assert_eq!(receive, "224.50");
    assert_eq!(fee, "10.00");
    assert_eq!(total, "1010.00");
}

#[test]
fn test_send_zero() {
    let output = run_csv("direction,amount\nsend,0");
    let (send, receive, fee, total) = quote_line(&output, "0").unwrap();

    assert_eq!(send, "0.00");
    assert_eq!(receive, "0.00");
    assert_eq!(fee, "0.00");
    assert_eq!(total, "0.00");
}

// ==================== RECEIVE EDGE CASES ====================

#[test]
fn test_receive_fee_uses_rounded_send() {
    let output = run_csv("direction,amount\nreceive,22.50");
    let (send, _, fee, total) = quote_line(&output, "22.50").unwrap();

    // 22.50 / 0.2245 = 100.22.. -> 100.30; fee on 100.30 = 1.003 -> 1.10
    assert_eq!(send, "100.30");
    assert_eq!(fee, "1.10");
    assert_eq!(total, "101.40");
}

#[test]
fn test_receive_one_cent() {
    let output = run_csv("direction,amount\nreceive,0.01");
    let (send, receive, fee, total) = quote_line(&output, "0.01").unwrap();

    assert_eq!(send, "0.10");
    assert_eq!(receive, "0.01");
    assert_eq!(fee, "0.10");
    assert_eq!(total, "0.20");
}

// ==================== INVALID INPUT ====================

#[test]
fn test_invalid_rows_produce_no_quotes() {
    let output = run_csv(
        "direction,amount\nsend,\nsend,ten\nreceive,--1\nboth,10\nsend",
    );
    assert_eq!(output.lines().count(), 1);
}

#[test]
fn test_whitespace_handling() {
    let output = run_csv("direction, amount\n send , 100 ");
    assert!(quote_line(&output, "100").is_some());
}

// ==================== CALCULATOR FIELDS ====================

#[test]
fn test_round_trip_is_not_exact() {
    let mut calc = Calculator::new(engine_at("0.2245"));

    calc.edit_send("100");
    let derived = calc.receive().to_string();
    calc.edit_receive(&derived);

    assert_eq!(derived, "22.50");
    assert_eq!(calc.send(), "100.30");
}

#[test]
fn test_clearing_either_field_resets_charges() {
    let mut calc = Calculator::new(engine_at("0.2245"));

    calc.edit_send("250");
    assert_ne!(calc.total(), Money::ZERO);
    calc.edit_send("");
    assert_eq!(calc.receive(), "");
    assert_eq!(calc.fee().to_string(), "0.00");
    assert_eq!(calc.total().to_string(), "0.00");

    calc.edit_receive("40");
    assert_ne!(calc.total(), Money::ZERO);
    calc.edit_receive("4O");
    assert_eq!(calc.send(), "");
    assert_eq!(calc.fee().to_string(), "0.00");
    assert_eq!(calc.total().to_string(), "0.00");
}

#[test]
fn test_total_is_rounded_send_plus_fee_everywhere() {
    let engine = engine_at("0.2245");

    for cents in (1..=200_000i64).step_by(37) {
        let amount = Decimal::new(cents, 2);
        let quote = engine.from_send(amount);

        assert!(quote.fee.value() >= amount * dec("0.01"));
        assert_eq!(quote.total, Money::round_up(amount + quote.fee.value()));
        assert!(quote.receive.value() >= amount * dec("0.2245"));
    }
}

#[test]
fn test_margin_rate_quotes() {
    // 0.2293 spot with the 0.979 margin
    let engine = engine_at("0.2244847");
    let quote = engine.from_send(dec("100"));

    assert_eq!(quote.receive.to_string(), "22.50");
    assert_eq!(engine.rate().to_string(), "0.2245");
}
