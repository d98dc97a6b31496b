//! E2E tests for the quote, rates and schema commands

use std::process::Command;

fn vedc(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test quoting a mixed batch from CSV, one vehicle per era plus an unresolvable plate
#[test]
fn quote_csv_batch() {
    let output = vedc(&[
        "quote",
        "-v",
        "tests/data/vehicles.csv",
        "--as-of",
        "2026-10-19",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    // 6 month band C plus commission
    assert!(stdout.contains("69.25"));
    // pre-2001 1550cc and over
    assert!(stdout.contains("410.00"));
    // standard rate, supplement expired
    assert!(stdout.contains("245.00"));
    // N1 Euro 6
    assert!(stdout.contains("395.00"));
    // direct debit only
    assert!(stdout.contains("60.00"));
    assert!(stdout.contains("unresolved_registration_date"));
}

/// Test CSV output carries the notes column
#[test]
fn quote_csv_output() {
    let output = vedc(&[
        "quote",
        "-v",
        "tests/data/vehicles.csv",
        "--as-of",
        "2026-10-19",
        "--csv",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.starts_with("registration,registered,era,band"));
    assert!(stdout.contains("notes"));
    assert!(stdout.contains("AB12CDE,2012-03-01"));
    assert!(stdout.contains("Unable to determine registration date"));
    assert_eq!(stdout.lines().count(), 6);
}

/// Test JSON input with the expensive car supplement
#[test]
fn quote_json_input() {
    let output = vedc(&[
        "quote",
        "-v",
        "tests/data/vehicles.json",
        "--as-of",
        "2026-10-19",
        "--json",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON output");
    assert_eq!(value["as_of"], "2026-10-19");
    assert_eq!(value["rate_table"].as_str().map(str::len), Some(64));

    let quotes = value["quotes"].as_array().expect("quotes array");
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[1]["calculation"]["reason"], "luxury_surcharge");
    assert_eq!(quotes[1]["quote"]["total"], "670.00");
}

/// Test a single vehicle given by flags
#[test]
fn quote_single_vehicle() {
    let output = vedc(&[
        "quote",
        "--registration",
        "AB12CDE",
        "--co2",
        "120",
        "--preference",
        "six-months",
        "--as-of",
        "2026-10-19",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("69.25"));
}

/// Test quote without any vehicle fails
#[test]
fn quote_requires_vehicle() {
    let output = vedc(&["quote", "--as-of", "2026-10-19"]);
    assert!(!output.status.success());
}

/// Test inline vehicle flags cannot be mixed with a vehicles file
#[test]
fn quote_file_with_inline_flags_rejected() {
    let output = vedc(&[
        "quote",
        "-v",
        "tests/data/vehicles.csv",
        "--co2",
        "999",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("cannot be used with"), "unexpected error: {}", stderr);
}

/// Test the built-in rate table lists every era
#[test]
fn rates_builtin() {
    let output = vedc(&["rates"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("1550cc and over"));
    assert!(stdout.contains("256+ g/km"));
    assert!(stdout.contains("TC39"));
    assert!(stdout.contains("at or above"));
}

/// Test a rate table with a gap is refused
#[test]
fn rates_with_gap_rejected() {
    let output = vedc(&["rates", "--rates", "tests/data/gapped_rates.json"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("gap"), "unexpected error: {}", stderr);
}

/// Test the vehicles JSON schema
#[test]
fn schema_vehicle_json() {
    let output = vedc(&["schema", "vehicle-json"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("registration_number"));
    assert!(stdout.contains("tax_preference"));
}
