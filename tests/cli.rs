//! E2E tests for the reporting commands

use std::process::{Command, Output};

fn zavetax(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "Command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// VAT-inclusive sale plus an invoiced purchase in the same month
#[test]
fn vat_month_json() {
    let output = zavetax(&[
        "vat",
        "-l",
        "tests/data/ledger.json",
        "-m",
        "2024-03",
        "--json",
    ]);
    let json = json_stdout(&output);

    assert_eq!(json["period"], "2024-03");
    assert_eq!(json["total_sales"], "1070.00");
    assert_eq!(json["output_vat"], "70.00");
    assert_eq!(json["total_purchases"], "500.00");
    assert_eq!(json["input_vat"], "35.00");
    assert_eq!(json["net_vat_payable"], "35.00");
}

#[test]
fn vat_month_table() {
    let output = zavetax(&["vat", "-l", "tests/data/ledger.json", "-m", "2024-03"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("VAT REPORT (PP.30)"));
    assert!(stdout.contains("Output VAT"));
    assert!(stdout.contains("VAT PAYABLE: ฿35.00"));
}

/// The CSV file holds the same March transactions as the JSON ledger
#[test]
fn vat_from_csv() {
    let output = zavetax(&[
        "vat",
        "-l",
        "tests/data/transactions.csv",
        "-m",
        "2024-03",
        "--json",
    ]);
    let json = json_stdout(&output);

    assert_eq!(json["output_vat"], "70.00");
    assert_eq!(json["input_vat"], "35.00");
}

#[test]
fn wht_groups_by_rate() {
    let output = zavetax(&[
        "wht",
        "-l",
        "tests/data/ledger.json",
        "-m",
        "2024-03",
        "--json",
    ]);
    let json = json_stdout(&output);

    let buckets = json["buckets"].as_array().expect("buckets array");
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["rate"], "3%");
    assert_eq!(buckets[0]["count"], 1);
    assert_eq!(buckets[0]["tax_amount"], "30.00");
    assert_eq!(json["total"], "30.00");
}

#[test]
fn pnd90_standard_deduction() {
    let output = zavetax(&[
        "pnd",
        "-l",
        "tests/data/ledger.json",
        "-y",
        "2024",
        "--json",
    ]);
    let json = json_stdout(&output);

    assert_eq!(json["form"], "PND 90");
    assert_eq!(json["gross_income"], "1000000.00");
    assert_eq!(json["expense_deduction"], "600000.00");
    // personal 60000 + insurance capped at 100000
    assert_eq!(json["allowance_total"], "160000.00");
    assert_eq!(json["net_taxable_income"], "240000.00");
    assert_eq!(json["tax_payable"], "4500.00");
}

#[test]
fn pnd90_actual_expenses() {
    let output = zavetax(&[
        "pnd",
        "-l",
        "tests/data/ledger.json",
        "-y",
        "2024",
        "--actual-expenses",
        "--json",
    ]);
    let json = json_stdout(&output);

    assert_eq!(json["expense_policy"], "actual");
    assert_eq!(json["expense_deduction"], "209500.00");
    assert_eq!(json["net_taxable_income"], "630500.00");
    assert_eq!(json["tax_payable"], "47075.00");
}

#[test]
fn pnd94_halves_deductions() {
    let output = zavetax(&[
        "pnd",
        "-l",
        "tests/data/ledger.json",
        "-y",
        "2024",
        "--half-year",
        "--json",
    ]);
    let json = json_stdout(&output);

    assert_eq!(json["form"], "PND 94");
    assert_eq!(json["gross_income"], "601070.00");
    assert_eq!(json["allowance_total"], "95000.00");
    assert_eq!(json["net_taxable_income"], "145428.00");
    assert_eq!(json["tax_payable"], "0.00");

    let output = zavetax(&[
        "pnd",
        "-l",
        "tests/data/ledger.json",
        "-y",
        "2024",
        "--half-year",
        "--no-halve",
        "--json",
    ]);
    let json = json_stdout(&output);
    assert_eq!(json["allowance_total"], "160000.00");
    assert_eq!(json["net_taxable_income"], "80428.00");
}

#[test]
fn pnd_table_output() {
    let output = zavetax(&["pnd", "-l", "tests/data/ledger.json", "-y", "2024"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("PND 90 - 2024"));
    assert!(stdout.contains("Net taxable income"));
    assert!(stdout.contains("TAX PAYABLE: ฿4500.00"));
}

#[test]
fn budget_states() {
    let output = zavetax(&[
        "budget",
        "-l",
        "tests/data/ledger.json",
        "-m",
        "2024-03",
        "--json",
    ]);
    let json = json_stdout(&output);

    let budgets = json["budgets"].as_array().expect("budgets array");
    let state_of = |category: &str| {
        budgets
            .iter()
            .find(|b| b["category"] == category)
            .map(|b| b["state"].as_str().unwrap_or_default().to_string())
    };
    assert_eq!(state_of("Food Cost").as_deref(), Some("warning"));
    assert_eq!(state_of("Rent").as_deref(), Some("ok"));
    assert_eq!(state_of("Marketing").as_deref(), Some("ok"));

    let output = zavetax(&[
        "budget",
        "-l",
        "tests/data/ledger.json",
        "-m",
        "2024-10",
        "--json",
    ]);
    let json = json_stdout(&output);
    let rent = json["budgets"]
        .as_array()
        .and_then(|b| b.iter().find(|b| b["category"] == "Rent").cloned())
        .expect("rent budget");
    assert_eq!(rent["state"], "over");
}

#[test]
fn summary_month() {
    let output = zavetax(&["summary", "-l", "tests/data/ledger.json", "-m", "2024-03"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("SUMMARY - 2024-03"));
    assert!(stdout.contains("TREND"));
    assert!(stdout.contains("EXPENSE MIX"));
    assert!(stdout.contains("BUDGETS"));
    assert!(stdout.contains("Food Cost"));
}

#[test]
fn transactions_filter_by_kind() {
    let output = zavetax(&[
        "transactions",
        "-l",
        "tests/data/ledger.json",
        "-y",
        "2024",
        "-k",
        "income",
        "--json",
    ]);
    let json = json_stdout(&output);

    let ids: Vec<_> = json
        .as_array()
        .expect("transaction array")
        .iter()
        .map(|tx| tx["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, ["s3", "s2", "s1"]);
}

#[test]
fn transactions_empty_period() {
    let output = zavetax(&["transactions", "-l", "tests/data/ledger.json", "-m", "2023-01"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No transactions found"));
}

#[test]
fn schema_csv_header() {
    let output = zavetax(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("id,occurred_on,kind,amount,category"));
}

#[test]
fn missing_ledger_fails() {
    let output = zavetax(&["vat", "-l", "tests/data/does_not_exist.json", "-m", "2024-03"]);
    assert!(!output.status.success());
}
