//! Budget command - spending against each category budget

use super::{format_thb, print_table, read_ledger, PeriodArgs};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use zavetax::core::{budget_status_for_period, BudgetStatus, Period};

#[derive(Args, Debug)]
pub struct BudgetCommand {
    /// JSON ledger containing budgets and transactions ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
pub struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    ceiling_amount: String,
    #[tabled(rename = "Spent")]
    spent_amount: String,
    #[tabled(rename = "Used")]
    used_pct: String,
    #[tabled(rename = "Status")]
    state: String,
}

impl BudgetRow {
    pub fn from_status(status: &BudgetStatus) -> Self {
        let used = if status.ceiling_amount.is_zero() {
            Decimal::ZERO
        } else {
            status.spent_amount / status.ceiling_amount * dec!(100)
        };
        BudgetRow {
            category: status.category.clone(),
            ceiling_amount: format_thb(status.ceiling_amount),
            spent_amount: format_thb(status.spent_amount),
            used_pct: format!("{:.0}%", used),
            state: status.state.display().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BudgetOutput<'a> {
    period: String,
    budgets: &'a [BudgetStatus],
}

impl BudgetCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let period = self.period.resolve()?;
        let status = budget_status_for_period(&ledger.budgets, &ledger.transactions, &period);

        if self.json {
            let data = BudgetOutput {
                period: period.display(),
                budgets: &status,
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_status(&status, &period);
        }
        Ok(())
    }
}

pub fn print_status(status: &[BudgetStatus], period: &Period) {
    println!();
    println!("BUDGETS - {}", period);
    println!();
    if status.is_empty() {
        println!("No budgets configured");
    } else {
        let rows: Vec<_> = status.iter().map(BudgetRow::from_status).collect();
        print_table(&rows);
    }
    println!();
}
