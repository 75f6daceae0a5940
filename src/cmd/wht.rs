//! WHT command - withholding tax to remit, grouped by rate

use super::{format_thb, print_table, read_ledger, PeriodArgs};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use zavetax::core::{calculate_wht, select, Period, SortOrder, WhtReport};

#[derive(Args, Debug)]
pub struct WhtCommand {
    /// JSON ledger or CSV transactions file ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct WhtRow {
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Base Amount")]
    base_amount: String,
    #[tabled(rename = "WHT")]
    tax_amount: String,
}

#[derive(Debug, Serialize)]
struct WhtOutput {
    period: String,
    buckets: Vec<WhtRow>,
    total: String,
}

impl WhtCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let period = self.period.resolve()?;
        let selected = select(&ledger.transactions, &period, SortOrder::MostRecentFirst);
        let report = calculate_wht(selected);

        if self.json {
            self.print_json(&report, &period)
        } else {
            self.print_report(&report, &period);
            Ok(())
        }
    }

    fn print_report(&self, report: &WhtReport, period: &Period) {
        println!();
        println!("WITHHOLDING TAX - {}", period);
        println!();
        if report.buckets.is_empty() {
            println!("No expenses subject to withholding");
        } else {
            let rows: Vec<_> = report
                .buckets
                .iter()
                .map(|b| WhtRow {
                    rate: b.rate.to_string(),
                    count: b.count,
                    base_amount: format_thb(b.base_amount),
                    tax_amount: format_thb(b.tax_amount),
                })
                .collect();
            print_table(&rows);
        }
        println!();
        println!("TOTAL WHT TO REMIT: {}", format_thb(report.total));
        println!();
    }

    fn print_json(&self, report: &WhtReport, period: &Period) -> anyhow::Result<()> {
        let data = WhtOutput {
            period: period.display(),
            buckets: report
                .buckets
                .iter()
                .map(|b| WhtRow {
                    rate: b.rate.to_string(),
                    count: b.count,
                    base_amount: format!("{:.2}", b.base_amount),
                    tax_amount: format!("{:.2}", b.tax_amount),
                })
                .collect(),
            total: format!("{:.2}", report.total),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
