//! VAT command - PP.30 output/input VAT for a period

use super::{format_thb, print_table, read_ledger, AmountRow, PeriodArgs};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use zavetax::core::{calculate_vat, select, Period, SortOrder, VatReport};

#[derive(Args, Debug)]
pub struct VatCommand {
    /// JSON ledger or CSV transactions file ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct VatOutput {
    period: String,
    total_sales: String,
    output_vat: String,
    total_purchases: String,
    input_vat: String,
    net_vat_payable: String,
}

impl VatCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let period = self.period.resolve()?;
        let selected = select(&ledger.transactions, &period, SortOrder::MostRecentFirst);
        let report = calculate_vat(selected);

        if self.json {
            self.print_json(&report, &period)
        } else {
            self.print_report(&report, &period);
            Ok(())
        }
    }

    fn print_report(&self, report: &VatReport, period: &Period) {
        println!();
        println!("VAT REPORT (PP.30) - {}", period);
        println!();
        print_table(&[
            AmountRow::new("Sales", report.total_sales),
            AmountRow::new("Output VAT", report.output_vat),
            AmountRow::new("Purchases (tax invoice)", report.total_purchases),
            AmountRow::new("Input VAT", report.input_vat),
        ]);
        println!();
        if report.net_vat_payable < Decimal::ZERO {
            println!("VAT CREDIT: {}", format_thb(report.net_vat_payable.abs()));
        } else {
            println!("VAT PAYABLE: {}", format_thb(report.net_vat_payable));
        }
        println!();
    }

    fn print_json(&self, report: &VatReport, period: &Period) -> anyhow::Result<()> {
        let data = VatOutput {
            period: period.display(),
            total_sales: format!("{:.2}", report.total_sales),
            output_vat: format!("{:.2}", report.output_vat),
            total_purchases: format!("{:.2}", report.total_purchases),
            input_vat: format!("{:.2}", report.input_vat),
            net_vat_payable: format!("{:.2}", report.net_vat_payable),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
