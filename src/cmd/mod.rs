pub mod budget;
pub mod pnd;
pub mod schema;
pub mod summary;
pub mod transactions;
pub mod vat;
pub mod wht;

use anyhow::Context;
use chrono::Datelike;
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tabled::settings::{object::Rows, Alignment, Modify, Style};
use tabled::{Table, Tabled};
use zavetax::core::{read_ledger_json, read_transactions_csv, Half, Ledger, Period, PeriodError};

/// Read a ledger (JSON, or CSV transactions only) from a file or stdin with "-"
pub fn read_ledger(path: &Path) -> anyhow::Result<Ledger> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let ledger = if is_csv {
        Ledger::from_transactions(read_transactions_csv(BufReader::new(file))?)?
    } else {
        read_ledger_json(BufReader::new(file))?
    };
    Ok(ledger)
}

fn read_from_stdin() -> anyhow::Result<Ledger> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(read_ledger_json(io::Cursor::new(buffer))?)
}

/// Period selection shared by the reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["month", "year"])]
    date: Option<String>,

    /// Month (YYYY-MM)
    #[arg(short, long, conflicts_with = "year")]
    month: Option<String>,

    /// Calendar year
    #[arg(short, long)]
    year: Option<i32>,

    /// Half of the year: 1 = January-June, 2 = July-December (requires --year)
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u8).range(1..=2))]
    half: Option<u8>,
}

impl PeriodArgs {
    /// Resolve the selected period, defaulting to the current month
    pub fn resolve(&self) -> Result<Period, PeriodError> {
        if let Some(date) = &self.date {
            return Period::parse_day(date);
        }
        if let Some(month) = &self.month {
            return Period::parse_month(month);
        }
        match (self.year, self.half) {
            (Some(year), Some(half)) => Ok(Period::HalfYear {
                year,
                half: Half::try_from(half)?,
            }),
            (Some(year), None) => Ok(Period::Year(year)),
            (None, _) => {
                let today = chrono::Local::now().date_naive();
                Ok(Period::Month {
                    year: today.year(),
                    month: today.month(),
                })
            }
        }
    }
}

pub fn format_thb(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-฿{:.2}", amount.abs())
    } else {
        format!("฿{:.2}", amount)
    }
}

pub fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Label/amount row used by the two-column reports
#[derive(Debug, Clone, Tabled)]
pub struct AmountRow {
    #[tabled(rename = "Item")]
    pub label: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
}

impl AmountRow {
    pub fn new(label: &str, amount: Decimal) -> Self {
        AmountRow {
            label: label.to_string(),
            amount: format_thb(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_baht() {
        assert_eq!(format_thb(dec!(1234.5)), "฿1234.50");
        assert_eq!(format_thb(dec!(-35)), "-฿35.00");
    }

    #[test]
    fn resolves_explicit_periods() {
        let args = PeriodArgs {
            year: Some(2024),
            half: Some(2),
            ..Default::default()
        };
        assert_eq!(
            args.resolve(),
            Ok(Period::HalfYear {
                year: 2024,
                half: Half::Second
            })
        );

        let args = PeriodArgs {
            month: Some("2024-02".to_string()),
            ..Default::default()
        };
        assert_eq!(args.resolve(), Ok(Period::Month { year: 2024, month: 2 }));

        let args = PeriodArgs {
            date: Some("not-a-date".to_string()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
