//! Summary command - dashboard view of a month or a day

use super::budget::print_status;
use super::{format_thb, print_table, read_ledger, PeriodArgs};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use zavetax::core::{
    budget_status_for_period, expense_mix, monthly_trend, recent, select, summarize,
    BudgetStatus, Ledger, MonthlyTrend, Period, PeriodSummary, SortOrder,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// JSON ledger or CSV transactions file ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Number of months in the income/expense trend
    #[arg(long, default_value_t = 6)]
    trend_months: u32,

    /// Number of expense categories to show in the mix
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    period: String,
    transaction_count: usize,
    total_income: String,
    total_expense: String,
    net_profit: String,
    output_vat: String,
    input_vat: String,
    vat_payable: String,
    wht_payable: String,
    trend: Vec<TrendRow>,
    expense_mix: Vec<MixRow>,
    budgets: Vec<BudgetStatus>,
}

#[derive(Debug, Tabled, Serialize)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
}

#[derive(Debug, Tabled, Serialize)]
struct MixRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    amount: String,
}

#[derive(Debug, Tabled)]
struct RecentRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let period = self.period.resolve()?;

        let summary = summarize(&ledger.transactions, &period);
        let trend = self.trend(&ledger, &period);
        let selected = select(&ledger.transactions, &period, SortOrder::MostRecentFirst);
        let mix = expense_mix(selected, self.top);
        let budgets = match period {
            Period::Month { .. } => {
                budget_status_for_period(&ledger.budgets, &ledger.transactions, &period)
            }
            _ => Vec::new(),
        };

        if self.json {
            self.print_json(&summary, &trend, &mix, budgets)
        } else {
            self.print_summary(&summary, &trend, &mix, &budgets, &ledger);
            Ok(())
        }
    }

    /// Trend is only shown for monthly views, ending at the selected month
    fn trend(&self, ledger: &Ledger, period: &Period) -> Vec<MonthlyTrend> {
        match period.date_range() {
            Some((_, end)) if matches!(period, Period::Month { .. }) => {
                monthly_trend(&ledger.transactions, end, self.trend_months)
            }
            _ => Vec::new(),
        }
    }

    fn print_summary(
        &self,
        summary: &PeriodSummary,
        trend: &[MonthlyTrend],
        mix: &[(String, Decimal)],
        budgets: &[BudgetStatus],
        ledger: &Ledger,
    ) {
        println!();
        println!("SUMMARY - {}", summary.period);
        println!();
        println!(
            "  Income: {} | Expense: {} | Net profit: {}",
            format_thb(summary.total_income),
            format_thb(summary.total_expense),
            format_thb(summary.net_profit)
        );
        println!(
            "  Output VAT: {} | Input VAT: {} | VAT payable: {}",
            format_thb(summary.output_vat),
            format_thb(summary.input_vat),
            format_thb(summary.vat_payable)
        );
        println!("  WHT payable: {}", format_thb(summary.wht_payable));
        println!();

        if !trend.is_empty() {
            println!("TREND");
            print_table(&trend_rows(trend, format_thb));
            println!();
        }

        if !mix.is_empty() {
            println!("EXPENSE MIX");
            print_table(&mix_rows(mix, format_thb));
            println!();
        }

        let latest: Vec<_> = recent(&ledger.transactions, &summary.period, 5)
            .into_iter()
            .map(|tx| RecentRow {
                date: tx.occurred_on.format("%Y-%m-%d").to_string(),
                kind: format!("{:?}", tx.kind),
                category: tx.category.clone(),
                amount: format_thb(tx.amount),
            })
            .collect();
        if !latest.is_empty() {
            println!("RECENT");
            print_table(&latest);
        }

        if matches!(summary.period, Period::Month { .. }) {
            print_status(budgets, &summary.period);
        }
    }

    fn print_json(
        &self,
        summary: &PeriodSummary,
        trend: &[MonthlyTrend],
        mix: &[(String, Decimal)],
        budgets: Vec<BudgetStatus>,
    ) -> anyhow::Result<()> {
        let two_dp = |d: Decimal| format!("{:.2}", d);
        let data = SummaryData {
            period: summary.period.display(),
            transaction_count: summary.transaction_count,
            total_income: two_dp(summary.total_income),
            total_expense: two_dp(summary.total_expense),
            net_profit: two_dp(summary.net_profit),
            output_vat: two_dp(summary.output_vat),
            input_vat: two_dp(summary.input_vat),
            vat_payable: two_dp(summary.vat_payable),
            wht_payable: two_dp(summary.wht_payable),
            trend: trend_rows(trend, two_dp),
            expense_mix: mix_rows(mix, two_dp),
            budgets,
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

fn trend_rows(trend: &[MonthlyTrend], fmt: impl Fn(Decimal) -> String) -> Vec<TrendRow> {
    trend
        .iter()
        .map(|m| TrendRow {
            month: format!("{}-{:02}", m.year, m.month),
            income: fmt(m.income),
            expense: fmt(m.expense),
        })
        .collect()
}

fn mix_rows(mix: &[(String, Decimal)], fmt: impl Fn(Decimal) -> String) -> Vec<MixRow> {
    mix.iter()
        .map(|(category, amount)| MixRow {
            category: category.clone(),
            amount: fmt(*amount),
        })
        .collect()
}
