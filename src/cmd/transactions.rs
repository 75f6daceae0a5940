//! Transactions command - list the transactions selected for a period

use super::{format_thb, print_table, read_ledger, PeriodArgs};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tabled::Tabled;
use zavetax::core::{by_kind, select, SortOrder, Transaction, TransactionKind};

#[derive(Args, Debug)]
pub struct TransactionsCommand {
    /// JSON ledger or CSV transactions file ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Only show income or expenses
    #[arg(short, long, value_enum)]
    kind: Option<KindFilter>,

    /// Listing order
    #[arg(short, long, value_enum, default_value_t = OrderArg::Recent)]
    order: OrderArg,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindFilter {
    Income,
    Expense,
}

impl From<KindFilter> for TransactionKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::Income => TransactionKind::Income,
            KindFilter::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OrderArg {
    /// Most recent first
    #[default]
    Recent,
    /// Oldest first
    Ascending,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Recent => SortOrder::MostRecentFirst,
            OrderArg::Ascending => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        let tax = match (tx.kind, tx.tax_invoice(), tx.wht_rate()) {
            (TransactionKind::Income, _, _) => format!("{:?}", tx.vat_mode()),
            (TransactionKind::Expense, invoice, rate) => {
                let mut parts = Vec::new();
                if invoice {
                    parts.push("Tax invoice".to_string());
                }
                if let Some(rate) = rate {
                    parts.push(format!("WHT {}", rate));
                }
                parts.join(", ")
            }
        };
        TransactionRow {
            id: tx.id.clone(),
            date: tx.occurred_on.format("%Y-%m-%d").to_string(),
            kind: format!("{:?}", tx.kind),
            category: tx.category.clone(),
            amount: format_thb(tx.amount),
            tax,
            note: tx.note.clone().unwrap_or_default(),
        }
    }
}

impl TransactionsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let period = self.period.resolve()?;
        let mut selected = select(&ledger.transactions, &period, self.order.into());
        if let Some(kind) = self.kind {
            selected = by_kind(selected, kind.into());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&selected)?);
        } else if selected.is_empty() {
            println!("No transactions found for {}", period);
        } else {
            let rows: Vec<TransactionRow> = selected.into_iter().map(TransactionRow::from).collect();
            print_table(&rows);
        }
        Ok(())
    }
}
