use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "zavetax",
    version,
    about = "Calculate Thai VAT, withholding tax, personal income tax and budget status"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// VAT report (PP.30) for a period
    Vat(cmd::vat::VatCommand),
    /// Withholding tax to remit for a period
    Wht(cmd::wht::WhtCommand),
    /// Personal income tax return (PND 90 / PND 94)
    Pnd(cmd::pnd::PndCommand),
    /// Budget status for a period
    Budget(cmd::budget::BudgetCommand),
    /// Dashboard summary for a month or a day
    Summary(cmd::summary::SummaryCommand),
    /// List transactions for a period
    Transactions(cmd::transactions::TransactionsCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Vat(vat) => vat.exec(),
        Command::Wht(wht) => wht.exec(),
        Command::Pnd(pnd) => pnd.exec(),
        Command::Budget(budget) => budget.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Transactions(transactions) => transactions.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
