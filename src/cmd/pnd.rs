//! PND command - personal income tax return (PND 90 annual, PND 94 half-year)

use super::{format_thb, print_table, read_ledger, AmountRow};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use zavetax::core::{calculate_pnd, DeductionScaling, ExpensePolicy, PndForm, PndReturn};

#[derive(Args, Debug)]
pub struct PndCommand {
    /// JSON ledger or CSV transactions file ("-" for stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    /// Calendar tax year
    #[arg(short, long)]
    year: i32,

    /// File the half-year return (PND 94, January-June) instead of PND 90
    #[arg(long)]
    half_year: bool,

    /// Deduct recorded expenses instead of the flat 60% standard deduction
    #[arg(long)]
    actual_expenses: bool,

    /// Apply the annual deduction profile unchanged to PND 94
    #[arg(long, requires = "half_year")]
    no_halve: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PndOutput {
    form: String,
    year: i32,
    expense_policy: ExpensePolicy,
    gross_income: String,
    expense_deduction: String,
    income_after_expenses: String,
    allowance_total: String,
    income_after_allowances: String,
    donation_deduction: String,
    net_taxable_income: String,
    tax_payable: String,
}

impl PndCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = read_ledger(&self.ledger)?;
        let form = if self.half_year {
            PndForm::Pnd94
        } else {
            PndForm::Pnd90
        };
        let policy = if self.actual_expenses {
            ExpensePolicy::Actual
        } else {
            ExpensePolicy::Standard
        };
        let scaling = if self.no_halve {
            DeductionScaling::Annual
        } else {
            DeductionScaling::HalveForHalfYear
        };

        let pnd = calculate_pnd(
            &ledger.transactions,
            form,
            self.year,
            &ledger.deductions,
            policy,
            scaling,
        );

        if self.json {
            self.print_json(&pnd)
        } else {
            self.print_return(&pnd);
            Ok(())
        }
    }

    fn print_return(&self, pnd: &PndReturn) {
        let b = &pnd.breakdown;
        let expense_label = match pnd.expense_policy {
            ExpensePolicy::Standard => "Expenses (standard 60%)",
            ExpensePolicy::Actual => "Expenses (actual)",
        };

        println!();
        println!("{} - {}", pnd.form.display(), pnd.year);
        println!();
        print_table(&[
            AmountRow::new("Gross income", b.gross_income),
            AmountRow::new(expense_label, b.expense_deduction),
            AmountRow::new("Income after expenses", b.income_after_expenses),
            AmountRow::new("Allowances", b.allowance_total),
            AmountRow::new("Income after allowances", b.income_after_allowances),
            AmountRow::new("Donations (capped)", b.donation_deduction),
            AmountRow::new("Net taxable income", b.net_taxable_income),
        ]);
        println!();
        println!("TAX PAYABLE: {}", format_thb(pnd.tax_payable));
        println!();
    }

    fn print_json(&self, pnd: &PndReturn) -> anyhow::Result<()> {
        let b = &pnd.breakdown;
        let data = PndOutput {
            form: pnd.form.display().to_string(),
            year: pnd.year,
            expense_policy: pnd.expense_policy,
            gross_income: format!("{:.2}", b.gross_income),
            expense_deduction: format!("{:.2}", b.expense_deduction),
            income_after_expenses: format!("{:.2}", b.income_after_expenses),
            allowance_total: format!("{:.2}", b.allowance_total),
            income_after_allowances: format!("{:.2}", b.income_after_allowances),
            donation_deduction: format!("{:.2}", b.donation_deduction),
            net_taxable_income: format!("{:.2}", b.net_taxable_income),
            tax_payable: format!("{:.2}", pnd.tax_payable),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
