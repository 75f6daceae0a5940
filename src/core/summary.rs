//! Dashboard figures for a single day or month

use super::period::{select, totals, Period, SortOrder};
use super::transaction::Transaction;
use super::vat::calculate_vat;
use super::wht::calculate_wht;
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures for a day or month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub transaction_count: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
    pub output_vat: Decimal,
    pub input_vat: Decimal,
    pub vat_payable: Decimal,
    pub wht_payable: Decimal,
}

pub fn summarize(transactions: &[Transaction], period: &Period) -> PeriodSummary {
    let selected = select(transactions, period, SortOrder::MostRecentFirst);
    let totals = totals(selected.iter().copied());
    let vat = calculate_vat(selected.iter().copied());
    let wht = calculate_wht(selected.iter().copied());

    PeriodSummary {
        period: *period,
        transaction_count: selected.len(),
        total_income: totals.income,
        total_expense: totals.expense,
        net_profit: totals.net_profit(),
        output_vat: vat.output_vat,
        input_vat: vat.input_vat,
        vat_payable: vat.net_vat_payable,
        wht_payable: wht.total,
    }
}
