//! VAT extraction and the PP.30 (monthly VAT return) figures

use super::period::{by_kind, tax_invoice_expenses};
use super::th::VAT_RATE;
use super::transaction::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How VAT relates to a recorded amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VatMode {
    /// Amount already contains 7% VAT
    #[serde(alias = "vat_inc")]
    VatInclusive,
    /// Amount is the pre-tax base, VAT is added on top
    #[serde(alias = "vat_exc")]
    VatExclusive,
    #[default]
    NoVat,
}

/// VAT component of `amount` under `mode`.
///
/// Inclusive amounts extract `amount * 7/107` so that `amount - vat` is the
/// pre-tax base. Inputs are expected to be validated and non-negative.
pub fn vat(amount: Decimal, mode: VatMode) -> Decimal {
    match mode {
        VatMode::NoVat => Decimal::ZERO,
        VatMode::VatInclusive => amount * dec!(7) / dec!(107),
        VatMode::VatExclusive => amount * VAT_RATE,
    }
}

/// VAT position for a selection of transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VatReport {
    /// Sum of income face values
    pub total_sales: Decimal,
    /// VAT collected on sales
    pub output_vat: Decimal,
    /// Sum of expenses backed by a tax invoice
    pub total_purchases: Decimal,
    /// VAT claimable on purchases with a tax invoice
    pub input_vat: Decimal,
    /// Output VAT less input VAT; negative means a refundable credit
    pub net_vat_payable: Decimal,
}

/// Output VAT from income and input VAT from tax-invoiced expenses.
///
/// Expense amounts are treated as the pre-tax base, so input VAT is 7% on top.
pub fn calculate_vat<'a, I>(transactions: I) -> VatReport
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let transactions: Vec<&Transaction> = transactions.into_iter().collect();
    let mut report = VatReport::default();
    for tx in by_kind(transactions.iter().copied(), TransactionKind::Income) {
        report.total_sales += tx.amount;
        report.output_vat += vat(tx.amount, tx.vat_mode());
    }
    for tx in tax_invoice_expenses(transactions) {
        report.total_purchases += tx.amount;
        report.input_vat += vat(tx.amount, VatMode::VatExclusive);
    }
    report.net_vat_payable = report.output_vat - report.input_vat;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(id: &str, kind: TransactionKind, amount: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            amount,
            category: "General".to_string(),
            occurred_on: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            tax_mode: None,
            has_tax_invoice: false,
            withholding_rate: None,
            note: None,
        }
    }

    #[test]
    fn no_vat_is_zero() {
        for amount in [dec!(0), dec!(1), dec!(107), dec!(123456.78)] {
            assert_eq!(vat(amount, VatMode::NoVat), Decimal::ZERO);
        }
    }

    #[test]
    fn inclusive_extracts_seven_over_one_hundred_seven() {
        assert_eq!(vat(dec!(107), VatMode::VatInclusive), dec!(7));
        assert_eq!(vat(dec!(1070), VatMode::VatInclusive), dec!(70));
        assert_eq!(dec!(1070) - vat(dec!(1070), VatMode::VatInclusive), dec!(1000));
    }

    #[test]
    fn exclusive_adds_seven_percent() {
        assert_eq!(vat(dec!(100), VatMode::VatExclusive), dec!(7));
        assert_eq!(vat(dec!(500), VatMode::VatExclusive), dec!(35));
    }

    #[test]
    fn repeated_calls_agree() {
        let a = vat(dec!(999.99), VatMode::VatInclusive);
        let b = vat(dec!(999.99), VatMode::VatInclusive);
        assert_eq!(a, b);
    }

    #[test]
    fn sale_and_invoiced_purchase_net_out() {
        let mut sale = tx("s1", TransactionKind::Income, dec!(1070));
        sale.tax_mode = Some(VatMode::VatInclusive);
        let mut purchase = tx("p1", TransactionKind::Expense, dec!(500));
        purchase.has_tax_invoice = true;

        let report = calculate_vat([&sale, &purchase]);
        assert_eq!(report.output_vat, dec!(70));
        assert_eq!(report.input_vat, dec!(35));
        assert_eq!(report.net_vat_payable, dec!(35));
        assert_eq!(report.total_sales, dec!(1070));
        assert_eq!(report.total_purchases, dec!(500));
    }

    #[test]
    fn purchases_without_invoice_excluded() {
        let purchase = tx("p1", TransactionKind::Expense, dec!(500));
        let report = calculate_vat([&purchase]);
        assert_eq!(report.total_purchases, Decimal::ZERO);
        assert_eq!(report.input_vat, Decimal::ZERO);
    }

    #[test]
    fn empty_selection_is_zero() {
        let report = calculate_vat(std::iter::empty::<&Transaction>());
        assert_eq!(report, VatReport::default());
    }

    #[test]
    fn report_agrees_with_period_grouping() {
        let mut sale = tx("s1", TransactionKind::Income, dec!(214));
        sale.tax_mode = Some(VatMode::VatInclusive);
        sale.has_tax_invoice = true;
        let mut purchase = tx("p1", TransactionKind::Expense, dec!(300));
        purchase.has_tax_invoice = true;
        purchase.tax_mode = Some(VatMode::VatInclusive);
        let plain = tx("p2", TransactionKind::Expense, dec!(900));
        let txs = vec![sale, purchase, plain];

        let invoiced: Decimal = tax_invoice_expenses(&txs).iter().map(|t| t.amount).sum();
        let report = calculate_vat(&txs);
        assert_eq!(report.total_purchases, invoiced);
        assert_eq!(report.total_purchases, dec!(300));
        assert_eq!(report.total_sales, dec!(214));
        assert_eq!(report.output_vat, dec!(14));
        assert_eq!(report.input_vat, dec!(21));
        assert_eq!(report.net_vat_payable, dec!(-7));
    }
}
