//! Recorded transactions and the ledger they are loaded from

use super::budget::{Budget, BudgetBook};
use super::income::DeductionProfile;
use super::th::MAX_AMOUNT;
use super::vat::VatMode;
use super::wht::WhtRate;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid ledger JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transaction CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate transaction id: {0}")]
    DuplicateTransactionId(String),
}

/// Direction of a recorded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: String,
    /// Income or expense
    #[serde(alias = "type")]
    pub kind: TransactionKind,
    /// Face value in THB (VAT-inclusive when the tax mode says so)
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    /// Calendar date the transaction occurred (YYYY-MM-DD)
    #[serde(alias = "date")]
    #[schemars(with = "String")]
    pub occurred_on: NaiveDate,
    /// VAT treatment of an income record
    #[serde(default, alias = "tax_type")]
    pub tax_mode: Option<VatMode>,
    /// Whether an expense is backed by a tax invoice (input VAT claimable)
    #[serde(default, alias = "tax_invoice", deserialize_with = "lenient_flag")]
    #[schemars(with = "bool")]
    pub has_tax_invoice: bool,
    /// Withholding tax percentage for an expense (0, 1, 2, 3 or 5)
    #[serde(default, alias = "wht_rate", deserialize_with = "lenient_wht_rate")]
    #[schemars(with = "Option<u8>")]
    pub withholding_rate: Option<WhtRate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Tax mode is only meaningful on income; expenses always report `NoVat`.
    pub fn vat_mode(&self) -> VatMode {
        match self.kind {
            TransactionKind::Income => self.tax_mode.unwrap_or_default(),
            TransactionKind::Expense => VatMode::NoVat,
        }
    }

    /// Tax invoice flag, always false on income.
    pub fn tax_invoice(&self) -> bool {
        self.is_expense() && self.has_tax_invoice
    }

    /// Withholding rate, always `None` on income.
    pub fn wht_rate(&self) -> Option<WhtRate> {
        if self.is_expense() {
            self.withholding_rate
        } else {
            None
        }
    }
}

/// Input root for ledger JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LedgerInput {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub deductions: DeductionProfile,
}

/// A validated snapshot of everything the engine needs
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub budgets: BudgetBook,
    pub deductions: DeductionProfile,
}

impl Ledger {
    pub fn from_input(input: LedgerInput) -> Result<Self, LedgerError> {
        validate_ids(&input.transactions)?;
        let budgets = input.budgets.into_iter().collect();
        Ok(Ledger {
            transactions: input.transactions,
            budgets,
            deductions: input.deductions,
        })
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, LedgerError> {
        Self::from_input(LedgerInput {
            transactions,
            ..Default::default()
        })
    }
}

/// Read a full ledger (transactions, budgets, deductions) from JSON
pub fn read_ledger_json<R: Read>(reader: R) -> Result<Ledger, LedgerError> {
    let input: LedgerInput = serde_json::from_reader(reader)?;
    let ledger = Ledger::from_input(input)?;
    log::info!(
        "Read {} transactions, {} budgets",
        ledger.transactions.len(),
        ledger.budgets.len()
    );
    Ok(ledger)
}

/// Read transactions from CSV (one row per transaction, header required)
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>, LedgerError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let transactions = rdr
        .deserialize()
        .collect::<Result<Vec<Transaction>, csv::Error>>()?;
    validate_ids(&transactions)?;
    log::info!("Read {} csv records", transactions.len());
    Ok(transactions)
}

fn validate_ids(transactions: &[Transaction]) -> Result<(), LedgerError> {
    let mut seen = HashSet::new();
    for tx in transactions {
        if !seen.insert(tx.id.as_str()) {
            return Err(LedgerError::DuplicateTransactionId(tx.id.clone()));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(d) => Some(*d),
            RawNumber::Text(s) => Decimal::from_str(s.trim().trim_end_matches('%').trim()).ok(),
            RawNumber::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

/// Parse a money amount, coercing missing, unparseable, negative or
/// out-of-range values to zero.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(coerce_non_negative(raw, "amount"))
}

fn coerce_non_negative(raw: Option<RawNumber>, field: &str) -> Decimal {
    match raw.as_ref().map(RawNumber::to_decimal) {
        None => Decimal::ZERO,
        Some(Some(value)) if value > MAX_AMOUNT => {
            log::warn!("{field} {value} exceeds {MAX_AMOUNT}, treated as 0");
            Decimal::ZERO
        }
        Some(Some(value)) if value >= Decimal::ZERO => value,
        Some(Some(value)) => {
            log::warn!("negative {field} {value} treated as 0");
            Decimal::ZERO
        }
        Some(None) => {
            log::warn!("unparseable {field} treated as 0");
            Decimal::ZERO
        }
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n != 0,
        Some(RawFlag::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Some(RawFlag::Other(_)) | None => false,
    };
    Ok(flag)
}

fn lenient_wht_rate<'de, D>(deserializer: D) -> Result<Option<WhtRate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    let percent = coerce_non_negative(raw, "withholding rate");
    if percent.is_zero() {
        return Ok(None);
    }
    match WhtRate::try_from(percent) {
        Ok(rate) => Ok(Some(rate)),
        Err(_) => {
            log::warn!("unsupported withholding rate {percent}% treated as 0");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_ledger_json_with_defaults() {
        let json = r#"{
            "transactions": [
                {"id": "1", "kind": "income", "amount": 1070, "category": "Sales",
                 "occurred_on": "2024-03-01", "tax_mode": "vat_inclusive"},
                {"id": "2", "type": "expense", "amount": "500", "category": "Rent",
                 "date": "2024-03-02", "tax_invoice": true, "wht_rate": 5}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        assert_eq!(ledger.transactions.len(), 2);
        assert_eq!(ledger.transactions[0].vat_mode(), VatMode::VatInclusive);
        assert_eq!(ledger.transactions[1].amount, dec!(500));
        assert!(ledger.transactions[1].tax_invoice());
        assert_eq!(ledger.transactions[1].wht_rate(), Some(WhtRate::Five));
        assert!(ledger.budgets.is_empty());
        assert_eq!(ledger.deductions.personal, dec!(60000));
    }

    #[test]
    fn invalid_numbers_coerce_to_zero() {
        let json = r#"{
            "transactions": [
                {"id": "a", "kind": "expense", "amount": "abc", "occurred_on": "2024-01-01"},
                {"id": "b", "kind": "expense", "amount": -20, "occurred_on": "2024-01-01"},
                {"id": "c", "kind": "expense", "amount": null, "occurred_on": "2024-01-01",
                 "withholding_rate": 4},
                {"id": "d", "kind": "expense", "amount": 10, "occurred_on": "2024-01-01",
                 "withholding_rate": "oops"}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        let amounts: Vec<_> = ledger.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(0), dec!(0), dec!(0), dec!(10)]);
        assert!(ledger.transactions.iter().all(|t| t.wht_rate().is_none()));
    }

    #[test]
    fn oversized_amounts_coerce_to_zero() {
        let json = r#"{
            "transactions": [
                {"id": "1", "kind": "income", "amount": "79228162514264337593543950335",
                 "occurred_on": "2024-01-01", "tax_mode": "vat_inclusive"},
                {"id": "2", "kind": "expense", "amount": "1000000000000",
                 "occurred_on": "2024-01-01", "has_tax_invoice": true}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        assert_eq!(ledger.transactions[0].amount, Decimal::ZERO);
        assert_eq!(ledger.transactions[1].amount, MAX_AMOUNT);

        let report = crate::core::vat::calculate_vat(&ledger.transactions);
        assert_eq!(report.output_vat, Decimal::ZERO);
        assert_eq!(report.input_vat, dec!(70000000000));
    }

    #[test]
    fn income_ignores_expense_only_fields() {
        let json = r#"{
            "transactions": [
                {"id": "1", "kind": "income", "amount": 100, "occurred_on": "2024-01-01",
                 "has_tax_invoice": true, "withholding_rate": 3}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        let tx = &ledger.transactions[0];
        assert!(!tx.tax_invoice());
        assert_eq!(tx.wht_rate(), None);
        assert_eq!(tx.vat_mode(), VatMode::NoVat);
    }

    #[test]
    fn expense_ignores_tax_mode() {
        let json = r#"{
            "transactions": [
                {"id": "1", "kind": "expense", "amount": 100, "occurred_on": "2024-01-01",
                 "tax_mode": "vat_exclusive"}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        assert_eq!(ledger.transactions[0].vat_mode(), VatMode::NoVat);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"{
            "transactions": [
                {"id": "1", "kind": "income", "amount": 1, "occurred_on": "2024-01-01"},
                {"id": "1", "kind": "income", "amount": 2, "occurred_on": "2024-01-02"}
            ]
        }"#;
        let err = read_ledger_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransactionId(id) if id == "1"));
    }

    #[test]
    fn reads_transactions_csv() {
        let csv = "\
id,occurred_on,kind,amount,category,tax_mode,has_tax_invoice,withholding_rate,note
1,2024-05-01,income,1070,Sales,vat_inclusive,,,
2,2024-05-02,expense,500,Food Cost,,true,3%,supplier
3,2024-05-03,expense,,Rent,,false,0,
";
        let txs = read_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].vat_mode(), VatMode::VatInclusive);
        assert!(txs[1].tax_invoice());
        assert_eq!(txs[1].wht_rate(), Some(WhtRate::Three));
        assert_eq!(txs[2].amount, Decimal::ZERO);
        assert_eq!(txs[2].wht_rate(), None);
    }

    #[test]
    fn duplicate_budget_categories_resolve_last_wins() {
        let json = r#"{
            "budgets": [
                {"category": "Rent", "ceiling_amount": 10000},
                {"category": "Rent", "ceiling_amount": 12000, "alert_threshold_percent": 90}
            ]
        }"#;
        let ledger = read_ledger_json(json.as_bytes()).unwrap();
        assert_eq!(ledger.budgets.len(), 1);
        let rent = ledger.budgets.get("Rent").unwrap();
        assert_eq!(rent.ceiling_amount, dec!(12000));
        assert_eq!(rent.alert_threshold_percent, dec!(90));
    }
}
