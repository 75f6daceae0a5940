//! Withholding tax on expenses (PND 3 / PND 53 remittance figures)

use super::period::withholding_buckets;
use super::transaction::Transaction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Statutory withholding rates a payer may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum WhtRate {
    One,
    Two,
    Three,
    Five,
}

impl WhtRate {
    pub const ALL: [WhtRate; 4] = [WhtRate::One, WhtRate::Two, WhtRate::Three, WhtRate::Five];

    pub fn percent(self) -> Decimal {
        Decimal::from(u8::from(self))
    }
}

impl From<WhtRate> for u8 {
    fn from(rate: WhtRate) -> u8 {
        match rate {
            WhtRate::One => 1,
            WhtRate::Two => 2,
            WhtRate::Three => 3,
            WhtRate::Five => 5,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported withholding rate: {0}%")]
pub struct UnsupportedWhtRate(pub Decimal);

impl TryFrom<Decimal> for WhtRate {
    type Error = UnsupportedWhtRate;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        WhtRate::ALL
            .into_iter()
            .find(|rate| rate.percent() == percent)
            .ok_or(UnsupportedWhtRate(percent))
    }
}

impl std::fmt::Display for WhtRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", u8::from(*self))
    }
}

/// Tax withheld from `amount` at `rate_percent`. A missing or zero rate withholds nothing.
pub fn wht(amount: Decimal, rate_percent: Option<Decimal>) -> Decimal {
    match rate_percent {
        Some(rate) if !rate.is_zero() => amount * rate / dec!(100),
        _ => Decimal::ZERO,
    }
}

/// Totals for a single withholding rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhtBucket {
    pub rate: WhtRate,
    /// Sum of expense amounts withheld at this rate
    pub base_amount: Decimal,
    /// Tax withheld at this rate
    pub tax_amount: Decimal,
    pub count: usize,
}

/// Withholding tax to remit for a selection of transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhtReport {
    /// Non-empty buckets, ordered by rate
    pub buckets: Vec<WhtBucket>,
    pub total: Decimal,
}

/// Group expenses subject to withholding by rate and total the tax to remit.
pub fn calculate_wht<'a, I>(transactions: I) -> WhtReport
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let buckets: Vec<WhtBucket> = withholding_buckets(transactions)
        .into_iter()
        .map(|(rate, txs)| {
            let base_amount: Decimal = txs.iter().map(|tx| tx.amount).sum();
            WhtBucket {
                rate,
                base_amount,
                tax_amount: txs
                    .iter()
                    .map(|tx| wht(tx.amount, Some(rate.percent())))
                    .sum(),
                count: txs.len(),
            }
        })
        .collect();
    let total = buckets.iter().map(|b| b.tax_amount).sum();
    WhtReport { buckets, total }
}
