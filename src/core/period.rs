//! Calendar period selection and grouping of transactions

use super::transaction::{Transaction, TransactionKind};
use super::wht::WhtRate;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid half '{0}', expected 1 or 2")]
    InvalidHalf(u8),
}

/// Half of a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Half {
    /// January to June
    First,
    /// July to December
    Second,
}

impl TryFrom<u8> for Half {
    type Error = PeriodError;

    fn try_from(half: u8) -> Result<Self, Self::Error> {
        match half {
            1 => Ok(Half::First),
            2 => Ok(Half::Second),
            other => Err(PeriodError::InvalidHalf(other)),
        }
    }
}

/// A calendar span transactions are selected by.
///
/// `month` is 1-based and must be in 1..=12; out of range values are a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    HalfYear { year: i32, half: Half },
    Year(i32),
}

impl Period {
    /// Whether `date` falls inside this period (inclusive on both ends)
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Day(day) => date == day,
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::HalfYear { year, half } => {
                date.year() == year
                    && match half {
                        Half::First => date.month0() < 6,
                        Half::Second => date.month0() >= 6,
                    }
            }
            Period::Year(year) => date.year() == year,
        }
    }

    /// First and last calendar day of the period
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Period::Day(day) => Some((day, day)),
            Period::Month { year, month } => {
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
                Some((start, end))
            }
            Period::HalfYear { year, half } => {
                let (first, last) = match half {
                    Half::First => ((1, 1), (6, 30)),
                    Half::Second => ((7, 1), (12, 31)),
                };
                Some((
                    NaiveDate::from_ymd_opt(year, first.0, first.1)?,
                    NaiveDate::from_ymd_opt(year, last.0, last.1)?,
                ))
            }
            Period::Year(year) => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
        }
    }

    /// Parse "YYYY-MM" into a monthly period
    pub fn parse_month(s: &str) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = i32::from_str(year).map_err(|_| invalid())?;
        let month = u32::from_str(month).map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Period::Month { year, month })
    }

    pub fn parse_day(s: &str) -> Result<Self, PeriodError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Period::Day)
            .map_err(|_| PeriodError::InvalidDate(s.to_string()))
    }

    pub fn display(&self) -> String {
        match *self {
            Period::Day(day) => day.format("%Y-%m-%d").to_string(),
            Period::Month { year, month } => format!("{year}-{month:02}"),
            Period::HalfYear { year, half: Half::First } => format!("{year} H1"),
            Period::HalfYear { year, half: Half::Second } => format!("{year} H2"),
            Period::Year(year) => year.to_string(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Ordering of a selection by transaction date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first, for listings
    #[default]
    MostRecentFirst,
    /// Oldest first, for trends and time series
    Ascending,
}

/// Transactions inside `period`, ordered by date.
///
/// Sorting is stable, so transactions on the same date keep their input order.
pub fn select<'a>(
    transactions: &'a [Transaction],
    period: &Period,
    order: SortOrder,
) -> Vec<&'a Transaction> {
    let mut selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| period.contains(tx.occurred_on))
        .collect();
    match order {
        SortOrder::Ascending => selected.sort_by_key(|tx| tx.occurred_on),
        SortOrder::MostRecentFirst => selected.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on)),
    }
    log::debug!(
        "selected {} of {} transactions for {}",
        selected.len(),
        transactions.len(),
        period
    );
    selected
}

pub fn by_kind<'a, I>(transactions: I, kind: TransactionKind) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().filter(|tx| tx.kind == kind).collect()
}

/// Expenses backed by a tax invoice, eligible for input VAT
pub fn tax_invoice_expenses<'a, I>(transactions: I) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().filter(|tx| tx.tax_invoice()).collect()
}

/// Expenses grouped by withholding rate; rows without withholding are left out
pub fn withholding_buckets<'a, I>(transactions: I) -> BTreeMap<WhtRate, Vec<&'a Transaction>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<WhtRate, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        if let Some(rate) = tx.wht_rate() {
            buckets.entry(rate).or_default().push(tx);
        }
    }
    buckets
}

/// Income and expense totals for a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn net_profit(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TransactionKind::Income => self.income += tx.amount,
            TransactionKind::Expense => self.expense += tx.amount,
        }
    }
}

pub fn totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for tx in transactions {
        totals.add(tx);
    }
    totals
}

/// One month of a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income and expense per month for the `months` months ending at `end`, oldest first.
///
/// Months without transactions are present with zero totals.
pub fn monthly_trend(transactions: &[Transaction], end: NaiveDate, months: u32) -> Vec<MonthlyTrend> {
    let end_month = end.with_day(1).unwrap_or(end);
    let mut trend: Vec<MonthlyTrend> = (0..months)
        .rev()
        .filter_map(|back| end_month.checked_sub_months(Months::new(back)))
        .map(|start| MonthlyTrend {
            year: start.year(),
            month: start.month(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();

    for tx in transactions {
        let date = tx.occurred_on;
        if let Some(bucket) = trend
            .iter_mut()
            .find(|m| m.year == date.year() && m.month == date.month())
        {
            match tx.kind {
                TransactionKind::Income => bucket.income += tx.amount,
                TransactionKind::Expense => bucket.expense += tx.amount,
            }
        }
    }
    trend
}

/// Expense totals per category, largest first, limited to `top`
pub fn expense_mix<'a, I>(transactions: I, top: usize) -> Vec<(String, Decimal)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.into_iter().filter(|tx| tx.is_expense()) {
        *by_category.entry(tx.category.as_str()).or_default() += tx.amount;
    }
    let mut mix: Vec<(String, Decimal)> = by_category
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();
    mix.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    mix.truncate(top);
    mix
}

/// The `n` most recent transactions in `period`
pub fn recent<'a>(transactions: &'a [Transaction], period: &Period, n: usize) -> Vec<&'a Transaction> {
    let mut selected = select(transactions, period, SortOrder::MostRecentFirst);
    selected.truncate(n);
    selected
}
