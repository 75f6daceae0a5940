//! Per-category spending budgets and their health for a period

use super::period::{select, Period, SortOrder};
use super::th::DEFAULT_ALERT_THRESHOLD;
use super::transaction::{lenient_amount, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spending ceiling for one expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Budget {
    pub category: String,
    #[serde(alias = "amount", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub ceiling_amount: Decimal,
    /// Percentage of the ceiling at which the budget turns to warning (0-100)
    #[serde(
        default = "default_alert_threshold",
        alias = "alert_threshold",
        deserialize_with = "lenient_amount"
    )]
    #[schemars(with = "f64")]
    pub alert_threshold_percent: Decimal,
}

fn default_alert_threshold() -> Decimal {
    DEFAULT_ALERT_THRESHOLD
}

impl Budget {
    pub fn new(category: impl Into<String>, ceiling_amount: Decimal) -> Self {
        Budget {
            category: category.into(),
            ceiling_amount,
            alert_threshold_percent: DEFAULT_ALERT_THRESHOLD,
        }
    }

    pub fn with_alert_threshold(mut self, percent: Decimal) -> Self {
        self.alert_threshold_percent = percent;
        self
    }

    /// Classify spending against this budget; over beats warning
    pub fn classify(&self, spent: Decimal) -> BudgetState {
        if spent > self.ceiling_amount {
            BudgetState::Over
        } else if spent > self.ceiling_amount * self.alert_threshold_percent / dec!(100) {
            BudgetState::Warning
        } else {
            BudgetState::Ok
        }
    }
}

/// One budget per category, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetBook {
    budgets: Vec<Budget>,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a budget, replacing any existing budget for the same category
    pub fn upsert(&mut self, budget: Budget) {
        match self
            .budgets
            .iter_mut()
            .find(|b| b.category == budget.category)
        {
            Some(existing) => *existing = budget,
            None => self.budgets.push(budget),
        }
    }

    pub fn get(&self, category: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}

impl FromIterator<Budget> for BudgetBook {
    fn from_iter<I: IntoIterator<Item = Budget>>(iter: I) -> Self {
        let mut book = BudgetBook::new();
        for budget in iter {
            book.upsert(budget);
        }
        book
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetState {
    Ok,
    Warning,
    Over,
}

impl BudgetState {
    pub fn display(self) -> &'static str {
        match self {
            BudgetState::Ok => "ok",
            BudgetState::Warning => "warning",
            BudgetState::Over => "over",
        }
    }
}

/// Health of one budget, computed fresh from transactions on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub ceiling_amount: Decimal,
    pub spent_amount: Decimal,
    pub state: BudgetState,
}

/// Status of every budget given the expenses of a period.
///
/// Income is ignored. Categories without a budget never appear in the result.
pub fn budget_status<'a, I>(budgets: &[Budget], transactions: I) -> Vec<BudgetStatus>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut spending: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.into_iter().filter(|tx| tx.is_expense()) {
        *spending.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    budgets
        .iter()
        .map(|budget| {
            let spent_amount = spending
                .get(budget.category.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            BudgetStatus {
                category: budget.category.clone(),
                ceiling_amount: budget.ceiling_amount,
                spent_amount,
                state: budget.classify(spent_amount),
            }
        })
        .collect()
}

/// Budget status for the expenses recorded in `period`
pub fn budget_status_for_period(
    budgets: &BudgetBook,
    transactions: &[Transaction],
    period: &Period,
) -> Vec<BudgetStatus> {
    let selected = select(transactions, period, SortOrder::Ascending);
    budget_status(budgets.budgets(), selected)
}
