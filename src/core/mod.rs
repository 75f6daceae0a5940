pub mod budget;
pub mod income;
pub mod period;
pub mod summary;
pub mod th;
pub mod transaction;
pub mod vat;
pub mod wht;

// Flat public surface for domain types and functions.
pub use budget::{budget_status, budget_status_for_period, Budget, BudgetBook, BudgetState, BudgetStatus};
pub use income::{
    calculate_pnd, net_taxable_income, resolve_net_income, tax_owed, DeductionProfile,
    DeductionScaling, ExpensePolicy, NetIncomeBreakdown, PndForm, PndReturn,
};
pub use period::{
    by_kind, expense_mix, monthly_trend, recent, select, tax_invoice_expenses, totals,
    withholding_buckets, Half, MonthlyTrend, Period, PeriodError, SortOrder, Totals,
};
pub use summary::{summarize, PeriodSummary};
pub use transaction::{
    read_ledger_json, read_transactions_csv, Ledger, LedgerError, LedgerInput, Transaction,
    TransactionKind,
};
pub use vat::{calculate_vat, vat, VatMode, VatReport};
pub use wht::{calculate_wht, wht, WhtBucket, WhtRate, WhtReport};
