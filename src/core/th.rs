use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Thai VAT rate (7%)
pub const VAT_RATE: Decimal = dec!(0.07);

/// Statutory personal allowance applied when a deduction profile omits it
pub const PERSONAL_ALLOWANCE: Decimal = dec!(60000);

/// Life insurance premium cap
pub const LIFE_INSURANCE_CAP: Decimal = dec!(100000);

/// Health insurance premium cap (applied before combining with life insurance)
pub const HEALTH_INSURANCE_CAP: Decimal = dec!(25000);

/// Combined life + health insurance cap
pub const COMBINED_INSURANCE_CAP: Decimal = dec!(100000);

/// Flat expense deduction for self-employed income under section 40(8)
pub const STANDARD_EXPENSE_RATE: Decimal = dec!(0.6);

/// Donations may not exceed 10% of income remaining after allowances
pub const DONATION_CAP_RATE: Decimal = dec!(0.10);

/// Budget alert threshold used when a budget omits one
pub const DEFAULT_ALERT_THRESHOLD: Decimal = dec!(80);

/// Largest amount accepted on input; anything above is treated as invalid
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// A marginal personal income tax bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBracket {
    /// Cumulative upper bound of the bracket, `None` for the top bracket
    pub upper: Option<Decimal>,
    /// Marginal rate applied to the slice of income inside this bracket
    pub rate: Decimal,
}

/// Personal income tax brackets, ascending
pub const TAX_BRACKETS: [TaxBracket; 8] = [
    TaxBracket { upper: Some(dec!(150000)), rate: dec!(0) },
    TaxBracket { upper: Some(dec!(300000)), rate: dec!(0.05) },
    TaxBracket { upper: Some(dec!(500000)), rate: dec!(0.10) },
    TaxBracket { upper: Some(dec!(750000)), rate: dec!(0.15) },
    TaxBracket { upper: Some(dec!(1000000)), rate: dec!(0.20) },
    TaxBracket { upper: Some(dec!(2000000)), rate: dec!(0.25) },
    TaxBracket { upper: Some(dec!(5000000)), rate: dec!(0.30) },
    TaxBracket { upper: None, rate: dec!(0.35) },
];
