//! Personal income tax for self-employed income (PND 90 / PND 94)

use super::period::{select, Half, Period, SortOrder};
use super::th::{
    TaxBracket, COMBINED_INSURANCE_CAP, DONATION_CAP_RATE, HEALTH_INSURANCE_CAP,
    LIFE_INSURANCE_CAP, PERSONAL_ALLOWANCE, STANDARD_EXPENSE_RATE, TAX_BRACKETS,
};
use super::transaction::{lenient_amount, Transaction};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tax owed on `net_taxable_income` under the marginal bracket table.
///
/// Zero or negative income owes nothing.
pub fn tax_owed(net_taxable_income: Decimal) -> Decimal {
    tax_owed_with(&TAX_BRACKETS, net_taxable_income)
}

fn tax_owed_with(brackets: &[TaxBracket], income: Decimal) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut previous = Decimal::ZERO;

    for bracket in brackets {
        if income <= previous {
            break;
        }
        let top = bracket.upper.map_or(income, |upper| income.min(upper));
        let slice = (top - previous).max(Decimal::ZERO);
        tax += slice * bracket.rate;
        log::debug!(
            "bracket up to {:?} @ {}: slice {} (running tax {})",
            bracket.upper,
            bracket.rate,
            slice,
            tax
        );
        match bracket.upper {
            Some(upper) => previous = upper,
            None => break,
        }
    }
    tax
}

/// Annual allowances claimed against income.
///
/// Negative or unparseable values load as zero. Caps are applied when
/// computing, never on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeductionProfile {
    #[serde(alias = "personal_allowance", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub personal: Decimal,
    #[serde(alias = "spouse_allowance", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub spouse: Decimal,
    #[serde(alias = "child_allowance", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub child: Decimal,
    #[serde(alias = "parent_allowance", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub parent: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub social_security: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub life_insurance: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub health_insurance: Decimal,
    /// PVD, RMF and SSF contributions
    #[serde(alias = "pvd_rmf_ssf", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub retirement_funds: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub donation: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    #[schemars(with = "f64")]
    pub other: Decimal,
}

impl Default for DeductionProfile {
    fn default() -> Self {
        DeductionProfile {
            personal: PERSONAL_ALLOWANCE,
            spouse: Decimal::ZERO,
            child: Decimal::ZERO,
            parent: Decimal::ZERO,
            social_security: Decimal::ZERO,
            life_insurance: Decimal::ZERO,
            health_insurance: Decimal::ZERO,
            retirement_funds: Decimal::ZERO,
            donation: Decimal::ZERO,
            other: Decimal::ZERO,
        }
    }
}

impl DeductionProfile {
    /// Life and health premiums after the individual and combined caps
    pub fn capped_insurance(&self) -> Decimal {
        let life = self.life_insurance.min(LIFE_INSURANCE_CAP);
        let health = self.health_insurance.min(HEALTH_INSURANCE_CAP);
        (life + health).min(COMBINED_INSURANCE_CAP)
    }

    /// Sum of all allowances except the donation, with insurance capped
    pub fn allowance_total(&self) -> Decimal {
        self.personal
            + self.spouse
            + self.child
            + self.parent
            + self.social_security
            + self.capped_insurance()
            + self.retirement_funds
            + self.other
    }

    /// Every field multiplied by `factor`, caps still applied later
    pub fn scaled(&self, factor: Decimal) -> Self {
        DeductionProfile {
            personal: self.personal * factor,
            spouse: self.spouse * factor,
            child: self.child * factor,
            parent: self.parent * factor,
            social_security: self.social_security * factor,
            life_insurance: self.life_insurance * factor,
            health_insurance: self.health_insurance * factor,
            retirement_funds: self.retirement_funds * factor,
            donation: self.donation * factor,
            other: self.other * factor,
        }
    }
}

/// How business expenses are deducted from gross income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpensePolicy {
    /// Flat 60% of gross income
    #[default]
    Standard,
    /// Recorded expenses as supplied by the caller
    Actual,
}

/// Every intermediate figure of the net taxable income calculation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetIncomeBreakdown {
    pub gross_income: Decimal,
    pub expense_deduction: Decimal,
    pub income_after_expenses: Decimal,
    pub allowance_total: Decimal,
    pub income_after_allowances: Decimal,
    pub donation_deduction: Decimal,
    pub net_taxable_income: Decimal,
}

/// Resolve net taxable income: expenses, then allowances, then the capped donation.
///
/// Each stage floors at zero before the next one runs.
pub fn resolve_net_income(
    gross_income: Decimal,
    deductions: &DeductionProfile,
    policy: ExpensePolicy,
    actual_expense_total: Decimal,
) -> NetIncomeBreakdown {
    let expense_deduction = match policy {
        ExpensePolicy::Standard => gross_income * STANDARD_EXPENSE_RATE,
        ExpensePolicy::Actual => actual_expense_total,
    };
    let income_after_expenses = (gross_income - expense_deduction).max(Decimal::ZERO);

    let allowance_total = deductions.allowance_total();
    let income_after_allowances = (income_after_expenses - allowance_total).max(Decimal::ZERO);

    let donation_deduction = deductions
        .donation
        .min(income_after_allowances * DONATION_CAP_RATE);
    let net_taxable_income = (income_after_allowances - donation_deduction).max(Decimal::ZERO);

    NetIncomeBreakdown {
        gross_income,
        expense_deduction,
        income_after_expenses,
        allowance_total,
        income_after_allowances,
        donation_deduction,
        net_taxable_income,
    }
}

/// Net taxable income after expenses, allowances and the capped donation
pub fn net_taxable_income(
    gross_income: Decimal,
    deductions: &DeductionProfile,
    policy: ExpensePolicy,
    actual_expense_total: Decimal,
) -> Decimal {
    resolve_net_income(gross_income, deductions, policy, actual_expense_total).net_taxable_income
}

/// Personal income tax return forms for self-employed income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PndForm {
    /// Annual return covering January to December
    Pnd90,
    /// Half-year return covering January to June
    Pnd94,
}

impl PndForm {
    pub fn period(self, year: i32) -> Period {
        match self {
            PndForm::Pnd90 => Period::Year(year),
            PndForm::Pnd94 => Period::HalfYear {
                year,
                half: Half::First,
            },
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            PndForm::Pnd90 => "PND 90",
            PndForm::Pnd94 => "PND 94",
        }
    }
}

/// How the annual deduction profile is applied to a half-year return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeductionScaling {
    /// Halve every annual deduction for PND 94
    #[default]
    HalveForHalfYear,
    /// Use the annual profile unchanged
    Annual,
}

/// Computed personal income tax return
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PndReturn {
    pub form: PndForm,
    pub year: i32,
    pub expense_policy: ExpensePolicy,
    /// Sum of all recorded expenses in the return period
    pub actual_expense_total: Decimal,
    /// Deductions as applied (halved for PND 94 unless disabled)
    pub deductions: DeductionProfile,
    pub breakdown: NetIncomeBreakdown,
    pub tax_payable: Decimal,
}

/// Compute a PND 90 or PND 94 return from the year's transactions.
pub fn calculate_pnd(
    transactions: &[Transaction],
    form: PndForm,
    year: i32,
    deductions: &DeductionProfile,
    policy: ExpensePolicy,
    scaling: DeductionScaling,
) -> PndReturn {
    let selected = select(transactions, &form.period(year), SortOrder::Ascending);

    let (gross_income, actual_expense_total) =
        selected
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), tx| {
                if tx.is_income() {
                    (income + tx.amount, expense)
                } else {
                    (income, expense + tx.amount)
                }
            });

    let deductions = match (form, scaling) {
        (PndForm::Pnd94, DeductionScaling::HalveForHalfYear) => {
            deductions.scaled(Decimal::new(5, 1))
        }
        _ => deductions.clone(),
    };

    let breakdown = resolve_net_income(gross_income, &deductions, policy, actual_expense_total);
    let tax_payable = tax_owed(breakdown.net_taxable_income);
    log::info!(
        "{} {}: gross {}, net taxable {}, tax {}",
        form.display(),
        year,
        gross_income,
        breakdown.net_taxable_income,
        tax_payable
    );

    PndReturn {
        form,
        year,
        expense_policy: policy,
        actual_expense_total,
        deductions,
        breakdown,
        tax_payable,
    }
}
