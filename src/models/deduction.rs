//! Deduction definitions and the amounts applied from them.
//!
//! A [`DeductionDefinition`] is one active recurring deduction of an
//! employee. The engine turns each definition into at most one
//! [`AppliedDeduction`] per pay period and reports the matching
//! [`DeductionDelta`] the caller adds to the definition's year-to-date total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a deduction, used for bucketing in results and reports.
///
/// Unknown tags parse as [`DeductionType::Other`], so aggregation over
/// deduction types stays exhaustive.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionType;
///
/// assert_eq!("health_insurance".parse::<DeductionType>().unwrap(), DeductionType::HealthInsurance);
/// assert_eq!("gym_membership".parse::<DeductionType>().unwrap(), DeductionType::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeductionType {
    /// Retirement plan contributions (401(k), 403(b), IRA).
    Retirement,
    /// Medical insurance premiums.
    HealthInsurance,
    /// Dental insurance premiums.
    Dental,
    /// Vision insurance premiums.
    Vision,
    /// Health savings account contributions.
    Hsa,
    /// Flexible spending account contributions.
    Fsa,
    /// Court-ordered wage garnishment.
    Garnishment,
    /// Child support withholding.
    ChildSupport,
    /// Repayment of an employer loan or advance.
    LoanRepayment,
    /// Anything else.
    Other,
}

impl DeductionType {
    /// Returns the snake_case tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionType::Retirement => "retirement",
            DeductionType::HealthInsurance => "health_insurance",
            DeductionType::Dental => "dental",
            DeductionType::Vision => "vision",
            DeductionType::Hsa => "hsa",
            DeductionType::Fsa => "fsa",
            DeductionType::Garnishment => "garnishment",
            DeductionType::ChildSupport => "child_support",
            DeductionType::LoanRepayment => "loan_repayment",
            DeductionType::Other => "other",
        }
    }
}

impl FromStr for DeductionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "retirement" | "401k" | "403b" => DeductionType::Retirement,
            "health_insurance" | "health" => DeductionType::HealthInsurance,
            "dental" => DeductionType::Dental,
            "vision" => DeductionType::Vision,
            "hsa" => DeductionType::Hsa,
            "fsa" => DeductionType::Fsa,
            "garnishment" => DeductionType::Garnishment,
            "child_support" => DeductionType::ChildSupport,
            "loan_repayment" | "loan" => DeductionType::LoanRepayment,
            _ => DeductionType::Other,
        })
    }
}

impl From<String> for DeductionType {
    fn from(tag: String) -> Self {
        tag.parse().unwrap_or(DeductionType::Other)
    }
}

impl From<DeductionType> for String {
    fn from(deduction_type: DeductionType) -> Self {
        deduction_type.as_str().to_string()
    }
}

impl fmt::Display for DeductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a deduction's `amount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountKind {
    /// `amount` is a currency amount per pay period.
    Fixed,
    /// `amount` is a percentage of gross pay (e.g. `5` for 5%).
    PercentageOfGross,
}

/// One active recurring deduction for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionDefinition {
    /// Identifier the caller uses to match deltas back to its records.
    pub id: String,
    /// The deduction's category.
    #[serde(rename = "type")]
    pub deduction_type: DeductionType,
    /// Whether `amount` is fixed or a percentage of gross.
    pub amount_kind: AmountKind,
    /// A currency amount or a percentage, per `amount_kind`.
    pub amount: Decimal,
    /// Whether the deduction reduces wages subject to income tax.
    pub is_pre_tax: bool,
    /// Optional cap on the cumulative contribution for the year.
    #[serde(default)]
    pub annual_limit: Option<Decimal>,
    /// Amount already contributed this year.
    #[serde(default)]
    pub ytd_amount: Decimal,
}

impl DeductionDefinition {
    /// Returns how much more may be contributed this year, if the deduction is limited.
    pub fn remaining_limit(&self) -> Option<Decimal> {
        self.annual_limit
            .map(|limit| (limit - self.ytd_amount).max(Decimal::ZERO))
    }

    /// Returns this definition with every matching delta added to `ytd_amount`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AmountKind, DeductionDefinition, DeductionDelta, DeductionType};
    /// use rust_decimal::Decimal;
    ///
    /// let deduction = DeductionDefinition {
    ///     id: "ret_001".to_string(),
    ///     deduction_type: DeductionType::Retirement,
    ///     amount_kind: AmountKind::Fixed,
    ///     amount: Decimal::new(100, 0),
    ///     is_pre_tax: true,
    ///     annual_limit: None,
    ///     ytd_amount: Decimal::new(500, 0),
    /// };
    /// let delta = DeductionDelta { deduction_id: "ret_001".to_string(), amount: Decimal::new(100, 0) };
    ///
    /// assert_eq!(deduction.apply_deltas(&[delta]).ytd_amount, Decimal::new(600, 0));
    /// ```
    pub fn apply_deltas(&self, deltas: &[DeductionDelta]) -> Self {
        let applied: Decimal = deltas
            .iter()
            .filter(|d| d.deduction_id == self.id)
            .map(|d| d.amount)
            .sum();
        Self {
            ytd_amount: self.ytd_amount + applied,
            ..self.clone()
        }
    }
}

/// A deduction line on a pay result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDeduction {
    /// The definition this line came from.
    pub deduction_id: String,
    /// The deduction's category.
    #[serde(rename = "type")]
    pub deduction_type: DeductionType,
    /// The amount withheld this period, rounded to cents.
    pub amount: Decimal,
}

/// The amount to add to a deduction's year-to-date total after a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionDelta {
    /// The definition to update.
    pub deduction_id: String,
    /// The amount actually applied this period.
    pub amount: Decimal,
}
