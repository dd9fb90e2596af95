//! Payroll input model and related types.
//!
//! A [`PayrollInput`] describes one employee's pay period: hours and rate,
//! withholding elections, local residency, year-to-date accumulators,
//! employer unemployment rates and the active deductions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AmountKind, DeductionDefinition, PayrollResult};
use crate::error::{EngineError, EngineResult};

/// Most hours accepted for one kind of hours in a pay period (a 31-day month).
pub const MAX_PERIOD_HOURS: Decimal = Decimal::from_parts(744, 0, 0, false, 0);

/// Largest overtime multiplier accepted.
pub const MAX_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Largest currency amount accepted in any input field ($1 trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Filing status on a withholding certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single or married filing separately.
    #[default]
    Single,
    /// Married filing jointly.
    Married,
    /// Head of household.
    HeadOfHousehold,
}

fn default_true() -> bool {
    true
}

/// A withholding election for one taxing authority (federal or state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingElection {
    /// Filing status for this authority.
    pub filing_status: FilingStatus,
    /// Number of withholding allowances claimed.
    #[serde(default)]
    pub allowances: u32,
    /// Whether income tax is withheld at all. When false the tax is zero.
    #[serde(default = "default_true")]
    pub withheld: bool,
}

impl WithholdingElection {
    /// Creates a withheld election with the given status and allowances.
    pub fn new(filing_status: FilingStatus, allowances: u32) -> Self {
        Self {
            filing_status,
            allowances,
            withheld: true,
        }
    }

    /// Creates an election with withholding switched off.
    pub fn exempt(filing_status: FilingStatus) -> Self {
        Self {
            filing_status,
            allowances: 0,
            withheld: false,
        }
    }
}

impl Default for WithholdingElection {
    fn default() -> Self {
        Self::new(FilingStatus::Single, 0)
    }
}

/// Residency in localities that levy their own income tax.
///
/// The two flags should be mutually exclusive. When both are set the
/// flat-rate locality wins and the engine records a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalResidency {
    /// Resident of the locality taxing wages at a flat rate.
    #[serde(default)]
    pub flat_rate_locality: bool,
    /// Resident of the locality levying a surcharge on state income tax.
    #[serde(default)]
    pub state_surcharge_locality: bool,
}

impl LocalResidency {
    /// Returns true when both residency flags are set.
    pub fn is_conflicting(&self) -> bool {
        self.flat_rate_locality && self.state_surcharge_locality
    }
}

/// Year-to-date accumulators as of the start of the pay period.
///
/// The caller owns this value. After a period is computed,
/// [`YearToDate::advance`] produces the accumulator for the next period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearToDate {
    /// Gross pay so far this year.
    #[serde(default)]
    pub gross_pay: Decimal,
    /// Social Security wages so far this year, when tracked separately from gross pay.
    #[serde(default)]
    pub social_security_wages: Option<Decimal>,
    /// Medicare wages so far this year, when tracked separately from gross pay.
    #[serde(default)]
    pub medicare_wages: Option<Decimal>,
    /// Paid family leave withheld so far this year.
    #[serde(default)]
    pub paid_family_leave: Decimal,
}

impl YearToDate {
    /// Creates an accumulator from gross pay alone.
    pub fn from_gross(gross_pay: Decimal) -> Self {
        Self {
            gross_pay,
            ..Self::default()
        }
    }

    /// Wages counted against the Social Security wage base.
    pub fn social_security_wages(&self) -> Decimal {
        self.social_security_wages.unwrap_or(self.gross_pay)
    }

    /// Wages counted against the Additional Medicare threshold.
    pub fn medicare_wages(&self) -> Decimal {
        self.medicare_wages.unwrap_or(self.gross_pay)
    }

    /// Returns the accumulator after adding a computed period.
    ///
    /// FICA in this engine is levied on full gross pay, so separately
    /// tracked wage totals grow by gross pay as well.
    pub fn advance(&self, result: &PayrollResult) -> Self {
        let gross = result.earnings.gross_pay;
        Self {
            gross_pay: self.gross_pay + gross,
            social_security_wages: self.social_security_wages.map(|w| w + gross),
            medicare_wages: self.medicare_wages.map(|w| w + gross),
            paid_family_leave: self.paid_family_leave + result.taxes.paid_family_leave,
        }
    }
}

fn default_overtime_multiplier() -> Decimal {
    Decimal::new(15, 1)
}

/// The payroll input for one employee and one pay period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{FilingStatus, PayrollInput, WithholdingElection};
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     overtime_hours: Decimal::new(5, 0),
///     federal: WithholdingElection::new(FilingStatus::Married, 2),
///     ..PayrollInput::new(Decimal::new(40, 0), Decimal::new(30, 0))
/// };
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// Regular hours worked.
    pub regular_hours: Decimal,
    /// Overtime hours worked.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Hourly rate. Salaried employees use their hourly equivalent.
    pub hourly_rate: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: Decimal,
    /// Other earnings added to gross pay (bonuses, commissions).
    #[serde(default)]
    pub other_earnings: Decimal,
    /// Federal withholding election.
    #[serde(default)]
    pub federal: WithholdingElection,
    /// State withholding election.
    #[serde(default)]
    pub state: WithholdingElection,
    /// Local residency flags.
    #[serde(default)]
    pub local_residency: LocalResidency,
    /// Year-to-date accumulators before this period.
    #[serde(default)]
    pub year_to_date: YearToDate,
    /// Employer SUI rate, as a percentage (e.g. `3.4` for 3.4%).
    #[serde(default)]
    pub sui_rate_percent: Decimal,
    /// Employer-specific SUI wage base; the rule set's default applies when absent.
    #[serde(default)]
    pub sui_wage_base: Option<Decimal>,
    /// FUTA rate, as a percentage; the rule set's default applies when absent.
    #[serde(default)]
    pub futa_rate_percent: Option<Decimal>,
    /// Active deductions, applied in order.
    #[serde(default)]
    pub deductions: Vec<DeductionDefinition>,
}

impl PayrollInput {
    /// Creates an input for regular hours at an hourly rate, with default elections.
    pub fn new(regular_hours: Decimal, hourly_rate: Decimal) -> Self {
        Self {
            regular_hours,
            overtime_hours: Decimal::ZERO,
            hourly_rate,
            overtime_multiplier: default_overtime_multiplier(),
            other_earnings: Decimal::ZERO,
            federal: WithholdingElection::default(),
            state: WithholdingElection::default(),
            local_residency: LocalResidency::default(),
            year_to_date: YearToDate::default(),
            sui_rate_percent: Decimal::ZERO,
            sui_wage_base: None,
            futa_rate_percent: None,
            deductions: Vec::new(),
        }
    }

    /// Checks the input contract.
    ///
    /// Amounts, hours and accumulators must not be negative and must stay
    /// within [`MAX_AMOUNT`] and [`MAX_PERIOD_HOURS`]. The overtime
    /// multiplier must lie in 1..=[`MAX_OVERTIME_MULTIPLIER`]. Percentage
    /// rates, including percentage-of-gross deductions, must lie in 0..=100.
    pub fn validate(&self) -> EngineResult<()> {
        ensure_within("regular_hours", self.regular_hours, MAX_PERIOD_HOURS)?;
        ensure_within("overtime_hours", self.overtime_hours, MAX_PERIOD_HOURS)?;

        let amounts = [
            ("hourly_rate", self.hourly_rate),
            ("other_earnings", self.other_earnings),
            ("year_to_date.gross_pay", self.year_to_date.gross_pay),
            ("year_to_date.paid_family_leave", self.year_to_date.paid_family_leave),
        ];
        for (field, value) in amounts {
            ensure_within(field, value, MAX_AMOUNT)?;
        }

        if let Some(wages) = self.year_to_date.social_security_wages {
            ensure_within("year_to_date.social_security_wages", wages, MAX_AMOUNT)?;
        }
        if let Some(wages) = self.year_to_date.medicare_wages {
            ensure_within("year_to_date.medicare_wages", wages, MAX_AMOUNT)?;
        }
        if let Some(base) = self.sui_wage_base {
            ensure_within("sui_wage_base", base, MAX_AMOUNT)?;
        }

        if self.overtime_multiplier < Decimal::ONE
            || self.overtime_multiplier > MAX_OVERTIME_MULTIPLIER
        {
            return Err(EngineError::invalid_input(
                "overtime_multiplier",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_OVERTIME_MULTIPLIER, self.overtime_multiplier
                ),
            ));
        }

        ensure_percentage("sui_rate_percent", self.sui_rate_percent)?;
        if let Some(rate) = self.futa_rate_percent {
            ensure_percentage("futa_rate_percent", rate)?;
        }

        for deduction in &self.deductions {
            let field = |name: &str| format!("deductions[{}].{}", deduction.id, name);
            match deduction.amount_kind {
                AmountKind::Fixed => {
                    ensure_within(&field("amount"), deduction.amount, MAX_AMOUNT)?
                }
                AmountKind::PercentageOfGross => {
                    ensure_percentage(&field("amount"), deduction.amount)?
                }
            }
            ensure_within(&field("ytd_amount"), deduction.ytd_amount, MAX_AMOUNT)?;
            if let Some(limit) = deduction.annual_limit {
                ensure_within(&field("annual_limit"), limit, MAX_AMOUNT)?;
            }
        }

        Ok(())
    }
}

fn ensure_within(field: &str, value: Decimal, max: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    if value > max {
        return Err(EngineError::invalid_input(
            field,
            format!("must not exceed {}, got {}", max, value),
        ));
    }
    Ok(())
}

fn ensure_percentage(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid_input(
            field,
            format!("must be a percentage between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}
