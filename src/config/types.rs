//! Configuration types for tax-year rule sets.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the YAML files of a jurisdiction directory. A [`TaxYearRules`] value
//! carries every table and constant the engine needs for one tax year, so
//! calculation code never reaches for global constants.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::FilingStatus;

/// Metadata about the jurisdiction a configuration directory describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code for the jurisdiction (e.g., "us-ny").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The state whose income tax tables are configured.
    pub state: String,
    /// URL to the official withholding publication.
    pub source_url: String,
}

/// A bracket as written in the YAML files: a lower bound and a marginal rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketConfig {
    /// Lower edge of the bracket (inclusive), in annual dollars.
    pub floor: Decimal,
    /// Marginal rate applied above the floor, as a fraction.
    pub rate: Decimal,
}

/// A bracket of a progressive schedule, with the tax owed on all lower brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower edge of the bracket (inclusive), in annual dollars.
    pub floor: Decimal,
    /// Marginal rate applied above the floor, as a fraction.
    pub rate: Decimal,
    /// Tax owed on an amount exactly equal to `floor`.
    pub base_tax: Decimal,
}

/// A progressive tax schedule.
///
/// Base amounts are derived from the floors and rates when the schedule is
/// built, so the YAML only lists `(floor, rate)` pairs.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{BracketConfig, TaxSchedule};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let schedule = TaxSchedule::try_from(vec![
///     BracketConfig { floor: dec("0"), rate: dec("0.10") },
///     BracketConfig { floor: dec("10000"), rate: dec("0.20") },
/// ])
/// .unwrap();
///
/// assert_eq!(schedule.tax_on(dec("15000")), dec("2000"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BracketConfig>", into = "Vec<BracketConfig>")]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TryFrom<Vec<BracketConfig>> for TaxSchedule {
    type Error = String;

    fn try_from(raw: Vec<BracketConfig>) -> Result<Self, Self::Error> {
        let first = raw.first().ok_or("schedule must have at least one bracket")?;
        if !first.floor.is_zero() {
            return Err(format!("first bracket must start at 0, found {}", first.floor));
        }

        let mut brackets: Vec<TaxBracket> = Vec::with_capacity(raw.len());
        for entry in raw {
            if entry.rate < Decimal::ZERO || entry.rate > Decimal::ONE {
                return Err(format!(
                    "bracket at {} has rate {} outside 0..=1",
                    entry.floor, entry.rate
                ));
            }

            let base_tax = match brackets.last() {
                None => Decimal::ZERO,
                Some(previous) => {
                    if entry.floor <= previous.floor {
                        return Err(format!(
                            "bracket floors must increase, {} follows {}",
                            entry.floor, previous.floor
                        ));
                    }
                    previous.base_tax + previous.rate * (entry.floor - previous.floor)
                }
            };

            brackets.push(TaxBracket {
                floor: entry.floor,
                rate: entry.rate,
                base_tax,
            });
        }

        Ok(Self { brackets })
    }
}

impl From<TaxSchedule> for Vec<BracketConfig> {
    fn from(schedule: TaxSchedule) -> Self {
        schedule
            .brackets
            .into_iter()
            .map(|b| BracketConfig {
                floor: b.floor,
                rate: b.rate,
            })
            .collect()
    }
}

impl TaxSchedule {
    /// Returns the brackets, lowest first.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the bracket an annual amount falls into.
    ///
    /// Floors are inclusive: an amount equal to a floor belongs to that bracket.
    pub fn bracket_for(&self, annual_amount: Decimal) -> &TaxBracket {
        self.brackets
            .iter()
            .rev()
            .find(|b| annual_amount >= b.floor)
            .unwrap_or(&self.brackets[0])
    }

    /// Computes the unrounded annual tax on an amount. Amounts at or below 0 owe nothing.
    pub fn tax_on(&self, annual_amount: Decimal) -> Decimal {
        if annual_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let bracket = self.bracket_for(annual_amount);
        bracket.base_tax + bracket.rate * (annual_amount - bracket.floor)
    }
}

/// A value that differs between single/head-of-household and married filers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByFilingStatus<T> {
    /// Value for single and head-of-household filers.
    pub single_or_head_of_household: T,
    /// Value for married filers.
    pub married: T,
}

impl<T> ByFilingStatus<T> {
    /// Returns the value that applies to a filing status.
    pub fn for_status(&self, status: FilingStatus) -> &T {
        match status {
            FilingStatus::Single | FilingStatus::HeadOfHousehold => {
                &self.single_or_head_of_household
            }
            FilingStatus::Married => &self.married,
        }
    }
}

/// Rules for an annualized percentage-method income tax (federal or state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxRules {
    /// Annual standard deduction.
    pub standard_deduction: ByFilingStatus<Decimal>,
    /// Annual amount subtracted per withholding allowance.
    pub allowance_amount: Decimal,
    /// Progressive bracket schedules.
    pub schedules: ByFilingStatus<TaxSchedule>,
}

/// A named locality and its rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalityRate {
    /// The locality's name, used in audit output.
    pub name: String,
    /// The rate, as a fraction.
    pub rate: Decimal,
}

/// Local income tax rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTaxRules {
    /// Locality taxing residents at a flat rate on taxable wages.
    pub flat_rate: LocalityRate,
    /// Locality taxing residents with a surcharge on the state income tax.
    pub state_surcharge: LocalityRate,
}

/// Social Security and Medicare rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FicaRules {
    /// Social Security rate for each of employee and employer.
    pub social_security_rate: Decimal,
    /// Annual Social Security wage base.
    pub social_security_wage_base: Decimal,
    /// Medicare rate for each of employee and employer.
    pub medicare_rate: Decimal,
    /// Employee-only Additional Medicare rate.
    pub additional_medicare_rate: Decimal,
    /// Annual wages above which Additional Medicare applies.
    pub additional_medicare_threshold: Decimal,
}

/// How the paid family leave annual maximum is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PflCapMode {
    /// Each period is capped at the annual maximum on its own.
    #[default]
    PerPeriod,
    /// Each period is capped at the annual maximum less the year-to-date PFL withheld.
    YearToDate,
}

/// State disability and paid family leave rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInsuranceRules {
    /// Disability insurance rate, as a fraction of gross pay.
    pub disability_rate: Decimal,
    /// Maximum disability deduction per pay period.
    pub disability_period_cap: Decimal,
    /// Paid family leave rate, as a fraction of gross pay.
    pub paid_family_leave_rate: Decimal,
    /// Annual paid family leave maximum.
    pub paid_family_leave_annual_cap: Decimal,
    /// How the annual maximum is enforced.
    #[serde(default)]
    pub paid_family_leave_cap_mode: PflCapMode,
}

/// Employer unemployment insurance rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnemploymentRules {
    /// Default SUI wage base when the employer does not supply its own.
    pub sui_wage_base: Decimal,
    /// FUTA wage base.
    pub futa_wage_base: Decimal,
    /// FUTA rate used when the caller supplies none, as a percentage.
    pub futa_default_rate_percent: Decimal,
}

/// The complete rule set for one tax year.
///
/// This is the injectable configuration the engine calculates against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearRules {
    /// The tax year these rules cover.
    pub tax_year: i32,
    /// The first pay date these rules apply to.
    pub effective_date: NaiveDate,
    /// Pay periods per year used to annualize wages.
    pub pay_periods_per_year: u32,
    /// Federal income tax withholding rules.
    pub federal: IncomeTaxRules,
    /// State income tax withholding rules.
    pub state: IncomeTaxRules,
    /// Local income tax rules.
    pub local: LocalTaxRules,
    /// Social Security and Medicare rules.
    pub fica: FicaRules,
    /// State disability and paid family leave rules.
    pub state_insurance: StateInsuranceRules,
    /// Employer unemployment insurance rules.
    pub unemployment: UnemploymentRules,
}

impl TaxYearRules {
    /// Checks the constants that bracket schedules do not already validate.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidRules {
            tax_year: self.tax_year,
            message,
        };

        if self.pay_periods_per_year == 0 {
            return Err(invalid("pay_periods_per_year must be positive".to_string()));
        }

        let fractions = [
            ("fica.social_security_rate", self.fica.social_security_rate),
            ("fica.medicare_rate", self.fica.medicare_rate),
            ("fica.additional_medicare_rate", self.fica.additional_medicare_rate),
            ("local.flat_rate.rate", self.local.flat_rate.rate),
            ("local.state_surcharge.rate", self.local.state_surcharge.rate),
            ("state_insurance.disability_rate", self.state_insurance.disability_rate),
            (
                "state_insurance.paid_family_leave_rate",
                self.state_insurance.paid_family_leave_rate,
            ),
        ];
        for (name, rate) in fractions {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(invalid(format!("{} must be between 0 and 1, got {}", name, rate)));
            }
        }

        let amounts = [
            ("fica.social_security_wage_base", self.fica.social_security_wage_base),
            (
                "fica.additional_medicare_threshold",
                self.fica.additional_medicare_threshold,
            ),
            ("federal.allowance_amount", self.federal.allowance_amount),
            ("state.allowance_amount", self.state.allowance_amount),
            (
                "state_insurance.disability_period_cap",
                self.state_insurance.disability_period_cap,
            ),
            (
                "state_insurance.paid_family_leave_annual_cap",
                self.state_insurance.paid_family_leave_annual_cap,
            ),
            ("unemployment.sui_wage_base", self.unemployment.sui_wage_base),
            ("unemployment.futa_wage_base", self.unemployment.futa_wage_base),
            (
                "unemployment.futa_default_rate_percent",
                self.unemployment.futa_default_rate_percent,
            ),
        ];
        for (name, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(invalid(format!("{} must not be negative, got {}", name, amount)));
            }
        }

        Ok(())
    }

    /// Returns a copy of these rules with a different paid family leave cap mode.
    pub fn with_pfl_cap_mode(mut self, mode: PflCapMode) -> Self {
        self.state_insurance.paid_family_leave_cap_mode = mode;
        self
    }
}

/// The complete configuration of a jurisdiction directory.
#[derive(Debug, Clone)]
pub struct JurisdictionConfig {
    metadata: JurisdictionMetadata,
    /// Rule sets sorted by effective date, oldest first.
    tax_years: Vec<TaxYearRules>,
}

impl JurisdictionConfig {
    /// Creates a new configuration, sorting rule sets by effective date.
    pub fn new(metadata: JurisdictionMetadata, tax_years: Vec<TaxYearRules>) -> Self {
        let mut sorted = tax_years;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            tax_years: sorted,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all rule sets, oldest first.
    pub fn tax_years(&self) -> &[TaxYearRules] {
        &self.tax_years
    }
}
