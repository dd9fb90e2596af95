//! Income tax withholding by the annualized percentage method.
//!
//! The same algorithm serves federal and state withholding; only the rule
//! tables differ. Period wages are annualized, reduced by the standard
//! deduction and allowances, run through the bracket schedule for the
//! filing status, then scaled back to the period.

use rust_decimal::Decimal;

use crate::config::IncomeTaxRules;
use crate::models::{AuditStep, WithholdingElection};
use crate::money::round_currency;

/// The taxing authority an income tax calculation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxAuthority {
    /// Federal income tax.
    Federal,
    /// State income tax.
    State,
}

impl TaxAuthority {
    fn rule_id(&self) -> &'static str {
        match self {
            TaxAuthority::Federal => "federal_income_tax",
            TaxAuthority::State => "state_income_tax",
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            TaxAuthority::Federal => "Federal Income Tax Withholding",
            TaxAuthority::State => "State Income Tax Withholding",
        }
    }
}

/// The result of an income tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Tax withheld this period, rounded to cents.
    pub tax: Decimal,
    /// Annual amount the bracket schedule was applied to.
    pub annual_taxable: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates income tax withholding for one pay period.
///
/// 1. If the election is not withheld, the tax is zero.
/// 2. `annual = taxable_wages × periods_per_year`
/// 3. `annual_taxable = max(0, annual - standard_deduction - allowances × allowance_amount)`
/// 4. The schedule for the filing status gives the annual tax.
/// 5. `tax = round(annual_tax / periods_per_year)`
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_income_tax, TaxAuthority};
/// use payroll_engine::config::{BracketConfig, ByFilingStatus, IncomeTaxRules, TaxSchedule};
/// use payroll_engine::models::{FilingStatus, WithholdingElection};
/// use rust_decimal::Decimal;
///
/// let flat = || TaxSchedule::try_from(vec![BracketConfig {
///     floor: Decimal::ZERO,
///     rate: Decimal::new(10, 2),
/// }]).unwrap();
/// let rules = IncomeTaxRules {
///     standard_deduction: ByFilingStatus {
///         single_or_head_of_household: Decimal::new(5200, 0),
///         married: Decimal::new(10400, 0),
///     },
///     allowance_amount: Decimal::ZERO,
///     schedules: ByFilingStatus { single_or_head_of_household: flat(), married: flat() },
/// };
///
/// // (1000 × 52 - 5200) × 10% / 52 = 90
/// let election = WithholdingElection::new(FilingStatus::Single, 0);
/// let result = calculate_income_tax(
///     TaxAuthority::Federal, Decimal::new(1000, 0), &election, &rules, 52, 1,
/// );
/// assert_eq!(result.tax, Decimal::new(90, 0));
/// ```
pub fn calculate_income_tax(
    authority: TaxAuthority,
    taxable_wages: Decimal,
    election: &WithholdingElection,
    rules: &IncomeTaxRules,
    periods_per_year: u32,
    step_number: u32,
) -> IncomeTaxResult {
    let election_json = serde_json::json!({
        "taxable_wages": taxable_wages.to_string(),
        "filing_status": election.filing_status,
        "allowances": election.allowances,
        "withheld": election.withheld
    });

    if !election.withheld {
        return IncomeTaxResult {
            tax: Decimal::ZERO,
            annual_taxable: Decimal::ZERO,
            audit_step: AuditStep {
                step_number,
                rule_id: authority.rule_id().to_string(),
                rule_name: authority.rule_name().to_string(),
                input: election_json,
                output: serde_json::json!({ "tax": "0" }),
                reasoning: "Withholding not elected - tax is $0".to_string(),
            },
        };
    }

    let periods = Decimal::from(periods_per_year);
    let annual_wages = taxable_wages * periods;
    let standard_deduction = *rules.standard_deduction.for_status(election.filing_status);
    let allowance_total = Decimal::from(election.allowances) * rules.allowance_amount;
    let annual_taxable = (annual_wages - standard_deduction - allowance_total).max(Decimal::ZERO);

    let schedule = rules.schedules.for_status(election.filing_status);
    let bracket = schedule.bracket_for(annual_taxable);
    let annual_tax = schedule.tax_on(annual_taxable);
    let tax = round_currency(annual_tax / periods).max(Decimal::ZERO);

    let reasoning = if annual_taxable.is_zero() {
        format!(
            "Annual wages ${} do not exceed deductions ${} - tax is $0",
            annual_wages,
            standard_deduction + allowance_total
        )
    } else {
        format!(
            "${} - ${} deductions = ${} taxable; ${} + {}% over ${} = ${} annual / {} = ${}",
            annual_wages,
            standard_deduction + allowance_total,
            annual_taxable,
            bracket.base_tax,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            bracket.floor,
            annual_tax.round_dp(2),
            periods_per_year,
            tax
        )
    };

    IncomeTaxResult {
        tax,
        annual_taxable,
        audit_step: AuditStep {
            step_number,
            rule_id: authority.rule_id().to_string(),
            rule_name: authority.rule_name().to_string(),
            input: election_json,
            output: serde_json::json!({
                "annual_wages": annual_wages.to_string(),
                "standard_deduction": standard_deduction.to_string(),
                "allowance_deduction": allowance_total.to_string(),
                "annual_taxable": annual_taxable.to_string(),
                "bracket_floor": bracket.floor.to_string(),
                "bracket_rate": bracket.rate.to_string(),
                "annual_tax": annual_tax.to_string(),
                "tax": tax.to_string()
            }),
            reasoning,
        },
    }
}
