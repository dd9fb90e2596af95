//! Local income tax calculation.
//!
//! Two kinds of locality are supported: one that taxes resident wages at a
//! flat rate, and one that levies a surcharge on the state income tax.

use rust_decimal::Decimal;

use crate::config::LocalTaxRules;
use crate::models::{AuditStep, AuditWarning, LocalResidency};
use crate::money::round_currency;

/// The result of a local tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct LocalTaxResult {
    /// Local tax withheld this period, rounded to cents.
    pub tax: Decimal,
    /// Set when both residency flags were given.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates local income tax.
///
/// - Flat-rate locality resident: `(taxable_wages × periods / periods) × flat rate`,
///   i.e. the de-annualized wage figure times the rate.
/// - Otherwise, surcharge locality resident: `state_income_tax × surcharge rate`.
/// - Otherwise zero.
///
/// Taxable wages below zero (pre-tax deductions above gross) are taxed as zero.
///
/// When both flags are set the flat-rate locality takes precedence and a
/// `LOCAL_RESIDENCY_CONFLICT` warning is returned.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_local_tax;
/// use payroll_engine::config::{LocalTaxRules, LocalityRate};
/// use payroll_engine::models::LocalResidency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rules = LocalTaxRules {
///     flat_rate: LocalityRate { name: "City".to_string(), rate: Decimal::from_str("0.03876").unwrap() },
///     state_surcharge: LocalityRate { name: "Town".to_string(), rate: Decimal::from_str("0.1675").unwrap() },
/// };
/// let residency = LocalResidency { flat_rate_locality: false, state_surcharge_locality: true };
///
/// let result = calculate_local_tax(Decimal::new(1000, 0), Decimal::new(40, 0), &residency, &rules, 52, 1);
/// assert_eq!(result.tax, Decimal::from_str("6.70").unwrap());
/// ```
pub fn calculate_local_tax(
    taxable_wages: Decimal,
    state_income_tax: Decimal,
    residency: &LocalResidency,
    rules: &LocalTaxRules,
    periods_per_year: u32,
    step_number: u32,
) -> LocalTaxResult {
    let warning = residency.is_conflicting().then(|| AuditWarning {
        code: "LOCAL_RESIDENCY_CONFLICT".to_string(),
        message: format!(
            "Employee is flagged as resident of both {} and {}; {} tax applied",
            rules.flat_rate.name, rules.state_surcharge.name, rules.flat_rate.name
        ),
        severity: "medium".to_string(),
    });

    let (tax, locality, reasoning) = if residency.flat_rate_locality {
        let periods = Decimal::from(periods_per_year);
        let period_wages = (taxable_wages * periods / periods).max(Decimal::ZERO);
        let tax = round_currency(period_wages * rules.flat_rate.rate);
        let reasoning = format!(
            "{} resident: ${} × {}% = ${}",
            rules.flat_rate.name,
            period_wages,
            (rules.flat_rate.rate * Decimal::ONE_HUNDRED).normalize(),
            tax
        );
        (tax, Some(rules.flat_rate.name.as_str()), reasoning)
    } else if residency.state_surcharge_locality {
        let tax = round_currency(state_income_tax * rules.state_surcharge.rate);
        let reasoning = format!(
            "{} resident: ${} state tax × {}% surcharge = ${}",
            rules.state_surcharge.name,
            state_income_tax,
            (rules.state_surcharge.rate * Decimal::ONE_HUNDRED).normalize(),
            tax
        );
        (tax, Some(rules.state_surcharge.name.as_str()), reasoning)
    } else {
        (
            Decimal::ZERO,
            None,
            "No local residency - local tax is $0".to_string(),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "local_tax".to_string(),
        rule_name: "Local Income Tax".to_string(),
        input: serde_json::json!({
            "taxable_wages": taxable_wages.to_string(),
            "state_income_tax": state_income_tax.to_string(),
            "flat_rate_locality": residency.flat_rate_locality,
            "state_surcharge_locality": residency.state_surcharge_locality
        }),
        output: serde_json::json!({
            "locality": locality,
            "tax": tax.to_string()
        }),
        reasoning,
    };

    LocalTaxResult {
        tax,
        warning,
        audit_step,
    }
}
