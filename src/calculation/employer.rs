//! Employer-side payroll costs.
//!
//! The employer matches Social Security and Medicare and pays state (SUI)
//! and federal (FUTA) unemployment tax on wages up to their wage bases.

use rust_decimal::Decimal;

use super::fica::FicaResult;
use super::wage_base::taxable_within_wage_base;
use crate::config::UnemploymentRules;
use crate::models::{AuditStep, EmployerCosts, PayrollInput};
use crate::money::{percent, round_currency};

/// The result of the employer cost calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct EmployerCostsResult {
    /// Employer costs for the period.
    pub costs: EmployerCosts,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employer costs for a pay period.
///
/// - Social Security and Medicare mirror the employee amounts in `fica`.
/// - SUI: wages under the employer's SUI wage base (or the rule set's
///   default) × `sui_rate_percent`.
/// - FUTA: wages under the FUTA wage base × `futa_rate_percent`, or the
///   rule set's default rate.
pub fn calculate_employer_costs(
    gross_pay: Decimal,
    input: &PayrollInput,
    fica: &FicaResult,
    rules: &UnemploymentRules,
    step_number: u32,
) -> EmployerCostsResult {
    let ytd_wages = input.year_to_date.gross_pay;

    let sui_wage_base = input.sui_wage_base.unwrap_or(rules.sui_wage_base);
    let sui_wages = taxable_within_wage_base(gross_pay, ytd_wages, sui_wage_base);
    let sui_employer = round_currency(sui_wages * percent(input.sui_rate_percent));

    let futa_rate_percent = input
        .futa_rate_percent
        .unwrap_or(rules.futa_default_rate_percent);
    let futa_wages = taxable_within_wage_base(gross_pay, ytd_wages, rules.futa_wage_base);
    let futa_employer = round_currency(futa_wages * percent(futa_rate_percent));

    let mut costs = EmployerCosts {
        social_security_employer: fica.social_security_employer,
        medicare_employer: fica.medicare_employer,
        sui_employer,
        futa_employer,
        total: Decimal::ZERO,
    };
    costs.total = costs.social_security_employer
        + costs.medicare_employer
        + costs.sui_employer
        + costs.futa_employer;

    let audit_step = AuditStep {
        step_number,
        rule_id: "employer_costs".to_string(),
        rule_name: "Employer Taxes".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "ytd_wages": ytd_wages.to_string(),
            "sui_rate_percent": input.sui_rate_percent.to_string(),
            "sui_wage_base": sui_wage_base.to_string(),
            "futa_rate_percent": futa_rate_percent.to_string(),
            "futa_wage_base": rules.futa_wage_base.to_string()
        }),
        output: serde_json::json!({
            "social_security_employer": costs.social_security_employer.to_string(),
            "medicare_employer": costs.medicare_employer.to_string(),
            "sui_wages": sui_wages.to_string(),
            "sui_employer": sui_employer.to_string(),
            "futa_wages": futa_wages.to_string(),
            "futa_employer": futa_employer.to_string(),
            "total": costs.total.to_string()
        }),
        reasoning: format!(
            "SS ${} + Medicare ${} + SUI ${} × {}% + FUTA ${} × {}% = ${}",
            costs.social_security_employer,
            costs.medicare_employer,
            sui_wages,
            input.sui_rate_percent.normalize(),
            futa_wages,
            futa_rate_percent.normalize(),
            costs.total
        ),
    };

    EmployerCostsResult { costs, audit_step }
}
