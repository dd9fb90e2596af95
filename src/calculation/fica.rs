//! Social Security, Medicare and Additional Medicare calculation.
//!
//! Social Security and Medicare are matched by the employer at the same rate
//! on the same wages. Social Security stops at the annual wage base;
//! Additional Medicare is employee-only and starts at the annual threshold.

use rust_decimal::Decimal;

use super::wage_base::{taxable_above_threshold, taxable_within_wage_base};
use crate::config::FicaRules;
use crate::models::{AuditStep, YearToDate};
use crate::money::round_currency;

/// The result of the FICA calculation, including one audit step per tax.
#[derive(Debug, Clone)]
pub struct FicaResult {
    /// Wages subject to Social Security this period.
    pub social_security_wages: Decimal,
    /// Employee Social Security.
    pub social_security_employee: Decimal,
    /// Employer Social Security.
    pub social_security_employer: Decimal,
    /// Employee Medicare.
    pub medicare_employee: Decimal,
    /// Employer Medicare.
    pub medicare_employer: Decimal,
    /// Wages subject to Additional Medicare this period.
    pub additional_medicare_wages: Decimal,
    /// Employee Additional Medicare.
    pub additional_medicare: Decimal,
    /// Audit steps for Social Security, Medicare and Additional Medicare.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates Social Security, Medicare and Additional Medicare on gross pay.
///
/// FICA is levied on full gross pay; pre-tax deductions do not reduce it.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_fica;
/// use payroll_engine::config::FicaRules;
/// use payroll_engine::models::YearToDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rules = FicaRules {
///     social_security_rate: dec("0.062"),
///     social_security_wage_base: dec("176100"),
///     medicare_rate: dec("0.0145"),
///     additional_medicare_rate: dec("0.009"),
///     additional_medicare_threshold: dec("200000"),
/// };
///
/// let result = calculate_fica(dec("1000"), &YearToDate::from_gross(dec("175500")), &rules, 1);
/// assert_eq!(result.social_security_employee, dec("37.20"));
/// assert_eq!(result.medicare_employee, dec("14.50"));
/// ```
pub fn calculate_fica(
    gross_pay: Decimal,
    year_to_date: &YearToDate,
    rules: &FicaRules,
    step_number: u32,
) -> FicaResult {
    let ytd_ss_wages = year_to_date.social_security_wages();
    let social_security_wages =
        taxable_within_wage_base(gross_pay, ytd_ss_wages, rules.social_security_wage_base);
    let social_security = round_currency(social_security_wages * rules.social_security_rate);

    let ss_reasoning = if social_security_wages.is_zero() && !gross_pay.is_zero() {
        format!(
            "YTD wages ${} have reached the ${} wage base - no Social Security due",
            ytd_ss_wages, rules.social_security_wage_base
        )
    } else {
        format!(
            "${} taxable × {}% = ${} (employee and employer each)",
            social_security_wages,
            (rules.social_security_rate * Decimal::ONE_HUNDRED).normalize(),
            social_security
        )
    };

    let social_security_step = AuditStep {
        step_number,
        rule_id: "social_security".to_string(),
        rule_name: "Social Security".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "ytd_wages": ytd_ss_wages.to_string(),
            "wage_base": rules.social_security_wage_base.to_string(),
            "rate": rules.social_security_rate.to_string()
        }),
        output: serde_json::json!({
            "taxable_wages": social_security_wages.to_string(),
            "employee": social_security.to_string(),
            "employer": social_security.to_string()
        }),
        reasoning: ss_reasoning,
    };

    let medicare = round_currency(gross_pay * rules.medicare_rate);
    let medicare_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "medicare".to_string(),
        rule_name: "Medicare".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "rate": rules.medicare_rate.to_string()
        }),
        output: serde_json::json!({
            "employee": medicare.to_string(),
            "employer": medicare.to_string()
        }),
        reasoning: format!(
            "${} × {}% = ${} (employee and employer each, no wage base)",
            gross_pay,
            (rules.medicare_rate * Decimal::ONE_HUNDRED).normalize(),
            medicare
        ),
    };

    let ytd_medicare_wages = year_to_date.medicare_wages();
    let additional_medicare_wages = taxable_above_threshold(
        gross_pay,
        ytd_medicare_wages,
        rules.additional_medicare_threshold,
    );
    let additional_medicare =
        round_currency(additional_medicare_wages * rules.additional_medicare_rate);

    let additional_reasoning = if additional_medicare_wages.is_zero() {
        format!(
            "YTD wages ${} + ${} do not exceed the ${} threshold",
            ytd_medicare_wages, gross_pay, rules.additional_medicare_threshold
        )
    } else {
        format!(
            "${} above the ${} threshold × {}% = ${} (employee only)",
            additional_medicare_wages,
            rules.additional_medicare_threshold,
            (rules.additional_medicare_rate * Decimal::ONE_HUNDRED).normalize(),
            additional_medicare
        )
    };

    let additional_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "additional_medicare".to_string(),
        rule_name: "Additional Medicare".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "ytd_wages": ytd_medicare_wages.to_string(),
            "threshold": rules.additional_medicare_threshold.to_string(),
            "rate": rules.additional_medicare_rate.to_string()
        }),
        output: serde_json::json!({
            "taxable_wages": additional_medicare_wages.to_string(),
            "employee": additional_medicare.to_string()
        }),
        reasoning: additional_reasoning,
    };

    FicaResult {
        social_security_wages,
        social_security_employee: social_security,
        social_security_employer: social_security,
        medicare_employee: medicare,
        medicare_employer: medicare,
        additional_medicare_wages,
        additional_medicare,
        audit_steps: vec![social_security_step, medicare_step, additional_step],
    }
}
