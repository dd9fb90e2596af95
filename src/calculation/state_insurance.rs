//! State disability insurance and paid family leave.
//!
//! Both are small flat-rate employee deductions on gross pay. Disability is
//! capped per pay period. Paid family leave has an annual maximum, enforced
//! per [`PflCapMode`].

use rust_decimal::Decimal;

use crate::config::{PflCapMode, StateInsuranceRules};
use crate::models::AuditStep;
use crate::money::round_currency;

/// The result of the state insurance calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct StateInsuranceResult {
    /// Disability insurance withheld this period.
    pub disability_insurance: Decimal,
    /// Paid family leave withheld this period.
    pub paid_family_leave: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates state disability insurance and paid family leave.
///
/// - Disability: `min(round(gross × rate), period cap)`.
/// - Paid family leave: `round(min(gross × rate, cap))`, where the cap is the
///   annual maximum under [`PflCapMode::PerPeriod`], or the annual maximum
///   less `ytd_paid_family_leave` (floored at 0) under [`PflCapMode::YearToDate`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_state_insurance;
/// use payroll_engine::config::{PflCapMode, StateInsuranceRules};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rules = StateInsuranceRules {
///     disability_rate: dec("0.005"),
///     disability_period_cap: dec("0.60"),
///     paid_family_leave_rate: dec("0.00388"),
///     paid_family_leave_annual_cap: dec("354.53"),
///     paid_family_leave_cap_mode: PflCapMode::PerPeriod,
/// };
///
/// let result = calculate_state_insurance(dec("1000"), Decimal::ZERO, &rules, 1);
/// assert_eq!(result.disability_insurance, dec("0.60"));
/// assert_eq!(result.paid_family_leave, dec("3.88"));
/// ```
pub fn calculate_state_insurance(
    gross_pay: Decimal,
    ytd_paid_family_leave: Decimal,
    rules: &StateInsuranceRules,
    step_number: u32,
) -> StateInsuranceResult {
    let nominal_disability = round_currency(gross_pay * rules.disability_rate);
    let disability_insurance = nominal_disability.min(rules.disability_period_cap);

    let pfl_cap = match rules.paid_family_leave_cap_mode {
        PflCapMode::PerPeriod => rules.paid_family_leave_annual_cap,
        PflCapMode::YearToDate => {
            (rules.paid_family_leave_annual_cap - ytd_paid_family_leave).max(Decimal::ZERO)
        }
    };
    let nominal_pfl = gross_pay * rules.paid_family_leave_rate;
    let paid_family_leave = round_currency(nominal_pfl.min(pfl_cap));

    let mut reasoning = format!("Disability ${}", disability_insurance);
    if disability_insurance < nominal_disability {
        reasoning.push_str(&format!(
            " (capped at ${} per period)",
            rules.disability_period_cap
        ));
    }
    reasoning.push_str(&format!("; paid family leave ${}", paid_family_leave));
    if nominal_pfl > pfl_cap {
        reasoning.push_str(&format!(" (capped at ${})", pfl_cap));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "state_insurance".to_string(),
        rule_name: "State Disability and Paid Family Leave".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "ytd_paid_family_leave": ytd_paid_family_leave.to_string(),
            "disability_rate": rules.disability_rate.to_string(),
            "disability_period_cap": rules.disability_period_cap.to_string(),
            "paid_family_leave_rate": rules.paid_family_leave_rate.to_string(),
            "paid_family_leave_annual_cap": rules.paid_family_leave_annual_cap.to_string(),
            "cap_mode": rules.paid_family_leave_cap_mode
        }),
        output: serde_json::json!({
            "disability_insurance": disability_insurance.to_string(),
            "paid_family_leave": paid_family_leave.to_string(),
            "paid_family_leave_cap": pfl_cap.to_string()
        }),
        reasoning,
    };

    StateInsuranceResult {
        disability_insurance,
        paid_family_leave,
        audit_step,
    }
}
