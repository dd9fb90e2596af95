//! Earnings calculation functionality.
//!
//! This module computes regular pay, overtime pay and gross pay for a pay
//! period. Each line is rounded to cents before it is summed.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Earnings, PayrollInput};
use crate::money::round_currency;

/// The result of calculating earnings, including the audit step.
#[derive(Debug, Clone)]
pub struct EarningsResult {
    /// The earnings for the period.
    pub earnings: Earnings,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates regular, overtime and gross pay.
///
/// - `regular_pay = regular_hours × hourly_rate`
/// - `overtime_pay = overtime_hours × hourly_rate × overtime_multiplier`
/// - `gross_pay = regular_pay + overtime_pay + other_earnings`
///
/// Returns [`EngineError::CalculationError`] if a line does not fit in a
/// `Decimal`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_earnings;
/// use payroll_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     overtime_hours: Decimal::new(10, 0),
///     ..PayrollInput::new(Decimal::new(40, 0), Decimal::new(25, 0))
/// };
/// let result = calculate_earnings(&input, 1).unwrap();
///
/// assert_eq!(result.earnings.overtime_pay, Decimal::new(375, 0));
/// assert_eq!(result.earnings.gross_pay, Decimal::new(1375, 0));
/// ```
pub fn calculate_earnings(input: &PayrollInput, step_number: u32) -> EngineResult<EarningsResult> {
    let regular_pay = input
        .regular_hours
        .checked_mul(input.hourly_rate)
        .map(round_currency)
        .ok_or_else(|| overflow("regular pay"))?;
    let overtime_pay = input
        .hourly_rate
        .checked_mul(input.overtime_multiplier)
        .and_then(|rate| input.overtime_hours.checked_mul(rate))
        .map(round_currency)
        .ok_or_else(|| overflow("overtime pay"))?;
    let other_earnings = round_currency(input.other_earnings);
    let gross_pay = regular_pay
        .checked_add(overtime_pay)
        .and_then(|sum| sum.checked_add(other_earnings))
        .map(round_currency)
        .ok_or_else(|| overflow("gross pay"))?;

    let mut reasoning = format!(
        "{}h × ${} = ${}",
        input.regular_hours.normalize(),
        input.hourly_rate.normalize(),
        regular_pay
    );
    if input.overtime_hours > Decimal::ZERO {
        reasoning.push_str(&format!(
            "; overtime {}h × ${} × {} = ${}",
            input.overtime_hours.normalize(),
            input.hourly_rate.normalize(),
            input.overtime_multiplier.normalize(),
            overtime_pay
        ));
    }
    if other_earnings > Decimal::ZERO {
        reasoning.push_str(&format!("; other earnings ${}", other_earnings));
    }
    reasoning.push_str(&format!("; gross ${}", gross_pay));

    let audit_step = AuditStep {
        step_number,
        rule_id: "earnings".to_string(),
        rule_name: "Gross Earnings".to_string(),
        input: serde_json::json!({
            "regular_hours": input.regular_hours.to_string(),
            "overtime_hours": input.overtime_hours.to_string(),
            "hourly_rate": input.hourly_rate.to_string(),
            "overtime_multiplier": input.overtime_multiplier.to_string(),
            "other_earnings": input.other_earnings.to_string()
        }),
        output: serde_json::json!({
            "regular_pay": regular_pay.to_string(),
            "overtime_pay": overtime_pay.to_string(),
            "gross_pay": gross_pay.to_string()
        }),
        reasoning,
    };

    Ok(EarningsResult {
        earnings: Earnings {
            regular_pay,
            overtime_pay,
            other_earnings,
            gross_pay,
        },
        audit_step,
    })
}

fn overflow(line: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} is outside the representable range", line),
    }
}
