//! Pre-tax and post-tax deduction processing.
//!
//! Each active deduction is evaluated in input order: a fixed amount or a
//! percentage of gross, clamped to what remains under its annual limit.
//! Deductions that come to nothing are left off the result entirely.

use rust_decimal::Decimal;

use crate::models::{
    AmountKind, AppliedDeduction, AuditStep, AuditWarning, DeductionDefinition, DeductionDelta,
};
use crate::money::{percent, round_currency};

/// The result of applying deductions, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// Pre-tax deduction lines, in input order.
    pub pre_tax: Vec<AppliedDeduction>,
    /// Post-tax deduction lines, in input order.
    pub post_tax: Vec<AppliedDeduction>,
    /// Sum of pre-tax lines.
    pub total_pre_tax: Decimal,
    /// Sum of post-tax lines.
    pub total_post_tax: Decimal,
    /// Year-to-date deltas for every applied deduction.
    pub deltas: Vec<DeductionDelta>,
    /// Warnings for deductions clamped or skipped by their annual limit.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies deduction definitions against gross pay.
///
/// For each deduction, in order:
/// 1. The nominal amount is `amount` (fixed) or `amount% × gross_pay`.
/// 2. With an annual limit, it is clamped to `max(0, annual_limit - ytd_amount)`.
/// 3. The amount is rounded to cents; a zero amount is omitted.
/// 4. The line goes to the pre-tax or post-tax list per `is_pre_tax`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::apply_deductions;
/// use payroll_engine::models::{AmountKind, DeductionDefinition, DeductionType};
/// use rust_decimal::Decimal;
///
/// let retirement = DeductionDefinition {
///     id: "ret_001".to_string(),
///     deduction_type: DeductionType::Retirement,
///     amount_kind: AmountKind::Fixed,
///     amount: Decimal::new(100, 0),
///     is_pre_tax: true,
///     annual_limit: Some(Decimal::new(23500, 0)),
///     ytd_amount: Decimal::new(23450, 0),
/// };
///
/// let result = apply_deductions(&[retirement], Decimal::new(1000, 0), 2);
/// assert_eq!(result.total_pre_tax, Decimal::new(50, 0));
/// ```
pub fn apply_deductions(
    deductions: &[DeductionDefinition],
    gross_pay: Decimal,
    step_number: u32,
) -> DeductionsResult {
    let mut pre_tax = Vec::new();
    let mut post_tax = Vec::new();
    let mut deltas = Vec::new();
    let mut warnings = Vec::new();
    let mut evaluations = Vec::with_capacity(deductions.len());

    for deduction in deductions {
        let nominal = match deduction.amount_kind {
            AmountKind::Fixed => deduction.amount,
            AmountKind::PercentageOfGross => percent(deduction.amount) * gross_pay,
        };

        let remaining = deduction.remaining_limit();
        let clamped = match remaining {
            Some(room) => nominal.min(room),
            None => nominal,
        };
        let amount = round_currency(clamped.max(Decimal::ZERO));
        let limited = clamped < nominal;

        if limited {
            let message = if amount.is_zero() {
                format!(
                    "Deduction '{}' has reached its annual limit of ${} and was not applied",
                    deduction.id,
                    deduction.annual_limit.unwrap_or_default()
                )
            } else {
                format!(
                    "Deduction '{}' reduced from ${} to ${} by its annual limit",
                    deduction.id,
                    round_currency(nominal),
                    amount
                )
            };
            warnings.push(AuditWarning {
                code: "DEDUCTION_LIMIT_REACHED".to_string(),
                message,
                severity: "low".to_string(),
            });
        }

        evaluations.push(serde_json::json!({
            "id": deduction.id,
            "type": deduction.deduction_type.as_str(),
            "pre_tax": deduction.is_pre_tax,
            "nominal": nominal.to_string(),
            "remaining_limit": remaining.map(|r| r.to_string()),
            "applied": amount.to_string(),
            "omitted": amount.is_zero()
        }));

        if amount.is_zero() {
            continue;
        }

        let line = AppliedDeduction {
            deduction_id: deduction.id.clone(),
            deduction_type: deduction.deduction_type,
            amount,
        };
        if deduction.is_pre_tax {
            pre_tax.push(line);
        } else {
            post_tax.push(line);
        }
        deltas.push(DeductionDelta {
            deduction_id: deduction.id.clone(),
            amount,
        });
    }

    let total_pre_tax: Decimal = pre_tax.iter().map(|d| d.amount).sum();
    let total_post_tax: Decimal = post_tax.iter().map(|d| d.amount).sum();

    let audit_step = AuditStep {
        step_number,
        rule_id: "deductions".to_string(),
        rule_name: "Pre-Tax and Post-Tax Deductions".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "deduction_count": deductions.len()
        }),
        output: serde_json::json!({
            "deductions": evaluations,
            "total_pre_tax": total_pre_tax.to_string(),
            "total_post_tax": total_post_tax.to_string()
        }),
        reasoning: format!(
            "{} of {} deductions applied: pre-tax ${}, post-tax ${}",
            pre_tax.len() + post_tax.len(),
            deductions.len(),
            total_pre_tax,
            total_post_tax
        ),
    };

    DeductionsResult {
        pre_tax,
        post_tax,
        total_pre_tax,
        total_post_tax,
        deltas,
        warnings,
        audit_step,
    }
}
