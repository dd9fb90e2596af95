//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures that capture all outputs of a pay computation: earnings,
//! itemized deductions and tax withholdings, net pay, employer costs,
//! year-to-date deltas and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AppliedDeduction, DeductionDelta, DeductionType};

/// Earnings for the pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Regular hours × hourly rate.
    pub regular_pay: Decimal,
    /// Overtime hours × hourly rate × overtime multiplier.
    pub overtime_pay: Decimal,
    /// Other earnings passed through from the input.
    pub other_earnings: Decimal,
    /// Sum of the above.
    pub gross_pay: Decimal,
}

/// Employee tax withholdings for the pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxWithholdings {
    /// Federal income tax.
    pub federal_income_tax: Decimal,
    /// State income tax.
    pub state_income_tax: Decimal,
    /// Local income tax.
    pub local_tax: Decimal,
    /// Employee Social Security.
    pub social_security_employee: Decimal,
    /// Employee Medicare.
    pub medicare_employee: Decimal,
    /// Employee Additional Medicare.
    pub additional_medicare: Decimal,
    /// State disability insurance.
    pub disability_insurance: Decimal,
    /// State paid family leave.
    pub paid_family_leave: Decimal,
    /// Sum of all withholdings.
    pub total: Decimal,
}

impl TaxWithholdings {
    /// Sums the individual withholding lines.
    pub fn sum(&self) -> Decimal {
        self.federal_income_tax
            + self.state_income_tax
            + self.local_tax
            + self.social_security_employee
            + self.medicare_employee
            + self.additional_medicare
            + self.disability_insurance
            + self.paid_family_leave
    }
}

/// Employer-side costs for the pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCosts {
    /// Employer Social Security match.
    pub social_security_employer: Decimal,
    /// Employer Medicare match.
    pub medicare_employer: Decimal,
    /// State unemployment insurance.
    pub sui_employer: Decimal,
    /// Federal unemployment tax.
    pub futa_employer: Decimal,
    /// Sum of all employer costs.
    pub total: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag input that was handled but may need attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The audit trace of a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payroll computation.
///
/// Every field is derived from the input and the rule set; the same input
/// always produces an identical result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Earnings for the period.
    pub earnings: Earnings,
    /// Pre-tax deduction lines, in input order.
    pub pre_tax_deductions: Vec<AppliedDeduction>,
    /// Sum of pre-tax deductions.
    pub total_pre_tax_deductions: Decimal,
    /// Gross pay less pre-tax deductions; the income tax base.
    pub taxable_wages: Decimal,
    /// Employee tax withholdings.
    pub taxes: TaxWithholdings,
    /// Post-tax deduction lines, in input order.
    pub post_tax_deductions: Vec<AppliedDeduction>,
    /// Sum of post-tax deductions.
    pub total_post_tax_deductions: Decimal,
    /// Pre-tax deductions + withholdings + post-tax deductions.
    pub total_deductions: Decimal,
    /// Gross pay less total deductions.
    pub net_pay: Decimal,
    /// Employer-side costs.
    pub employer: EmployerCosts,
    /// Amounts to add to each deduction's year-to-date total.
    pub deduction_deltas: Vec<DeductionDelta>,
    /// Record of every rule applied.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Gross pay for the period.
    pub fn gross_pay(&self) -> Decimal {
        self.earnings.gross_pay
    }

    /// Totals applied deductions (pre- and post-tax) by type.
    pub fn deductions_by_type(&self) -> BTreeMap<DeductionType, Decimal> {
        let mut totals = BTreeMap::new();
        for line in self.pre_tax_deductions.iter().chain(&self.post_tax_deductions) {
            *totals.entry(line.deduction_type).or_insert(Decimal::ZERO) += line.amount;
        }
        totals
    }
}
