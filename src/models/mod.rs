//! Core data models for the payroll engine.
//!
//! This module contains the payroll input, deduction and result types that
//! flow through the engine.

mod deduction;
mod payroll_input;
mod payroll_result;

pub use deduction::{AmountKind, AppliedDeduction, DeductionDefinition, DeductionDelta, DeductionType};
pub use payroll_input::{
    FilingStatus, LocalResidency, MAX_AMOUNT, MAX_OVERTIME_MULTIPLIER, MAX_PERIOD_HOURS,
    PayrollInput, WithholdingElection, YearToDate,
};
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, EmployerCosts, Earnings, PayrollResult, TaxWithholdings,
};
