//! Request types for the payroll API.
//!
//! This module defines the JSON request structures for the
//! `/payroll/compute` and `/payroll/pay-run` endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PayrollInput;

/// Request body for the `/payroll/compute` endpoint.
///
/// The rule set is selected by `pay_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// The date the pay period is paid on.
    pub pay_date: NaiveDate,
    /// The payroll input for the period.
    pub input: PayrollInput,
}

/// One employee within a pay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunEmployee {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// The payroll input for the period.
    pub input: PayrollInput,
}

/// Request body for the `/payroll/pay-run` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunRequest {
    /// The date the pay run is paid on; selects the rule set for every employee.
    pub pay_date: NaiveDate,
    /// The employees to pay.
    pub employees: Vec<PayRunEmployee>,
}
