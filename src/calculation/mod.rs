//! Calculation logic for the payroll engine.
//!
//! This module contains the step functions that make up a pay computation:
//! earnings, pre-tax and post-tax deductions, federal and state income tax
//! withholding, local tax, FICA, state disability and paid family leave, and
//! employer costs. [`PayrollEngine`] runs them in order against one tax-year
//! rule set.

mod deductions;
mod earnings;
mod employer;
mod engine;
mod fica;
mod local_tax;
mod salary;
mod state_insurance;
mod wage_base;
mod withholding;

pub use deductions::{DeductionsResult, apply_deductions};
pub use earnings::{EarningsResult, calculate_earnings};
pub use employer::{EmployerCostsResult, calculate_employer_costs};
pub use engine::PayrollEngine;
pub use fica::{FicaResult, calculate_fica};
pub use local_tax::{LocalTaxResult, calculate_local_tax};
pub use salary::hourly_equivalent;
pub use state_insurance::{StateInsuranceResult, calculate_state_insurance};
pub use wage_base::{taxable_above_threshold, taxable_within_wage_base};
pub use withholding::{IncomeTaxResult, TaxAuthority, calculate_income_tax};
