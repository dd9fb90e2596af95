//! Payroll tax calculation engine
//!
//! This crate computes one employee's pay for one pay period: gross pay,
//! pre-tax and post-tax deductions with annual limits, federal, state and
//! local income tax withholding, FICA with wage-base and threshold logic,
//! state disability and paid family leave, and employer-side costs. Tax
//! constants live in per-year YAML rule sets, and every result carries an
//! audit trace of the rules applied.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod money;
