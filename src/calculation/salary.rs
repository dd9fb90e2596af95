//! Hourly-equivalent rates for salaried employees.
//!
//! The engine works from hours and an hourly rate. Salaried employees are
//! run through it with the rate their salary works out to per hour.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Converts an annual salary to an hourly rate for a pay period of `weekly_hours`.
///
/// `hourly = annual_salary / periods_per_year / weekly_hours`. The rate is not
/// rounded; pay lines are rounded when earnings are calculated.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::hourly_equivalent;
/// use rust_decimal::Decimal;
///
/// let rate = hourly_equivalent(Decimal::new(52000, 0), Decimal::new(40, 0), 52).unwrap();
/// assert_eq!(rate, Decimal::new(25, 0));
/// ```
pub fn hourly_equivalent(
    annual_salary: Decimal,
    weekly_hours: Decimal,
    periods_per_year: u32,
) -> EngineResult<Decimal> {
    if annual_salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "annual_salary",
            format!("must not be negative, got {}", annual_salary),
        ));
    }
    if weekly_hours <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "weekly_hours",
            format!("must be positive, got {}", weekly_hours),
        ));
    }
    if periods_per_year == 0 {
        return Err(EngineError::invalid_input(
            "periods_per_year",
            "must be positive",
        ));
    }

    Ok(annual_salary / Decimal::from(periods_per_year) / weekly_hours)
}
