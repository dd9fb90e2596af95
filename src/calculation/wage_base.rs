//! Wage-base and threshold helpers.
//!
//! Several payroll taxes only apply to the part of this period's wages that
//! falls below an annual wage base (Social Security, SUI, FUTA) or above an
//! annual threshold (Additional Medicare). Both are overlaps between this
//! period's wage interval `[ytd, ytd + gross]` and a fixed annual range.

use rust_decimal::Decimal;

/// Returns the part of `gross_pay` that falls below `wage_base`, given wages
/// already counted this year.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::taxable_within_wage_base;
/// use rust_decimal::Decimal;
///
/// // $600 of room left under the base
/// let taxable = taxable_within_wage_base(
///     Decimal::new(1000, 0),
///     Decimal::new(175500, 0),
///     Decimal::new(176100, 0),
/// );
/// assert_eq!(taxable, Decimal::new(600, 0));
/// ```
pub fn taxable_within_wage_base(
    gross_pay: Decimal,
    ytd_wages: Decimal,
    wage_base: Decimal,
) -> Decimal {
    (wage_base - ytd_wages)
        .min(gross_pay)
        .max(Decimal::ZERO)
}

/// Returns the part of `gross_pay` that pushes cumulative wages above `threshold`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::taxable_above_threshold;
/// use rust_decimal::Decimal;
///
/// let taxable = taxable_above_threshold(
///     Decimal::new(1000, 0),
///     Decimal::new(199500, 0),
///     Decimal::new(200000, 0),
/// );
/// assert_eq!(taxable, Decimal::new(500, 0));
/// ```
pub fn taxable_above_threshold(
    gross_pay: Decimal,
    ytd_wages: Decimal,
    threshold: Decimal,
) -> Decimal {
    (ytd_wages + gross_pay - threshold)
        .min(gross_pay)
        .max(Decimal::ZERO)
}
