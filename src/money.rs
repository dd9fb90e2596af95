//! Currency rounding and display helpers.
//!
//! Every monetary line item the engine produces passes through
//! [`round_currency`], so totals are sums of already-rounded components.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to cents, with halves rounded away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::money::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("-2.345").unwrap()), Decimal::from_str("-2.35").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage value (e.g. `5` for 5%) to a fraction.
pub fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

/// Formats an amount for display as `$1,234.56`, or `-$1,234.56` for negatives.
///
/// # Examples
///
/// ```
/// use payroll_engine::money::format_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_currency(Decimal::from_str("1234.5").unwrap()), "$1,234.50");
/// assert_eq!(format_currency(Decimal::from_str("-1234567.891").unwrap()), "-$1,234,567.89");
/// assert_eq!(format_currency(Decimal::ZERO), "$0.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_currency(dec("0.005")), dec("0.01"));
        assert_eq!(round_currency(dec("0.015")), dec("0.02"));
        assert_eq!(round_currency(dec("0.025")), dec("0.03"));
        assert_eq!(round_currency(dec("-0.005")), dec("-0.01"));
    }

    #[test]
    fn test_round_below_midpoint_truncates() {
        assert_eq!(round_currency(dec("37.1999")), dec("37.20"));
        assert_eq!(round_currency(dec("37.1949")), dec("37.19"));
    }

    #[test]
    fn test_round_keeps_exact_cents() {
        assert_eq!(round_currency(dec("1425.00")), dec("1425"));
        assert_eq!(round_currency(dec("71.25")), dec("71.25"));
    }

    #[test]
    fn test_percent_converts_to_fraction() {
        assert_eq!(percent(dec("5")), dec("0.05"));
        assert_eq!(percent(dec("0.6")), dec("0.006"));
    }

    #[test]
    fn test_format_positive_with_thousands_separator() {
        assert_eq!(format_currency(dec("1234.56")), "$1,234.56");
        assert_eq!(format_currency(dec("1000000")), "$1,000,000.00");
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_currency(dec("0.5")), "$0.50");
        assert_eq!(format_currency(dec("999.999")), "$1,000.00");
        assert_eq!(format_currency(dec("12")), "$12.00");
    }

    #[test]
    fn test_format_negative_amounts() {
        assert_eq!(format_currency(dec("-1234.56")), "-$1,234.56");
        assert_eq!(format_currency(dec("-0.01")), "-$0.01");
    }

    #[test]
    fn test_format_zero_and_negative_zero() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }
}
