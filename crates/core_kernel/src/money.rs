//! Amount helpers with precise decimal arithmetic
//!
//! Every amount in the ledgers is a single-currency `rust_decimal::Decimal`.
//! This module turns user-typed text into decimals and decimals into display
//! strings, so the domain crates never touch floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Internal precision (decimal places) for derived amounts such as interest
pub const AMOUNT_PRECISION: u32 = 4;

/// Errors that can occur while reading amounts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount is required")]
    Empty,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be positive: {0}")]
    NotPositive(Decimal),

    #[error("Amount must not be negative: {0}")]
    Negative(Decimal),
}

/// Parses user-typed amount text into a decimal
///
/// Thousands separators (`,`) and surrounding whitespace are ignored, an
/// optional leading sign is accepted. Scientific notation is accepted as well
/// since numeric keyboards occasionally produce it.
///
/// # Errors
///
/// Returns [`MoneyError::Empty`] for blank input and
/// [`MoneyError::InvalidAmount`] for anything that is not a finite number.
///
/// # Example
///
/// ```rust
/// use core_kernel::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount(" 1,50,000 ").unwrap(), dec!(150000));
/// assert_eq!(parse_amount("-10.5").unwrap(), dec!(-10.5));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(MoneyError::Empty);
    }

    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .map_err(|_| MoneyError::InvalidAmount(input.trim().to_string()))
}

/// Parses an amount that must be strictly positive
pub fn parse_positive_amount(input: &str) -> Result<Decimal, MoneyError> {
    let value = parse_amount(input)?;
    if value <= Decimal::ZERO {
        return Err(MoneyError::NotPositive(value));
    }
    Ok(value)
}

/// Parses an amount that must be zero or positive
pub fn parse_non_negative_amount(input: &str) -> Result<Decimal, MoneyError> {
    let value = parse_amount(input)?;
    if value < Decimal::ZERO {
        return Err(MoneyError::Negative(value));
    }
    Ok(value)
}

/// Reads a stored amount; accepts JSON numbers and numeric strings
///
/// Anything else, including `null`, reads as `None`.
pub fn read_number(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(number) => parse_amount(&number.to_string()).ok(),
        serde_json::Value::String(text) => parse_amount(text).ok(),
        _ => None,
    }
}

/// Sums amounts, saturating at the bounds of `Decimal` instead of panicking
///
/// # Example
///
/// ```rust
/// use core_kernel::money::sum_amounts;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(sum_amounts([dec!(1.5), dec!(2)]), dec!(3.5));
/// assert_eq!(sum_amounts([Decimal::MAX, dec!(1)]), Decimal::MAX);
/// ```
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}

/// Formats an amount in rupees with Indian digit grouping and no fraction
///
/// Rounds half away from zero to a whole number first.
///
/// # Example
///
/// ```rust
/// use core_kernel::format_inr;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_inr(dec!(123456.7)), "₹ 1,23,457");
/// assert_eq!(format_inr(dec!(999)), "₹ 999");
/// ```
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_indian(&digits);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("₹ -{}", grouped)
    } else {
        format!("₹ {}", grouped)
    }
}

/// Formats an amount with a fixed number of decimals and an explicit sign
///
/// Non-negative values get a leading `+`, which is how recovery figures are
/// shown next to capital snapshots.
pub fn format_signed(amount: Decimal, dp: u32) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.*}", dp as usize, rounded);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        body
    } else {
        format!("+{}", body.trim_start_matches('-'))
    }
}

/// Groups a plain digit string as lakh/crore: last three digits, then pairs
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_strips_separators() {
        assert_eq!(parse_amount("1,200").unwrap(), dec!(1200));
        assert_eq!(parse_amount("  980.5 ").unwrap(), dec!(980.5));
        assert_eq!(parse_amount("+5").unwrap(), dec!(5));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("   "), Err(MoneyError::Empty));
        assert!(matches!(parse_amount("12abc"), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_positive_amount() {
        assert!(matches!(parse_positive_amount("0"), Err(MoneyError::NotPositive(_))));
        assert_eq!(parse_positive_amount("250").unwrap(), dec!(250));
        assert!(matches!(parse_non_negative_amount("-1"), Err(MoneyError::Negative(_))));
        assert_eq!(parse_non_negative_amount("0").unwrap(), dec!(0));
    }

    #[test]
    fn test_read_number() {
        use serde_json::json;
        assert_eq!(read_number(&json!(12.5)), Some(dec!(12.5)));
        assert_eq!(read_number(&json!("7")), Some(dec!(7)));
        assert_eq!(read_number(&json!("abc")), None);
        assert_eq!(read_number(&json!(null)), None);
        assert_eq!(read_number(&json!({"intraday": 1})), None);
    }

    #[test]
    fn test_sum_amounts_saturates() {
        assert_eq!(sum_amounts(Vec::<Decimal>::new()), Decimal::ZERO);
        assert_eq!(sum_amounts([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(sum_amounts([Decimal::MIN, dec!(-1)]), Decimal::MIN);
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹ 0");
        assert_eq!(format_inr(dec!(1000)), "₹ 1,000");
        assert_eq!(format_inr(dec!(100000)), "₹ 1,00,000");
        assert_eq!(format_inr(dec!(12345678.49)), "₹ 1,23,45,678");
        assert_eq!(format_inr(dec!(-1500)), "₹ -1,500");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(dec!(20), 2), "+20.00");
        assert_eq!(format_signed(dec!(-3.456), 2), "-3.46");
        assert_eq!(format_signed(dec!(0), 2), "+0.00");
    }
}
