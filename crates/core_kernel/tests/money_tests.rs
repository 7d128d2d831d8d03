//! Tests for amount parsing and display helpers
//!
//! Tests cover user-typed input, Indian digit grouping and signed display of
//! recovery figures.

use core_kernel::money::{parse_non_negative_amount, parse_positive_amount};
use core_kernel::{format_inr, format_signed, parse_amount, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod parsing {
    use super::*;

    #[test]
    fn test_indian_grouped_input() {
        assert_eq!(parse_amount("12,34,567.50").unwrap(), dec!(1234567.50));
    }

    #[test]
    fn test_inner_whitespace_is_ignored() {
        assert_eq!(parse_amount("1 200").unwrap(), dec!(1200));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_amount("1.5e3").unwrap(), dec!(1500));
    }

    #[test]
    fn test_negative_capital_is_a_valid_amount() {
        assert_eq!(parse_amount("-2500").unwrap(), dec!(-2500));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_amount(""), Err(MoneyError::Empty));
        assert_eq!(parse_amount(",,"), Err(MoneyError::Empty));
    }

    #[test]
    fn test_invalid_input_keeps_original_text() {
        match parse_amount(" 12.3.4 ") {
            Err(MoneyError::InvalidAmount(text)) => assert_eq!(text, "12.3.4"),
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_infinity_is_rejected() {
        assert!(parse_amount("Infinity").is_err());
    }

    #[test]
    fn test_positive_and_non_negative_bounds() {
        assert_eq!(parse_positive_amount("0.01").unwrap(), dec!(0.01));
        assert_eq!(
            parse_positive_amount("-5"),
            Err(MoneyError::NotPositive(dec!(-5)))
        );
        assert_eq!(parse_non_negative_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(
            parse_non_negative_amount("-0.5"),
            Err(MoneyError::Negative(dec!(-0.5)))
        );
    }
}

mod display {
    use super::*;

    #[test]
    fn test_format_inr_rounds_half_away_from_zero() {
        assert_eq!(format_inr(dec!(1499.5)), "₹ 1,500");
        assert_eq!(format_inr(dec!(1499.49)), "₹ 1,499");
    }

    #[test]
    fn test_format_inr_crore() {
        assert_eq!(format_inr(dec!(10000000)), "₹ 1,00,00,000");
    }

    #[test]
    fn test_format_inr_small_negative_rounds_to_zero() {
        assert_eq!(format_inr(dec!(-0.2)), "₹ 0");
    }

    #[test]
    fn test_format_signed_zero_decimals() {
        assert_eq!(format_signed(dec!(1234.5), 0), "+1235");
        assert_eq!(format_signed(dec!(-1234.5), 0), "-1235");
    }

    #[test]
    fn test_format_signed_negative_zero() {
        assert_eq!(format_signed(dec!(-0.001), 2), "+0.00");
    }
}
