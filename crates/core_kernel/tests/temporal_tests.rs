//! Tests for the calendar helpers
//!
//! Tests cover ISO date parsing, billing-day clamping, month keys and the
//! timezone wrapper.

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::temporal::TemporalError;
use core_kernel::{
    clamp_to_month, days_in_month, normalize_date, parse_iso_date, same_month, MonthKey, Timezone,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod iso_dates {
    use super::*;

    #[test]
    fn test_leap_day() {
        assert_eq!(parse_iso_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(
            parse_iso_date("2025-02-29"),
            Err(TemporalError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_iso_date(" 2025-01-10 ").unwrap(), date(2025, 1, 10));
    }

    #[test]
    fn test_wrong_shapes() {
        for input in ["", "2025-1-1", "25-01-10", "2025-01-10T00:00", "2025_01_10"] {
            assert!(
                matches!(parse_iso_date(input), Err(TemporalError::InvalidFormat(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_normalize_offset_timestamp_uses_utc_date() {
        assert_eq!(
            normalize_date("2025-03-01T02:00:00+05:30").unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_normalize_rejects_short_text() {
        assert!(normalize_date("2025-03").is_err());
    }
}

mod billing_days {
    use super::*;

    #[test]
    fn test_february_lengths() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_clamp_day_below_one() {
        assert_eq!(clamp_to_month(2025, 6, 0), Some(date(2025, 6, 1)));
    }

    #[test]
    fn test_clamp_invalid_month() {
        assert_eq!(clamp_to_month(2025, 13, 1), None);
    }

    #[test]
    fn test_same_month_across_years() {
        assert!(same_month(date(2025, 12, 1), date(2025, 12, 31)));
        assert!(!same_month(date(2025, 12, 31), date(2026, 12, 31)));
    }
}

mod month_keys {
    use super::*;

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(MonthKey::new(2025, 3).unwrap().to_string(), "2025-03");
    }

    #[test]
    fn test_rejects_month_zero() {
        assert!(matches!(
            MonthKey::new(2025, 0),
            Err(TemporalError::InvalidMonthKey(_))
        ));
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let mut keys = vec![
            MonthKey::new(2025, 2).unwrap(),
            MonthKey::new(2024, 12).unwrap(),
            MonthKey::new(2025, 1).unwrap(),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_first_day_and_days() {
        let key = MonthKey::from_date(date(2024, 2, 17));
        assert_eq!(key.first_day(), date(2024, 2, 1));
        assert_eq!(key.days(), 29);
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::new(2025, 7).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-07\"");
        let back: MonthKey = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"July\"").is_err());
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_kolkata() {
        assert_eq!(Timezone::default().0, chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_date_of_before_local_midnight() {
        let tz = Timezone::default();
        let instant = Utc.with_ymd_and_hms(2025, 1, 31, 18, 0, 0).unwrap();
        assert_eq!(tz.date_of(instant), date(2025, 1, 31));
    }

    #[test]
    fn test_serde_round_trip_by_name() {
        let tz = Timezone::parse("Europe/London").unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Europe/London\"");
    }
}
