// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar helpers for the goal chart.

use chrono::{Datelike, NaiveDate};

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// 1-based day of the year (January 1 = 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_first_and_last_day_of_every_year() {
        for year in 1800..=2400 {
            let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            let dec31 = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();

            assert_eq!(day_of_year(jan1), 1);
            assert_eq!(day_of_year(dec31), days_in_year(year), "year {}", year);
            assert_eq!(day_of_year(dec31) == 366, is_leap_year(year));
        }
    }

    #[test]
    fn test_day_after_leap_day() {
        let march1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(day_of_year(march1), 61);
        let march1 = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert_eq!(day_of_year(march1), 60);
    }
}
