//! Candidate onboarding dates. Onboarding happens on Mondays.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::DATE_FORMAT;

/// Every Monday in `[start, end]`. A non-Monday `start` rolls forward to the next Monday.
pub fn monday_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let offset = (7 - start.weekday().num_days_from_monday()) % 7;
    let mut day = start + Duration::days(i64::from(offset));

    let mut mondays = Vec::new();
    while day <= end {
        mondays.push(day);
        day += Duration::days(7);
    }
    mondays
}

/// Same as `monday_range`, rendered as `YYYY-MM-DD`
pub fn monday_strings(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    monday_range(start, end)
        .into_iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_starts_on_monday() {
        let mondays = monday_strings(date(2025, 5, 12), date(2025, 5, 26));
        assert_eq!(mondays, vec!["2025-05-12", "2025-05-19", "2025-05-26"]);
    }

    #[test]
    fn test_rolls_forward_to_next_monday() {
        // 2025-05-14 is a Wednesday
        let mondays = monday_range(date(2025, 5, 14), date(2025, 6, 2));
        assert_eq!(mondays, vec![date(2025, 5, 19), date(2025, 5, 26), date(2025, 6, 2)]);
        assert!(mondays.iter().all(|d| d.weekday() == Weekday::Mon));
    }

    #[test]
    fn test_empty_when_no_monday_in_range() {
        assert!(monday_range(date(2025, 5, 13), date(2025, 5, 18)).is_empty());
        assert!(monday_range(date(2025, 6, 2), date(2025, 5, 1)).is_empty());
    }

    #[test]
    fn test_default_calendar_span() {
        let mondays = monday_range(date(2025, 5, 12), date(2025, 12, 22));
        assert_eq!(mondays.first(), Some(&date(2025, 5, 12)));
        assert_eq!(mondays.last(), Some(&date(2025, 12, 22)));
        assert_eq!(mondays.len(), 33);
    }
}
