//! Projection of period indices onto calendar dates

use chrono::{Days, Months, NaiveDate};
use super::engine::PeriodKind;

/// Days in a fortnight
pub const DAYS_PER_FORTNIGHT: u64 = 14;

/// Date at the end of period `index`, counting from `start` (period 0)
///
/// Fortnights are fixed 14-day steps; months are calendar months, clamped to
/// the last day of shorter months. Dates past the calendar's range saturate
/// at `NaiveDate::MAX`.
pub fn period_date(start: NaiveDate, kind: PeriodKind, index: u32) -> NaiveDate {
    let date = match kind {
        PeriodKind::Fortnight => start.checked_add_days(Days::new(DAYS_PER_FORTNIGHT * index as u64)),
        PeriodKind::Month => start.checked_add_months(Months::new(index)),
    };
    date.unwrap_or(NaiveDate::MAX)
}

/// ISO-8601 (`YYYY-MM-DD`) form of [`period_date`]
pub fn period_date_iso(start: NaiveDate, kind: PeriodKind, index: u32) -> String {
    period_date(start, kind, index).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fortnight_steps() {
        let start = date(2024, 1, 1);
        assert_eq!(period_date(start, PeriodKind::Fortnight, 0), start);
        assert_eq!(period_date(start, PeriodKind::Fortnight, 1), date(2024, 1, 15));
        // 26 fortnights = 364 days; 2024 is a leap year
        assert_eq!(period_date(start, PeriodKind::Fortnight, 26), date(2024, 12, 30));
    }

    #[test]
    fn test_month_steps_clamp() {
        let start = date(2024, 1, 31);
        assert_eq!(period_date(start, PeriodKind::Month, 1), date(2024, 2, 29));
        assert_eq!(period_date(start, PeriodKind::Month, 12), date(2025, 1, 31));
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(period_date_iso(date(2024, 3, 1), PeriodKind::Fortnight, 2), "2024-03-29");
    }
}
