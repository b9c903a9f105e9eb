use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

use crate::error::{EngineError, EngineResult};

/// Weekday index with Monday = 0, the numbering the weekly off-day policy
/// uses.
pub fn weekday_of(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Number of days in the given month, December rolling over into January of
/// the next year.
pub fn days_in_month(year: i32, month: u32) -> EngineResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidCalendarInput { year, month });
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .ok_or(EngineError::InvalidCalendarInput { year, month })
}

pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

/// Month layout as Monday-first week rows, `None` for the cells that fall
/// outside the month.
pub fn month_grid(year: i32, month: u32) -> EngineResult<Vec<[Option<u32>; 7]>> {
    let days = days_in_month(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(EngineError::InvalidCalendarInput { year, month })?;

    let mut grid = Vec::new();
    let mut row = [None; 7];
    let mut col = weekday_of(first) as usize;
    for day in 1..=days {
        row[col] = Some(day);
        col += 1;
        if col == 7 {
            grid.push(row);
            row = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        grid.push(row);
    }
    Ok(grid)
}

/// Parses the `YYYY-MM-DD` wire format.
pub fn parse_date(s: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate(s.to_string()))
}

/// Parses the `HH:MM` wire format.
pub fn parse_time(s: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| EngineError::InvalidTime(s.to_string()))
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub(crate) fn minutes_from_midnight(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_indexes_monday_as_zero() {
        assert_eq!(weekday_of(date(2025, 6, 9)), 0); // Monday
        assert_eq!(weekday_of(date(2025, 6, 10)), 1); // Tuesday
        assert_eq!(weekday_of(date(2025, 6, 15)), 6); // Sunday
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 1).unwrap(), 31);
        assert_eq!(days_in_month(2025, 4).unwrap(), 30);
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29); // leap year
        assert_eq!(days_in_month(2025, 12).unwrap(), 31); // year rollover
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(matches!(
            days_in_month(2025, 0),
            Err(EngineError::InvalidCalendarInput { .. })
        ));
        assert!(matches!(
            days_in_month(2025, 13),
            Err(EngineError::InvalidCalendarInput { .. })
        ));
    }

    #[test]
    fn add_days_crosses_month_and_year_ends() {
        assert_eq!(add_days(date(2025, 1, 31), 1), date(2025, 2, 1));
        assert_eq!(add_days(date(2025, 12, 31), 1), date(2026, 1, 1));
        assert_eq!(add_days(date(2025, 3, 1), -1), date(2025, 2, 28));
    }

    #[test]
    fn past_comparison_is_strict() {
        let today = date(2025, 6, 10);
        assert!(is_past(date(2025, 6, 9), today));
        assert!(!is_past(today, today));
        assert!(!is_past(date(2025, 6, 11), today));
    }

    #[test]
    fn grid_for_june_2025() {
        // June 2025 starts on a Sunday and spans six Monday-first rows.
        let grid = month_grid(2025, 6).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0][6], Some(1));
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[1][0], Some(2));
        assert_eq!(grid[5][0], Some(30));
        assert_eq!(grid[5][1], None);
    }

    #[test]
    fn wire_formats_round_trip() {
        assert_eq!(parse_date("2025-06-10").unwrap(), date(2025, 6, 10));
        assert!(matches!(
            parse_date("10.06.2025"),
            Err(EngineError::InvalidDate(_))
        ));

        let t = parse_time("09:30").unwrap();
        assert_eq!(format_time(t), "09:30");
        assert!(matches!(
            parse_time("25:00"),
            Err(EngineError::InvalidTime(_))
        ));
    }

    #[test]
    fn minutes_conversion() {
        assert_eq!(minutes_from_midnight(parse_time("00:00").unwrap()), 0);
        assert_eq!(minutes_from_midnight(parse_time("09:30").unwrap()), 570);
    }
}
