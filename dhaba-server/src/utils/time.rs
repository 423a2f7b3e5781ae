//! Business-day boundary helpers
//!
//! All day windows are computed in the restaurant's configured timezone,
//! half-open: `[day_start, day_end)`. An order completed at 23:59:59.999
//! belongs to that date; one completed at 00:00:00.000 belongs to the next.

use chrono::{LocalResult, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a YYYY-MM-DD date string
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("invalid date '{}', expected YYYY-MM-DD", value))
    })
}

/// Format a date back to YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's business date in the given timezone
pub fn current_business_date(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Unix millis of local midnight at the start of `date`
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_midnight_millis(date, tz)
}

/// Unix millis of local midnight at the start of the NEXT day (exclusive bound)
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_midnight_millis(date.succ_opt().unwrap_or(NaiveDate::MAX), tz)
}

fn local_midnight_millis(date: NaiveDate, tz: Tz) -> i64 {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return 0;
    };
    match midnight.and_local_timezone(tz) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        // DST fall-back: two midnights, take the earlier one
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        // DST spring-forward: midnight does not exist, shift an hour in
        LocalResult::None => (midnight + TimeDelta::hours(1))
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;
    use chrono_tz::UTC;

    #[test]
    fn parses_and_formats_dates() {
        let date = parse_date("2026-08-29").unwrap();
        assert_eq!(format_date(date), "2026-08-29");
        assert!(parse_date("29/08/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn day_window_is_half_open_and_full_length() {
        let date = parse_date("2026-08-29").unwrap();
        let start = day_start_millis(date, Kolkata);
        let end = day_end_millis(date, Kolkata);
        assert_eq!(end - start, 86_400_000);
        // end coincides with the next day's start
        let next = parse_date("2026-08-30").unwrap();
        assert_eq!(end, day_start_millis(next, Kolkata));
    }

    #[test]
    fn utc_midnight_matches_epoch_arithmetic() {
        let date = parse_date("2026-08-29").unwrap();
        let start = day_start_millis(date, UTC);
        assert_eq!(start % 86_400_000, 0);
    }

    #[test]
    fn kolkata_is_offset_from_utc() {
        let date = parse_date("2026-08-29").unwrap();
        // IST is UTC+5:30, so local midnight is 5.5h before UTC midnight
        assert_eq!(
            day_start_millis(date, UTC) - day_start_millis(date, Kolkata),
            5 * 3_600_000 + 1_800_000
        );
    }
}
