//! Calendar-day identifiers and the clock they are read from.
//!
//! A calendar day is rendered as a fixed-width `YYYY-MM-DD` string, so
//! comparing two day strings lexicographically orders them chronologically.

use crate::error::AppError;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Source of "today". Everything date-dependent reads the day through this.
pub trait Clock {
    fn today(&self) -> Date;

    fn days_ago(&self, days: u32) -> Date {
        days_before(self.today(), days)
    }
}

/// Reads the local date from the process clock.
///
/// The UTC offset is looked up again on every call. Where the platform
/// refuses that lookup (Unix once the process has spawned threads), the
/// offset captured at construction is used instead, so a long-running
/// server that crosses a DST change may be off by the DST delta around
/// midnight until it restarts.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn local() -> Self {
        Self {
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    fn current_offset(&self) -> UtcOffset {
        UtcOffset::current_local_offset().unwrap_or(self.offset)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::local()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.current_offset()).date()
    }
}

/// A clock pinned to one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Today's calendar-day string.
pub fn today(clock: &impl Clock) -> String {
    format_day(clock.today())
}

/// The calendar-day string `days` before today. `days_ago(clock, 0) == today(clock)`.
pub fn days_ago(clock: &impl Clock, days: u32) -> String {
    format_day(clock.days_ago(days))
}

pub fn days_before(date: Date, days: u32) -> Date {
    date.checked_sub(Duration::days(i64::from(days)))
        .unwrap_or(Date::MIN)
}

pub fn format_day(date: Date) -> String {
    date.format(DAY_FORMAT).unwrap_or_else(|_| {
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    })
}

/// Parses a canonical `YYYY-MM-DD` day. Anything that would not format back
/// to the same string (padding, signs, extra digits) is rejected.
pub fn parse_day(value: &str) -> Result<Date, AppError> {
    let invalid = || AppError::invalid_data(format!("'{value}' is not a YYYY-MM-DD date"));
    let date = Date::parse(value, DAY_FORMAT).map_err(|_| invalid())?;
    if format_day(date) != value {
        return Err(invalid());
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock, days_ago, days_before, format_day, parse_day, today};
    use time::macros::date;

    #[test]
    fn today_is_zero_padded() {
        let clock = FixedClock(date!(2024 - 03 - 07));
        assert_eq!(today(&clock), "2024-03-07");
    }

    #[test]
    fn days_ago_zero_is_today() {
        let clock = FixedClock(date!(2024 - 03 - 07));
        assert_eq!(days_ago(&clock, 0), today(&clock));
    }

    #[test]
    fn days_ago_crosses_month_and_year() {
        let clock = FixedClock(date!(2024 - 01 - 02));
        assert_eq!(days_ago(&clock, 1), "2024-01-01");
        assert_eq!(days_ago(&clock, 2), "2023-12-31");
        assert_eq!(days_ago(&clock, 33), "2023-11-30");
    }

    #[test]
    fn days_ago_handles_leap_day() {
        let clock = FixedClock(date!(2024 - 03 - 01));
        assert_eq!(days_ago(&clock, 1), "2024-02-29");
        assert_eq!(clock.days_ago(366), date!(2023 - 03 - 01));
    }

    #[test]
    fn string_order_matches_date_order() {
        let earlier = format_day(date!(2023 - 12 - 31));
        let later = format_day(date!(2024 - 01 - 01));
        assert!(earlier < later);
        assert!(format_day(date!(2024 - 02 - 09)) < format_day(date!(2024 - 02 - 10)));
    }

    #[test]
    fn days_before_saturates_at_minimum() {
        assert_eq!(days_before(time::Date::MIN, 5), time::Date::MIN);
    }

    #[test]
    fn parse_day_round_trips_format() {
        let parsed = parse_day("2025-11-30").unwrap();
        assert_eq!(parsed, date!(2025 - 11 - 30));
        assert_eq!(format_day(parsed), "2025-11-30");
    }

    #[test]
    fn parse_day_rejects_other_shapes() {
        assert_eq!(parse_day("2025-2-3").unwrap_err().code(), "invalid_data");
        assert_eq!(parse_day("yesterday").unwrap_err().code(), "invalid_data");
        assert_eq!(parse_day("2025-02-30").unwrap_err().code(), "invalid_data");
    }

    #[test]
    fn parse_day_rejects_padding() {
        for raw in [" 2025-06-14", "2025-06-14 ", "\t2025-06-14", "+2025-06-14"] {
            assert_eq!(parse_day(raw).unwrap_err().code(), "invalid_data", "{raw:?}");
        }
    }

    #[test]
    fn system_clock_matches_utc_within_a_day() {
        let today = SystemClock::local().today();
        let utc = time::OffsetDateTime::now_utc().date();
        assert!((today - utc).whole_days().abs() <= 1);
    }
}
