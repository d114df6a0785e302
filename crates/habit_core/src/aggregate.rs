//! Pure aggregations over a habit's sparse history.
//!
//! Every function takes `today` explicitly so a caller can evaluate a whole
//! snapshot against one day even if the wall clock rolls over midway.

use crate::calendar::{days_before, format_day, parse_day};
use crate::model::{DailyStatus, DayStatus, History};
use time::Date;

/// Length of the status timeline, today included.
pub const TIMELINE_DAYS: u32 = 100;

pub fn total_all_time(history: &History) -> u64 {
    history.values().map(|&count| u64::from(count)).sum()
}

/// Sum of today plus the previous `days - 1` days.
pub fn total_last_n_days(history: &History, days: u32, today: Date) -> u64 {
    (0..days)
        .map(|offset| format_day(days_before(today, offset)))
        .map(|day| u64::from(history.get(&day).copied().unwrap_or(0)))
        .sum()
}

/// Exactly [`TIMELINE_DAYS`] entries, oldest first; the last entry is today.
pub fn daily_timeline(
    history: &History,
    target: u32,
    created_date: &str,
    today: Date,
) -> Vec<DailyStatus> {
    let today_key = format_day(today);
    (0..TIMELINE_DAYS)
        .rev()
        .map(|offset| {
            let date = format_day(days_before(today, offset));
            let count = history.get(&date).copied().unwrap_or(0);
            let status = classify_day(&date, count, target, created_date, &today_key);
            DailyStatus {
                date,
                count,
                status,
            }
        })
        .collect()
}

fn classify_day(date: &str, count: u32, target: u32, created_date: &str, today: &str) -> DayStatus {
    if date > today || date < created_date {
        return DayStatus::Future;
    }

    let complete = count >= target;
    match (complete, date == today) {
        (true, _) => DayStatus::Complete,
        (false, true) => DayStatus::InProgress,
        (false, false) => DayStatus::Incomplete,
    }
}

/// Consecutive days meeting `target`, ending today or yesterday.
///
/// Today under target is in progress: it is skipped without counting and
/// without breaking the run that ends yesterday. Entries dated after today
/// and keys that are not calendar days are ignored.
pub fn streak(history: &History, target: u32, today: Date) -> u32 {
    let mut days: Vec<(Date, u32)> = history
        .iter()
        .filter_map(|(key, &count)| parse_day(key).ok().map(|day| (day, count)))
        .filter(|(day, _)| *day <= today)
        .collect();
    days.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    let mut entries = days.into_iter().peekable();
    if let Some(&(day, count)) = entries.peek()
        && day == today
        && count < target
    {
        entries.next();
    }

    let mut streak = 0;
    let mut cursor = today;
    for (index, (day, count)) in entries.enumerate() {
        if index == 0 {
            if (cursor - day).whole_days() > 1 {
                return 0;
            }
        } else if cursor.previous_day() != Some(day) {
            break;
        }

        if count < target {
            break;
        }
        streak += 1;
        cursor = day;
    }

    streak
}
