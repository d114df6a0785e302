use crate::aggregate::{daily_timeline, streak, total_all_time, total_last_n_days};
use crate::calendar::{Clock, format_day};
use crate::model::{HabitRecord, HabitSnapshot};
use time::Date;

/// Builds the snapshot for `name`, reading today once from `clock`.
pub fn project(name: &str, record: &HabitRecord, clock: &impl Clock) -> HabitSnapshot {
    project_on(name, record, clock.today())
}

pub fn project_on(name: &str, record: &HabitRecord, today: Date) -> HabitSnapshot {
    let history = &record.history;
    HabitSnapshot {
        id: name.to_string(),
        name: name.to_string(),
        target: record.target,
        current: record.count_on(&format_day(today)),
        history100: daily_timeline(history, record.target, &record.created_date, today),
        actions_all_time: total_all_time(history),
        actions_last7_days: total_last_n_days(history, 7, today),
        actions_last3_days: total_last_n_days(history, 3, today),
        streak: streak(history, record.target, today),
    }
}
