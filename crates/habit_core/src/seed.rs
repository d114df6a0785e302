//! Demo habits for trying the tracker out.

use crate::calendar::{Clock, days_ago};
use crate::error::AppError;
use crate::model::HabitRecord;
use crate::registry::HabitRegistry;
use tracing::info;

pub const DEMO_HABITS: [&str; 2] = ["Read", "Exercise"];

/// Replaces the `Read` and `Exercise` habits with a month and a week of
/// history respectively, then persists once.
pub fn seed_demo_data<C: Clock>(registry: &mut HabitRegistry<C>) -> Result<(), AppError> {
    let clock = registry.clock();
    let read = demo_record(clock, 10, 30, |offset| {
        if offset % 4 == 1 { offset % 8 } else { 10 + offset % 5 }
    });
    let exercise = demo_record(clock, 20, 7, |offset| match offset {
        0 => 5,
        _ if offset % 3 == 2 => (offset * 2) % 15,
        _ => 20 + offset % 10,
    });

    registry.put_records([(DEMO_HABITS[0], read), (DEMO_HABITS[1], exercise)])?;

    info!(habits = DEMO_HABITS.len(), "seeded demo data");
    Ok(())
}

fn demo_record(
    clock: &impl Clock,
    target: u32,
    age_days: u32,
    count_for: impl Fn(u32) -> u32,
) -> HabitRecord {
    let mut record = HabitRecord::new(target, days_ago(clock, age_days));
    for offset in (0..=age_days).rev() {
        record.history.insert(days_ago(clock, offset), count_for(offset));
    }
    record
}
