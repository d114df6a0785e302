mod habit;

pub use habit::{DailyStatus, DayStatus, HabitRecord, HabitSnapshot, History};
