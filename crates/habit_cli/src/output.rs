use habit_core::{AppError, DayStatus, HabitSnapshot};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct HabitRow {
    #[tabled(rename = "Habit")]
    name: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Streak")]
    streak: u32,
    #[tabled(rename = "3d")]
    last3: u64,
    #[tabled(rename = "7d")]
    last7: u64,
    #[tabled(rename = "All")]
    all_time: u64,
}

impl From<&HabitSnapshot> for HabitRow {
    fn from(habit: &HabitSnapshot) -> Self {
        Self {
            name: habit.name.clone(),
            today: format!("{}/{}", habit.current, habit.target),
            streak: habit.streak,
            last3: habit.actions_last3_days,
            last7: habit.actions_last7_days,
            all_time: habit.actions_all_time,
        }
    }
}

pub fn habits_table(habits: &[HabitSnapshot]) -> String {
    if habits.is_empty() {
        return "No habits yet.".to_string();
    }
    let rows: Vec<HabitRow> = habits.iter().map(HabitRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One character per day, oldest first: `#` complete, `+` in progress,
/// `.` incomplete, space outside the habit's lifetime.
pub fn timeline_strip(habit: &HabitSnapshot) -> String {
    habit
        .history100
        .iter()
        .map(|day| match day.status {
            DayStatus::Future => ' ',
            DayStatus::Complete => '#',
            DayStatus::InProgress => '+',
            DayStatus::Incomplete => '.',
        })
        .collect()
}

pub fn habit_details(habit: &HabitSnapshot) -> String {
    [
        format!("{} ({}/{} today)", habit.name, habit.current, habit.target),
        format!("streak:   {}", habit.streak),
        format!("3 days:   {}", habit.actions_last3_days),
        format!("7 days:   {}", habit.actions_last7_days),
        format!("all time: {}", habit.actions_all_time),
        format!("[{}]", timeline_strip(habit)),
    ]
    .join("\n")
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))
}
