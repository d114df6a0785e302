use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse per-day completion counts keyed by `YYYY-MM-DD`. An absent day counts as zero.
pub type History = BTreeMap<String, u32>;

/// A stored habit. The name is the registry key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub target: u32,
    pub created_date: String,
    #[serde(default)]
    pub history: History,
}

impl HabitRecord {
    pub fn new(target: u32, created_date: String) -> Self {
        Self {
            target,
            created_date,
            history: History::new(),
        }
    }

    pub fn count_on(&self, day: &str) -> u32 {
        self.history.get(day).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DayStatus {
    /// Outside the habit's lifetime: after today or before it was created.
    Future,
    Complete,
    InProgress,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatus {
    pub date: String,
    pub count: u32,
    pub status: DayStatus,
}

/// Read-only view of a habit as returned to callers. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSnapshot {
    pub id: String,
    pub name: String,
    pub target: u32,
    pub current: u32,
    pub history100: Vec<DailyStatus>,
    pub actions_all_time: u64,
    pub actions_last7_days: u64,
    pub actions_last3_days: u64,
    pub streak: u32,
}
