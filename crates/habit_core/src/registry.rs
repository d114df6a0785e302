use crate::calendar::{Clock, SystemClock, today};
use crate::error::AppError;
use crate::model::{HabitRecord, HabitSnapshot};
use crate::projection::project;
use crate::storage::json_store::{self, Habits};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Owns every habit and the file they persist to.
///
/// Each mutation rewrites the whole store before returning; if the write
/// fails the in-memory change is rolled back so memory and disk agree.
#[derive(Debug)]
pub struct HabitRegistry<C = SystemClock> {
    path: PathBuf,
    habits: Habits,
    clock: C,
}

impl<C: Clock> HabitRegistry<C> {
    /// Loads the registry from `path`. A missing file starts empty; a
    /// corrupt one is an error.
    pub fn open<P: Into<PathBuf>>(path: P, clock: C) -> Result<Self, AppError> {
        let path = path.into();
        let habits = json_store::load_habits(&path)?;
        Ok(Self {
            path,
            habits,
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn record(&self, name: &str) -> Option<&HabitRecord> {
        self.habits.get(name.trim())
    }

    /// Creates `name` with an empty history dated today. An existing habit
    /// is left untouched and its current snapshot returned.
    pub fn create_task(&mut self, name: &str, target: u32) -> Result<HabitSnapshot, AppError> {
        let name = require_name(name)?;
        if target == 0 {
            return Err(AppError::invalid_input("target must be a positive integer"));
        }

        if self.habits.contains_key(name) {
            debug!(habit = name, "habit already exists, keeping it");
        } else {
            let record = HabitRecord::new(target, today(&self.clock));
            self.habits.insert(name.to_string(), record);
            if let Err(err) = self.save() {
                self.habits.shift_remove(name);
                return Err(err);
            }
            info!(habit = name, target, "created habit");
        }

        self.get_task(name)
    }

    /// Adds one to today's count.
    pub fn increment_task(&mut self, name: &str) -> Result<HabitSnapshot, AppError> {
        let name = require_name(name)?;
        let day = today(&self.clock);
        let record = self
            .habits
            .get_mut(name)
            .ok_or_else(|| AppError::not_found(format!("task '{name}' not found")))?;

        let previous = record.history.get(&day).copied();
        let next = previous
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| AppError::invalid_input("daily count overflow"))?;
        record.history.insert(day.clone(), next);

        if let Err(err) = self.save() {
            if let Some(record) = self.habits.get_mut(name) {
                match previous {
                    Some(count) => record.history.insert(day, count),
                    None => record.history.remove(&day),
                };
            }
            return Err(err);
        }

        debug!(habit = name, count = next, "incremented habit");
        self.get_task(name)
    }

    /// Removes `name`. Returns whether it existed.
    pub fn delete_task(&mut self, name: &str) -> Result<bool, AppError> {
        let name = require_name(name)?;
        let Some((index, key, record)) = self.habits.shift_remove_full(name) else {
            return Ok(false);
        };

        if let Err(err) = self.save() {
            self.habits.shift_insert(index, key, record);
            return Err(err);
        }

        info!(habit = name, "deleted habit");
        Ok(true)
    }

    /// Snapshots of every habit, in creation order.
    pub fn list_todays_tasks(&self) -> Vec<HabitSnapshot> {
        self.habits
            .iter()
            .map(|(name, record)| project(name, record, &self.clock))
            .collect()
    }

    pub fn get_task(&self, name: &str) -> Result<HabitSnapshot, AppError> {
        let name = name.trim();
        self.habits
            .get(name)
            .map(|record| project(name, record, &self.clock))
            .ok_or_else(|| AppError::not_found(format!("task '{name}' not found")))
    }

    /// Inserts or replaces whole records, then persists once. Nothing changes
    /// unless every record is valid and the save succeeds.
    pub fn put_records<'a>(
        &mut self,
        records: impl IntoIterator<Item = (&'a str, HabitRecord)>,
    ) -> Result<(), AppError> {
        let mut staged = Vec::new();
        for (name, record) in records {
            let name = require_name(name)?;
            if record.target == 0 {
                return Err(AppError::invalid_input("target must be a positive integer"));
            }
            staged.push((name.to_string(), record));
        }

        let previous = self.habits.clone();
        self.habits.extend(staged);
        if let Err(err) = self.save() {
            self.habits = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), AppError> {
        json_store::save_habits(&self.path, &self.habits)
    }
}

fn require_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }
    Ok(trimmed)
}

/// Parses a daily target given as text. Only positive integers are accepted.
pub fn parse_target(raw: &str) -> Result<u32, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("target is required"));
    }

    let target: u32 = trimmed
        .parse()
        .map_err(|_| AppError::invalid_input(format!("target '{trimmed}' is not a positive integer")))?;
    if target == 0 {
        return Err(AppError::invalid_input("target must be a positive integer"));
    }
    Ok(target)
}
