use crate::calendar::parse_day;
use crate::error::AppError;
use crate::model::HabitRecord;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const STORE_ENV_VAR: &str = "HABITS_STORE_PATH";
const STORE_FILE_NAME: &str = "tasks.json";

/// Every habit keyed by name, in insertion order.
pub type Habits = IndexMap<String, HabitRecord>;

pub fn store_path_from_env() -> Option<PathBuf> {
    std::env::var(STORE_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

pub fn default_store_path() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("habits").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("habits")
            .join(STORE_FILE_NAME))
    }
}

/// Reads the whole registry. A missing file is an empty registry; anything
/// unreadable or malformed is an error rather than a silent reset.
pub fn load_habits(path: &Path) -> Result<Habits, AppError> {
    if !path.exists() {
        debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(Habits::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let habits: Habits = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    for (name, record) in &habits {
        validate_record(name, record)?;
    }

    debug!(path = %path.display(), habits = habits.len(), "loaded store");
    Ok(habits)
}

fn validate_record(name: &str, record: &HabitRecord) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_data("habit name must not be blank"));
    }
    if record.target == 0 {
        return Err(AppError::invalid_data(format!(
            "habit '{name}' has a zero target"
        )));
    }
    parse_day(&record.created_date)
        .map_err(|err| AppError::invalid_data(format!("habit '{name}': {}", err.message())))?;
    for day in record.history.keys() {
        parse_day(day)
            .map_err(|err| AppError::invalid_data(format!("habit '{name}': {}", err.message())))?;
    }
    Ok(())
}

/// Rewrites the whole registry.
pub fn save_habits(path: &Path, habits: &Habits) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(habits)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    info!(path = %path.display(), habits = habits.len(), "saved store");
    Ok(())
}
