#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

pub const TODAY: &str = "2025-06-15";

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("habits-{nanos}-{file_name}"))
}

/// Runs the binary against `store` with the clock pinned to `today`.
pub fn run_on(store: &Path, today: &str, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_habits");
    Command::new(exe)
        .args(args)
        .env("HABITS_STORE_PATH", store)
        .env("HABITS_TODAY", today)
        .env("HABITS_CONFIG_PATH", store.with_extension("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run habits")
}

pub fn run(store: &Path, args: &[&str]) -> Output {
    run_on(store, TODAY, args)
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn read_store(store: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(store).unwrap()).unwrap()
}
