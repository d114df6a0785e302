use clap::{Parser, Subcommand};
use habit_core::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "habits",
    author,
    version,
    about = "Track daily habits, streaks and rolling totals",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Habit store file (overrides HABITS_STORE_PATH and the config file)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start tracking a habit with a daily target
    ///
    /// Example: habits add Read 10
    Add { name: String, target: String },
    /// Count one more action for today
    ///
    /// Example: habits inc Read
    Inc { name: String },
    /// Stop tracking a habit and drop its history
    ///
    /// Example: habits delete Read
    Delete { name: String },
    /// List every habit with today's progress
    ///
    /// Example: habits list
    List,
    /// Show one habit with its 100-day timeline
    ///
    /// Example: habits show Read
    Show { name: String },
    /// Write the demo habits into the store
    ///
    /// Example: habits seed
    Seed,
    /// Serve the web page and JSON API
    ///
    /// Example: habits serve --port 3000
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StorePath,
    Bind,
    Port,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "bind" => ConfigOverrideTarget::Bind,
        "port" => ConfigOverrideTarget::Port,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override '{field}' requires a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` argument into one set of overrides.
/// Later arguments win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::Bind => overrides.bind = Some(parsed.value),
            ConfigOverrideTarget::Port => {
                let port = parsed
                    .value
                    .parse::<u16>()
                    .map_err(|_| format!("port '{}' is not a valid port number", parsed.value))?;
                overrides.port = Some(port);
            }
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
