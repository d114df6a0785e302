use clap::Parser;
use clap::error::ErrorKind;
use habit_cli::cli::{Cli, Command, collect_overrides};
use habit_cli::output::{habit_details, habits_table, to_json};
use habit_cli::server::{self, SharedClock};
use habit_core::calendar::parse_day;
use habit_core::config::{Config, load_config_with_fallback, merge_overrides};
use habit_core::registry::parse_target;
use habit_core::seed::{DEMO_HABITS, seed_demo_data};
use habit_core::{AppError, FixedClock, HabitRegistry, SystemClock};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TODAY_ENV_VAR: &str = "HABITS_TODAY";

fn init_tracing(default_directive: &str) {
    // RUST_LOG wins when it parses; oversized or invalid filters are ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        warn!(error = %err, "ignoring unreadable config file");
    }
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    Ok(merge_overrides(&loaded.config, &overrides))
}

/// `HABITS_TODAY` pins the calendar day; otherwise the local clock is used.
fn resolve_clock() -> Result<SharedClock, AppError> {
    match std::env::var(TODAY_ENV_VAR) {
        Ok(raw) if !raw.trim().is_empty() => {
            let day = parse_day(raw.trim())
                .map_err(|err| AppError::invalid_input(format!("{TODAY_ENV_VAR}: {}", err.message())))?;
            Ok(Box::new(FixedClock(day)))
        }
        _ => Ok(Box::new(SystemClock::local())),
    }
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;
    let store_path = config.resolve_store_path(cli.store.as_deref())?;
    let clock = resolve_clock()?;
    let mut registry = HabitRegistry::open(store_path, clock)?;

    match cli.command {
        Command::Add { name, target } => {
            let target = parse_target(&target)?;
            let habit = registry.create_task(&name, target)?;
            if cli.json {
                println!("{}", to_json(&habit)?);
            } else {
                println!("Tracking habit: {} (target {})", habit.name, habit.target);
            }
        }
        Command::Inc { name } => {
            let habit = registry.increment_task(&name)?;
            if cli.json {
                println!("{}", to_json(&habit)?);
            } else {
                println!(
                    "{}: {}/{} today, streak {}",
                    habit.name, habit.current, habit.target, habit.streak
                );
            }
        }
        Command::Delete { name } => {
            if !registry.delete_task(&name)? {
                return Err(AppError::not_found(format!("task '{}' not found", name.trim())));
            }
            if cli.json {
                println!("{}", serde_json::json!({ "success": true }));
            } else {
                println!("Deleted habit: {}", name.trim());
            }
        }
        Command::List => {
            let habits = registry.list_todays_tasks();
            if cli.json {
                println!("{}", to_json(&habits)?);
            } else {
                println!("{}", habits_table(&habits));
            }
        }
        Command::Show { name } => {
            let habit = registry.get_task(&name)?;
            if cli.json {
                println!("{}", to_json(&habit)?);
            } else {
                println!("{}", habit_details(&habit));
            }
        }
        Command::Seed => {
            seed_demo_data(&mut registry)?;
            if cli.json {
                println!("{}", to_json(&registry.list_todays_tasks())?);
            } else {
                println!("Seeded demo habits: {}", DEMO_HABITS.join(", "));
            }
        }
        Command::Serve { bind, port } => {
            let bind = bind.unwrap_or_else(|| config.bind().to_string());
            let port = port.unwrap_or_else(|| config.port());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(registry, &bind, port))?;
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let default_directive = match cli.command {
        Command::Serve { .. } => "info",
        _ => "off",
    };
    init_tracing(default_directive);

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
