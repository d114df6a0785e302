pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod projection;
pub mod registry;
pub mod seed;
pub mod storage;

pub use calendar::{Clock, FixedClock, SystemClock};
pub use error::AppError;
pub use model::{DailyStatus, DayStatus, HabitRecord, HabitSnapshot};
pub use registry::HabitRegistry;
