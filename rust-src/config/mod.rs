//! Configuration and settings for chat log analysis.

mod settings;

pub use settings::{Settings, ALL_TIME_BY_HOUR_CSV, HOUR_OF_DAY_CSV, WEEKDAY_CSV};
