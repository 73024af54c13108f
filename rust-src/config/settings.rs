//! Run settings and output file names.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::ParseOptions;
use crate::report::RangePolicy;


/// Messages per hour of day.
pub const HOUR_OF_DAY_CSV: &str = "hour_of_day.csv";

/// Messages per weekday.
pub const WEEKDAY_CSV: &str = "weekday.csv";

/// Messages per hour across the whole log.
pub const ALL_TIME_BY_HOUR_CSV: &str = "all_time_by_hour.csv";


/// Everything one analysis run needs besides the input path.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub range_policy: RangePolicy,
    pub parse_options: ParseOptions,
    pub json: bool,
    pub export: bool,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            range_policy: RangePolicy::HalfOpen,
            parse_options: ParseOptions::default(),
            json: false,
            export: true,
        }
    }
}


impl Settings {
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Create the output directory if exports are enabled.
    pub fn ensure_output_dir(&self) -> Result<()> {
        if self.export {
            create_dir(&self.output_dir)?;
        }
        Ok(())
    }
}


fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}
