//! Analyze command - ingest a chat export, report, and write CSV tables.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::aggregation::Histogram;
use crate::config::{Settings, ALL_TIME_BY_HOUR_CSV, HOUR_OF_DAY_CSV, WEEKDAY_CSV};
use crate::data::ingest_file;
use crate::report::{absolute_hour_span, hour_of_day_table, weekday_table, write_csv_file, CsvTable, Summary};


/// Run the analyze command.
pub fn run(file_path: &Path, settings: &Settings) -> Result<()> {
    if !file_path.exists() {
        anyhow::bail!("Unable to open file: {}", file_path.display());
    }

    info!("Beginning analysis of {} ...", file_path.display());

    let mut histogram = Histogram::new();
    let report = ingest_file(file_path, &mut histogram, settings.parse_options)?;

    info!(
        lines = report.lines_read,
        counted = report.records_counted,
        malformed = report.malformed,
        zero_filled = report.zero_filled,
        "Finished reading {}",
        file_path.display()
    );

    let summary = Summary::from_histogram(&histogram)
        .with_context(|| format!("Nothing to report for {}", file_path.display()))?;

    if settings.json {
        println!("{}", summary.to_json()?);
    } else {
        for line in summary.lines() {
            println!("{line}");
        }
    }

    if settings.export {
        export_tables(&histogram, settings)?;
    }

    Ok(())
}


/// Write all three tables. A failed table does not stop the others.
fn export_tables(histogram: &Histogram, settings: &Settings) -> Result<()> {
    settings.ensure_output_dir()?;

    let mut failed = Vec::new();
    export_table(settings, HOUR_OF_DAY_CSV, &hour_of_day_table(histogram), &mut failed);
    export_table(settings, WEEKDAY_CSV, &weekday_table(histogram), &mut failed);
    export_table(
        settings,
        ALL_TIME_BY_HOUR_CSV,
        absolute_hour_span(histogram, settings.range_policy)?,
        &mut failed,
    );

    if !failed.is_empty() {
        anyhow::bail!("Failed to export {}", failed.join(", "));
    }

    Ok(())
}


fn export_table<T: CsvTable>(settings: &Settings, file_name: &'static str, table: T, failed: &mut Vec<&'static str>) {
    let path = settings.output_path(file_name);
    match write_csv_file(table, &path) {
        Ok(rows) => info!(rows, "Wrote {}", path.display()),
        Err(e) => {
            error!("{e:#}");
            failed.push(file_name);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const LOG: &str = "\
1.1.2024 10:00:00, Alice: morning
1.1.2024 10:30:00, Bob: hi
this line is broken
1.1.2024 13:15:00, Alice: lunch
";

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            output_dir: dir.join("out"),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        std::fs::write(&input, LOG).unwrap();
        let settings = settings_in(dir.path());

        run(&input, &settings).unwrap();

        let hourly = std::fs::read_to_string(settings.output_path(HOUR_OF_DAY_CSV)).unwrap();
        assert_eq!(hourly.lines().count(), 25);
        assert!(hourly.contains("10:00,1,1\n"));

        let weekday = std::fs::read_to_string(settings.output_path(WEEKDAY_CSV)).unwrap();
        assert!(weekday.contains("Monday,2,1\n"));

        let all_time = std::fs::read_to_string(settings.output_path(ALL_TIME_BY_HOUR_CSV)).unwrap();
        assert_eq!(
            all_time,
            "Timestamp,Alice,Bob\n\
             2024-01-01 10:00,1,1\n\
             2024-01-01 11:00,0,0\n\
             2024-01-01 12:00,0,0\n"
        );
    }

    #[test]
    fn test_run_missing_file() {
        let err = run(Path::new("/no/such/chat.txt"), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("Unable to open file"));
    }

    #[test]
    fn test_run_without_records_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        std::fs::write(&input, "nothing useful\n").unwrap();

        let err = run(&input, &settings_in(dir.path())).unwrap_err();
        assert!(err.to_string().contains("Nothing to report"));
    }

    #[test]
    fn test_no_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        std::fs::write(&input, LOG).unwrap();
        let settings = Settings {
            export: false,
            ..settings_in(dir.path())
        };

        run(&input, &settings).unwrap();
        assert!(!PathBuf::from(&settings.output_dir).exists());
    }
}
