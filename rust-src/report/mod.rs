//! Reporting layer: CSV tables and run summaries.

mod export;
mod summary;

#[allow(unused_imports)]
pub use export::{
    absolute_hour_span,
    hour_of_day_table,
    weekday_table,
    write_csv_file,
    CsvTable,
    HourlySpan,
    RangePolicy,
    Row,
    Table,
};
#[allow(unused_imports)]
pub use summary::{BusiestBucket, Summary, UserSummary};
