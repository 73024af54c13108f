//! Chat message records and the time keys they are bucketed by.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;


/// A single chat line, as parsed from the export.
///
/// Time fields are naive and unvalidated: an hour of 25 is kept as 25.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub body: String,
    pub user: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}


impl Message {
    /// The hour bucket this message falls into.
    pub fn time_bucket(&self) -> TimeBucket {
        TimeBucket::from_fields(self.year, self.month, self.day, self.hour)
    }
}


/// A calendar date plus hour, minutes and seconds truncated to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket(NaiveDateTime);


impl TimeBucket {
    /// Build a bucket from raw calendar fields.
    ///
    /// Overflowing fields roll over into the next larger unit (month 13 is
    /// January of the next year, hour 24 is midnight of the next day, day 0
    /// is the last day of the previous month). Results outside chrono's
    /// range saturate to its first or last representable day.
    pub fn from_fields(year: i32, month: i32, day: i32, hour: i32) -> Self {
        match normalize(year, month, day, hour) {
            Some(at) => Self(at),
            None => {
                let approx_hours = (i128::from(year) * 12 + i128::from(month)) * 730
                    + i128::from(day) * 24
                    + i128::from(hour);
                let date = if approx_hours < 0 { NaiveDate::MIN } else { NaiveDate::MAX };
                Self(date.and_time(NaiveTime::MIN))
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from(self.date().weekday())
    }

    /// The following hour, or `None` at the end of the calendar.
    pub fn succ(&self) -> Option<Self> {
        self.0.checked_add_signed(Duration::hours(1)).map(Self)
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}


impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:00"))
    }
}


fn normalize(year: i32, month: i32, day: i32, hour: i32) -> Option<NaiveDateTime> {
    let months = i64::from(year) * 12 + i64::from(month) - 1;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;

    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(i64::from(day) - 1))?
        .checked_add_signed(Duration::hours(i64::from(hour)))
}


/// Day of the week, ordered Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}


impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    #[allow(dead_code)]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.name() == name)
    }
}


impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_sunday() as usize]
    }
}


impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
