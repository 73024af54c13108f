//! Per-user message histograms over hour of day, weekday and absolute hour.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::{Message, TimeBucket, Weekday};


/// Message count per user within one bucket.
pub type UserCounts = HashMap<String, u64>;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistogramError {
    #[error("no messages were counted")]
    Empty,
}


/// The bucket holding a user's highest count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chattiest<K> {
    pub user: String,
    pub bucket: K,
    pub count: u64,
}


/// Running counts for one analysis run.
///
/// Bucket maps are ordered by key, so every query iterates weekdays from
/// Sunday and hours ascending. Users keep the order they were first seen in.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    total_messages: u64,
    by_hour_of_day: BTreeMap<i32, UserCounts>,
    by_weekday: BTreeMap<Weekday, UserCounts>,
    by_absolute_hour: BTreeMap<TimeBucket, UserCounts>,
    min_bucket: Option<TimeBucket>,
    max_bucket: Option<TimeBucket>,
    by_user: IndexMap<String, u64>,
}


impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one message in every dimension. Field values are not range checked.
    pub fn count(&mut self, message: &Message) {
        let bucket = message.time_bucket();
        let user = message.user.as_str();

        self.total_messages += 1;
        bump(self.by_hour_of_day.entry(message.hour).or_default(), user);
        bump(self.by_weekday.entry(bucket.weekday()).or_default(), user);
        bump(self.by_absolute_hour.entry(bucket).or_default(), user);

        self.min_bucket = Some(self.min_bucket.map_or(bucket, |min| min.min(bucket)));
        self.max_bucket = Some(self.max_bucket.map_or(bucket, |max| max.max(bucket)));

        *self.by_user.entry(user.to_string()).or_insert(0) += 1;
    }

    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    pub fn is_empty(&self) -> bool {
        self.total_messages == 0
    }

    /// Users in first-seen order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.by_user.keys().map(String::as_str)
    }

    pub fn by_user(&self) -> &IndexMap<String, u64> {
        &self.by_user
    }

    pub fn by_hour_of_day(&self) -> &BTreeMap<i32, UserCounts> {
        &self.by_hour_of_day
    }

    pub fn by_weekday(&self) -> &BTreeMap<Weekday, UserCounts> {
        &self.by_weekday
    }

    pub fn by_absolute_hour(&self) -> &BTreeMap<TimeBucket, UserCounts> {
        &self.by_absolute_hour
    }

    /// Earliest and latest hour bucket seen so far.
    pub fn bucket_range(&self) -> Result<(TimeBucket, TimeBucket), HistogramError> {
        match (self.min_bucket, self.max_bucket) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(HistogramError::Empty),
        }
    }

    /// Each user's busiest weekday. Ties go to the earlier day of the week.
    pub fn chattiest_weekday_per_user(&self) -> Vec<Chattiest<Weekday>> {
        self.chattiest_per_user(&self.by_weekday)
    }

    /// Each user's busiest hour of day. Ties go to the earlier hour.
    pub fn chattiest_hour_per_user(&self) -> Vec<Chattiest<i32>> {
        self.chattiest_per_user(&self.by_hour_of_day)
    }

    fn chattiest_per_user<K: Copy>(&self, buckets: &BTreeMap<K, UserCounts>) -> Vec<Chattiest<K>> {
        self.by_user
            .keys()
            .filter_map(|user| {
                let mut best: Option<(K, u64)> = None;
                for (bucket, counts) in buckets {
                    let count = counts.get(user).copied().unwrap_or(0);
                    // strictly greater, so the first bucket keeps a tie
                    if count > best.map_or(0, |(_, c)| c) {
                        best = Some((*bucket, count));
                    }
                }
                best.map(|(bucket, count)| Chattiest {
                    user: user.clone(),
                    bucket,
                    count,
                })
            })
            .collect()
    }
}


fn bump(counts: &mut UserCounts, user: &str) {
    *counts.entry(user.to_string()).or_insert(0) += 1;
}


#[cfg(test)]
mod tests {
    use super::*;

    fn message(user: &str, year: i32, month: i32, day: i32, hour: i32) -> Message {
        Message {
            body: "hi".to_string(),
            user: user.to_string(),
            day,
            month,
            year,
            hour,
            ..Default::default()
        }
    }

    fn nested_sum<K>(map: &BTreeMap<K, UserCounts>) -> u64 {
        map.values().flat_map(|counts| counts.values()).sum()
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::new();
        assert!(histogram.is_empty());
        assert_eq!(histogram.bucket_range(), Err(HistogramError::Empty));
        assert!(histogram.chattiest_weekday_per_user().is_empty());
        assert!(histogram.chattiest_hour_per_user().is_empty());
    }

    #[test]
    fn test_totals_agree_across_dimensions() {
        let mut histogram = Histogram::new();
        let messages = [
            message("alice", 2024, 1, 1, 10),
            message("bob", 2024, 1, 1, 10),
            message("alice", 2024, 1, 2, 23),
            message("carol", 2023, 12, 31, 0),
            message("alice", 2024, 1, 6, 25),
        ];
        for m in &messages {
            histogram.count(m);
        }

        let total = histogram.total_messages();
        assert_eq!(total, messages.len() as u64);
        assert_eq!(histogram.by_user().values().sum::<u64>(), total);
        assert_eq!(nested_sum(histogram.by_hour_of_day()), total);
        assert_eq!(nested_sum(histogram.by_weekday()), total);
        assert_eq!(nested_sum(histogram.by_absolute_hour()), total);

        for counts in histogram.by_hour_of_day().values() {
            for user in counts.keys() {
                assert!(histogram.by_user().contains_key(user));
            }
        }
    }

    #[test]
    fn test_count_bumps_only_that_user() {
        let mut histogram = Histogram::new();
        histogram.count(&message("alice", 2024, 1, 1, 10));
        histogram.count(&message("bob", 2024, 1, 1, 10));

        histogram.count(&message("alice", 2024, 1, 1, 10));

        let bucket = TimeBucket::from_fields(2024, 1, 1, 10);
        assert_eq!(histogram.by_hour_of_day()[&10]["alice"], 2);
        assert_eq!(histogram.by_hour_of_day()[&10]["bob"], 1);
        assert_eq!(histogram.by_weekday()[&Weekday::Monday]["alice"], 2);
        assert_eq!(histogram.by_weekday()[&Weekday::Monday]["bob"], 1);
        assert_eq!(histogram.by_absolute_hour()[&bucket]["alice"], 2);
        assert_eq!(histogram.by_absolute_hour()[&bucket]["bob"], 1);
        assert_eq!(histogram.by_user()["alice"], 2);
        assert_eq!(histogram.by_user()["bob"], 1);
    }

    #[test]
    fn test_users_keep_first_seen_order() {
        let mut histogram = Histogram::new();
        for user in ["zed", "amy", "zed", "mo"] {
            histogram.count(&message(user, 2024, 1, 1, 9));
        }
        assert_eq!(histogram.users().collect::<Vec<_>>(), vec!["zed", "amy", "mo"]);
    }

    #[test]
    fn test_bucket_range_tracks_min_and_max() {
        let mut histogram = Histogram::new();
        histogram.count(&message("alice", 2024, 1, 1, 13));
        histogram.count(&message("alice", 2024, 1, 1, 10));
        histogram.count(&message("alice", 2024, 1, 1, 12));

        let (start, end) = histogram.bucket_range().unwrap();
        assert_eq!(start, TimeBucket::from_fields(2024, 1, 1, 10));
        assert_eq!(end, TimeBucket::from_fields(2024, 1, 1, 13));
    }

    #[test]
    fn test_out_of_range_hour_is_its_own_bucket() {
        let mut histogram = Histogram::new();
        histogram.count(&message("alice", 2024, 1, 1, 25));
        histogram.count(&message("alice", 2024, 1, 1, -1));

        assert_eq!(histogram.by_hour_of_day()[&25]["alice"], 1);
        assert_eq!(histogram.by_hour_of_day()[&-1]["alice"], 1);
        assert_eq!(histogram.total_messages(), 2);
    }

    #[test]
    fn test_chattiest_weekday_tie_goes_to_earlier_day() {
        let mut histogram = Histogram::new();
        // 2024-01-01 Monday, 01-02 Tuesday, 01-03 Wednesday
        for (day, times) in [(1, 3), (2, 5), (3, 5)] {
            for _ in 0..times {
                histogram.count(&message("alice", 2024, 1, day, 8));
            }
        }

        let result = histogram.chattiest_weekday_per_user();
        assert_eq!(
            result,
            vec![Chattiest {
                user: "alice".to_string(),
                bucket: Weekday::Tuesday,
                count: 5,
            }]
        );
    }

    #[test]
    fn test_chattiest_hour_per_user() {
        let mut histogram = Histogram::new();
        for hour in [9, 21, 21, 9] {
            histogram.count(&message("alice", 2024, 1, 1, hour));
        }
        for hour in [7, 22, 22] {
            histogram.count(&message("bob", 2024, 1, 1, hour));
        }

        let result = histogram.chattiest_hour_per_user();
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].user.as_str(), result[0].bucket, result[0].count), ("alice", 9, 2));
        assert_eq!((result[1].user.as_str(), result[1].bucket, result[1].count), ("bob", 22, 2));
    }
}
