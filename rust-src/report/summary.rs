//! Human-readable and JSON summaries of a histogram.

use std::collections::HashMap;

use serde::Serialize;

use crate::aggregation::{Histogram, HistogramError};
use crate::models::Weekday;


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusiestBucket<K> {
    pub bucket: K,
    pub messages: u64,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user: String,
    pub messages: u64,
    pub chattiest_weekday: Option<BusiestBucket<Weekday>>,
    pub chattiest_hour: Option<BusiestBucket<i32>>,
}


/// Snapshot of the facts reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_messages: u64,
    pub users: Vec<UserSummary>,
}


impl Summary {
    pub fn from_histogram(histogram: &Histogram) -> Result<Self, HistogramError> {
        if histogram.is_empty() {
            return Err(HistogramError::Empty);
        }

        let mut weekdays: HashMap<String, BusiestBucket<Weekday>> = histogram
            .chattiest_weekday_per_user()
            .into_iter()
            .map(|c| (c.user, BusiestBucket { bucket: c.bucket, messages: c.count }))
            .collect();
        let mut hours: HashMap<String, BusiestBucket<i32>> = histogram
            .chattiest_hour_per_user()
            .into_iter()
            .map(|c| (c.user, BusiestBucket { bucket: c.bucket, messages: c.count }))
            .collect();

        let users = histogram
            .by_user()
            .iter()
            .map(|(user, &messages)| UserSummary {
                user: user.trim().to_string(),
                messages,
                chattiest_weekday: weekdays.remove(user),
                chattiest_hour: hours.remove(user),
            })
            .collect();

        Ok(Self {
            total_messages: histogram.total_messages(),
            users,
        })
    }

    /// One line per fact.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Total messages sent: {}", self.total_messages)];

        for user in &self.users {
            lines.push(format!("User {} sent {} messages in total.", user.user, user.messages));
        }
        for user in &self.users {
            if let Some(day) = &user.chattiest_weekday {
                lines.push(format!(
                    "{} sends the most messages on {}, {} all told.",
                    user.user, day.bucket, day.messages
                ));
            }
        }
        for user in &self.users {
            if let Some(hour) = &user.chattiest_hour {
                lines.push(format!(
                    "{} sends the most messages during the {:02}:00 hour, {} all told.",
                    user.user, hour.bucket, hour.messages
                ));
            }
        }

        lines
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
