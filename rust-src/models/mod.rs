//! Data models for chat log records.

mod message;

pub use message::{Message, TimeBucket, Weekday};
