//! Aggregation layer for chat message counts.

mod histogram;

#[allow(unused_imports)]
pub use histogram::{Chattiest, Histogram, HistogramError, UserCounts};
