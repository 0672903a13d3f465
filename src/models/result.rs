//! Trial result data model

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::round_secs;

/// Timings of one Copy -> Write -> Read trial. Created once per trial and
/// never mutated afterwards; ownership moves to the results recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// 1-based trial index
    pub trial: u32,
    /// Copy phase duration in seconds, 4-decimal precision
    pub copy_secs: f64,
    /// Read phase duration in seconds, 4-decimal precision
    pub read_secs: f64,
    /// Chunked-write phase duration in seconds, 4-decimal precision
    pub write_secs: f64,
}

impl TrialResult {
    /// Build a row from raw phase durations, rounding each to 4 decimals.
    pub fn new(trial: u32, copy: Duration, read: Duration, write: Duration) -> Self {
        Self {
            trial,
            copy_secs: round_secs(copy.as_secs_f64()),
            read_secs: round_secs(read.as_secs_f64()),
            write_secs: round_secs(write.as_secs_f64()),
        }
    }
}
