//! Utility functions module
//!
//! Contains helpers for size-unit conversion and duration rounding.

pub mod units;

// Re-export commonly used items
pub use units::{round_secs, SizeUnit};
