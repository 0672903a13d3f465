//! Data models module
//!
//! Contains the per-trial result row model.

pub mod result;

pub use result::TrialResult;
