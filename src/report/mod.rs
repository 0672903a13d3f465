//! Results recording module
//!
//! Persists trial results to the CSV results log.

pub mod csv;

pub use self::csv::ResultsLog;
