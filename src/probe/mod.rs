//! Probe engine module
//!
//! Contains the trial runner composing the Copy -> Write -> Read pipeline.

pub mod runner;

pub use runner::Prober;
