//! diskprobe - sequential disk-load prober
//!
//! Measures storage performance by timing three elementary file operations
//! per trial: duplicating a source file, rewriting the duplicate with
//! zero-filled 1 MiB chunks, and reading the source fully into memory.
//! Per-trial timings are persisted to a CSV results log.

use std::fmt;

// Public re-exports
pub mod config;
pub mod io;
pub mod models;
pub mod probe;
pub mod report;
pub mod util;

/// Pipeline phase in which an I/O failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inspecting the source file size
    Size,
    /// Duplicating the source to the work path
    Copy,
    /// Chunked zero-write of the work path
    Write,
    /// Whole-file read of the source
    Read,
    /// Removing the work file after the run
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Size => "size",
            Phase::Copy => "copy",
            Phase::Write => "write",
            Phase::Read => "read",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

// Common error types
#[derive(Debug)]
pub enum ProbeError {
    /// Configuration validation or parsing error
    Config(String),
    /// An OS-level file operation failed during a probe phase
    Io {
        /// Phase that was executing when the failure occurred
        phase: Phase,
        /// 1-based trial index, if the failure happened inside a trial
        trial: Option<u32>,
        /// Underlying OS error
        source: std::io::Error,
    },
    /// Results log could not be opened or written
    Persistence(String),
}

impl ProbeError {
    /// Wrap an OS error with the phase and trial it occurred in.
    pub fn io(phase: Phase, trial: Option<u32>, source: std::io::Error) -> Self {
        ProbeError::Io {
            phase,
            trial,
            source,
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProbeError::Io {
                phase,
                trial: Some(trial),
                source,
            } => write!(
                f,
                "I/O failure in {} phase (trial {}): {}",
                phase, trial, source
            ),
            ProbeError::Io {
                phase,
                trial: None,
                source,
            } => write!(f, "I/O failure in {} phase: {}", phase, source),
            ProbeError::Persistence(msg) => write!(f, "Results persistence error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<csv::Error> for ProbeError {
    fn from(err: csv::Error) -> Self {
        ProbeError::Persistence(format!("CSV write error: {}", err))
    }
}

impl From<toml::de::Error> for ProbeError {
    fn from(err: toml::de::Error) -> Self {
        ProbeError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for ProbeError {
    fn from(err: toml::ser::Error) -> Self {
        ProbeError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for diskprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

// Common constants
pub const APP_NAME: &str = "diskprobe";
/// Fixed write-buffer size: 1 MiB
pub const CHUNK_SIZE: usize = 1024 * 1024;
/// Default results log file name, created in the work file's directory
pub const RESULTS_FILE: &str = "results.csv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Copy.to_string(), "copy");
        assert_eq!(Phase::Write.to_string(), "write");
        assert_eq!(Phase::Read.to_string(), "read");
        assert_eq!(Phase::Cleanup.to_string(), "cleanup");
    }

    #[test]
    fn test_io_error_context() {
        let err = ProbeError::io(
            Phase::Write,
            Some(3),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("write phase"));
        assert!(msg.contains("trial 3"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_io_error_without_trial() {
        let err = ProbeError::io(
            Phase::Size,
            None,
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.to_string().contains("trial"));
    }
}
