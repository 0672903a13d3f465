//! Size-unit conversion and rounding utilities
//!
//! Provides the size units accepted for reporting (`bytes`, `kb`, `mb`,
//! `gb`) and the fixed-precision rounding applied to recorded values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProbeError;

/// Unit used when reporting the source file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Raw byte count (integral)
    Bytes,
    /// Kibibytes, bytes / 1024
    Kb,
    /// Mebibytes, bytes / 1024^2
    #[default]
    Mb,
    /// Gibibytes, bytes / 1024^3
    Gb,
}

impl SizeUnit {
    /// Convert a byte count into this unit.
    ///
    /// `bytes` stays integral; the scaled units are rounded to 3 decimals.
    pub fn convert(self, bytes: u64) -> f64 {
        match self {
            SizeUnit::Bytes => bytes as f64,
            SizeUnit::Kb => round3(bytes as f64 / 1024.0),
            SizeUnit::Mb => round3(bytes as f64 / (1024.0 * 1024.0)),
            SizeUnit::Gb => round3(bytes as f64 / (1024.0 * 1024.0 * 1024.0)),
        }
    }

    /// Format a byte count in this unit: integer for bytes, 3 decimals
    /// otherwise.
    pub fn format(self, bytes: u64) -> String {
        match self {
            SizeUnit::Bytes => format!("{}", bytes),
            _ => format!("{:.3}", self.convert(bytes)),
        }
    }

    /// Column name used in the results log when the size field is enabled.
    pub fn column_name(self) -> &'static str {
        match self {
            SizeUnit::Bytes => "file_size_bytes",
            SizeUnit::Kb => "file_size_kb",
            SizeUnit::Mb => "file_size_mb",
            SizeUnit::Gb => "file_size_gb",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SizeUnit::Bytes => "bytes",
            SizeUnit::Kb => "kb",
            SizeUnit::Mb => "mb",
            SizeUnit::Gb => "gb",
        };
        f.write_str(label)
    }
}

impl FromStr for SizeUnit {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bytes" => Ok(SizeUnit::Bytes),
            "kb" => Ok(SizeUnit::Kb),
            "mb" => Ok(SizeUnit::Mb),
            "gb" => Ok(SizeUnit::Gb),
            other => Err(ProbeError::Config(format!(
                "unrecognized size unit '{}' (expected bytes, kb, mb or gb)",
                other
            ))),
        }
    }
}

/// Round a duration in seconds to 4 decimal places, the precision recorded
/// in the results log.
pub fn round_secs(secs: f64) -> f64 {
    (secs * 10_000.0).round() / 10_000.0
}

fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}
