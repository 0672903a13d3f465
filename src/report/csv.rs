//! CSV results log
//!
//! Writes one row per trial with a fixed header schema. Two persistence
//! modes: overwrite replaces the log wholesale and always writes the
//! header; append opens the log for append and writes the header only when
//! the file is empty, so independent runs accumulate.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use crate::config::{PersistMode, RowSchema};
use crate::models::TrialResult;
use crate::util::SizeUnit;
use crate::{ProbeError, Result};

/// Results log writer.
#[derive(Debug)]
pub struct ResultsLog {
    path: PathBuf,
    schema: RowSchema,
    unit: SizeUnit,
    mode: PersistMode,
}

impl ResultsLog {
    pub fn new(path: PathBuf, schema: RowSchema, unit: SizeUnit, mode: PersistMode) -> Self {
        Self {
            path,
            schema,
            unit,
            mode,
        }
    }

    /// Get the results log path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Persist a completed run: all rows at once, per the configured mode.
    ///
    /// `file_name` and `size_bytes` describe the source file and are only
    /// emitted when the schema enables those columns. Any open or write
    /// failure is fatal; rows are written whole or not at all.
    pub fn persist(&self, file_name: &str, size_bytes: u64, rows: &[TrialResult]) -> Result<()> {
        let (file, write_header) = self.open()?;
        let mut writer = csv::Writer::from_writer(file);

        if write_header {
            writer.write_record(self.header())?;
        }
        for row in rows {
            writer.write_record(self.record(file_name, size_bytes, row))?;
        }

        writer
            .flush()
            .map_err(|e| ProbeError::Persistence(format!("failed to flush {}: {}", self.path.display(), e)))?;
        Ok(())
    }

    fn open(&self) -> Result<(File, bool)> {
        match self.mode {
            PersistMode::Overwrite => {
                let file = File::create(&self.path).map_err(|e| {
                    ProbeError::Persistence(format!(
                        "failed to create results log {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                Ok((file, true))
            }
            PersistMode::Append => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .map_err(|e| {
                        ProbeError::Persistence(format!(
                            "failed to open results log {}: {}",
                            self.path.display(),
                            e
                        ))
                    })?;
                let empty = file
                    .metadata()
                    .map_err(|e| {
                        ProbeError::Persistence(format!(
                            "failed to stat results log {}: {}",
                            self.path.display(),
                            e
                        ))
                    })?
                    .len()
                    == 0;
                Ok((file, empty))
            }
        }
    }

    fn header(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(6);
        if self.schema.include_file_name {
            fields.push("file_name".to_string());
        }
        if self.schema.include_file_size {
            fields.push(self.unit.column_name().to_string());
        }
        fields.push("trial_index".to_string());
        fields.push("copy_seconds".to_string());
        fields.push("read_seconds".to_string());
        fields.push("write_seconds".to_string());
        fields
    }

    fn record(&self, file_name: &str, size_bytes: u64, row: &TrialResult) -> Vec<String> {
        let mut fields = Vec::with_capacity(6);
        if self.schema.include_file_name {
            fields.push(file_name.to_string());
        }
        if self.schema.include_file_size {
            fields.push(self.unit.format(size_bytes));
        }
        fields.push(row.trial.to_string());
        fields.push(format!("{:.4}", row.copy_secs));
        fields.push(format!("{:.4}", row.read_secs));
        fields.push(format!("{:.4}", row.write_secs));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample_rows(count: u32) -> Vec<TrialResult> {
        (1..=count)
            .map(|i| {
                TrialResult::new(
                    i,
                    Duration::from_millis(12),
                    Duration::from_millis(3),
                    Duration::from_millis(45),
                )
            })
            .collect()
    }

    fn lines(path: &std::path::Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_minimal_schema_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let log = ResultsLog::new(
            path.clone(),
            RowSchema::default(),
            SizeUnit::Mb,
            PersistMode::Overwrite,
        );

        log.persist("a.dat", 1024, &sample_rows(2)).unwrap();

        let lines = lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "trial_index,copy_seconds,read_seconds,write_seconds"
        );
        assert_eq!(lines[1], "1,0.0120,0.0030,0.0450");
        assert_eq!(lines[2], "2,0.0120,0.0030,0.0450");
    }

    #[test]
    fn test_extended_schema_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let log = ResultsLog::new(
            path.clone(),
            RowSchema {
                include_file_name: true,
                include_file_size: true,
            },
            SizeUnit::Mb,
            PersistMode::Overwrite,
        );

        log.persist("data.bin", 2_621_440, &sample_rows(1)).unwrap();

        let lines = lines(&path);
        assert_eq!(
            lines[0],
            "file_name,file_size_mb,trial_index,copy_seconds,read_seconds,write_seconds"
        );
        assert!(lines[1].starts_with("data.bin,2.500,1,"));
    }

    #[test]
    fn test_size_column_integer_for_bytes_unit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let log = ResultsLog::new(
            path.clone(),
            RowSchema {
                include_file_name: false,
                include_file_size: true,
            },
            SizeUnit::Bytes,
            PersistMode::Overwrite,
        );

        log.persist("data.bin", 4096, &sample_rows(1)).unwrap();

        let lines = lines(&path);
        assert_eq!(
            lines[0],
            "file_size_bytes,trial_index,copy_seconds,read_seconds,write_seconds"
        );
        assert!(lines[1].starts_with("4096,1,"));
    }

    #[test]
    fn test_overwrite_mode_replaces_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let log = ResultsLog::new(
            path.clone(),
            RowSchema::default(),
            SizeUnit::Mb,
            PersistMode::Overwrite,
        );

        log.persist("a.dat", 10, &sample_rows(5)).unwrap();
        log.persist("a.dat", 10, &sample_rows(2)).unwrap();

        // header + 2 rows only
        assert_eq!(lines(&path).len(), 3);
    }

    #[test]
    fn test_append_mode_accumulates_with_single_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let log = ResultsLog::new(
            path.clone(),
            RowSchema::default(),
            SizeUnit::Mb,
            PersistMode::Append,
        );

        log.persist("a.dat", 10, &sample_rows(3)).unwrap();
        log.persist("a.dat", 10, &sample_rows(4)).unwrap();

        let lines = lines(&path);
        assert_eq!(lines.len(), 1 + 3 + 4);
        let headers = lines
            .iter()
            .filter(|l| l.starts_with("trial_index"))
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_append_mode_writes_header_into_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, b"").unwrap();

        let log = ResultsLog::new(
            path.clone(),
            RowSchema::default(),
            SizeUnit::Mb,
            PersistMode::Append,
        );
        log.persist("a.dat", 10, &sample_rows(1)).unwrap();

        assert!(lines(&path)[0].starts_with("trial_index"));
    }

    #[test]
    fn test_persist_failure_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("results.csv");
        let log = ResultsLog::new(
            path,
            RowSchema::default(),
            SizeUnit::Mb,
            PersistMode::Overwrite,
        );

        let err = log.persist("a.dat", 10, &sample_rows(1)).unwrap_err();
        assert!(matches!(err, ProbeError::Persistence(_)));
    }
}
