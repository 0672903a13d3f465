//! Configuration management module
//!
//! Handles construction, validation, and TOML persistence of the probe
//! configuration: source and work paths, trial count, size unit, results
//! schema, and log persistence mode.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util::SizeUnit;
use crate::{ProbeError, Result, RESULTS_FILE};

/// How the results log is opened at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Replace the log wholesale; the header is always written.
    #[default]
    Overwrite,
    /// Open for append; the header is written only if the log is empty,
    /// so independent runs accumulate into one log.
    Append,
}

/// Optional columns of a results row. The minimal schema carries only the
/// trial index and the three timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RowSchema {
    /// Prepend the source file name to each row.
    #[serde(default)]
    pub include_file_name: bool,
    /// Insert the source size (in the configured unit) after the name.
    #[serde(default)]
    pub include_file_size: bool,
}

/// Probe configuration, immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Source file whose copy/write/read behavior is probed. Never modified.
    pub source_path: PathBuf,
    /// Work path: either a file path or an existing directory. When a
    /// directory is given, the work file takes the source's base name
    /// inside it.
    pub work_path: PathBuf,
    /// Number of trials, at least 1.
    pub trials: u32,
    /// Unit used for reporting the source size.
    #[serde(default)]
    pub size_unit: SizeUnit,
    /// Results log open mode.
    #[serde(default)]
    pub persist_mode: PersistMode,
    /// Optional columns of the results rows.
    #[serde(default)]
    pub schema: RowSchema,
    /// Results log path. Defaults to `results.csv` in the work file's
    /// directory.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl ProbeConfig {
    /// Create a configuration with default reporting options.
    pub fn new(source_path: PathBuf, work_path: PathBuf, trials: u32) -> Self {
        Self {
            source_path,
            work_path,
            trials,
            size_unit: SizeUnit::default(),
            persist_mode: PersistMode::default(),
            schema: RowSchema::default(),
            log_path: None,
        }
    }

    /// Set the size reporting unit
    pub fn with_size_unit(mut self, unit: SizeUnit) -> Self {
        self.size_unit = unit;
        self
    }

    /// Set the results log persistence mode
    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    /// Set the results row schema
    pub fn with_schema(mut self, schema: RowSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Override the results log path
    pub fn with_log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    /// Work file path with a directory argument resolved to a file inside
    /// it, named after the source.
    pub fn resolved_work_path(&self) -> PathBuf {
        if self.work_path.is_dir() {
            match self.source_path.file_name() {
                Some(name) => self.work_path.join(name),
                None => self.work_path.clone(),
            }
        } else {
            self.work_path.clone()
        }
    }

    /// Results log path: explicit override, or `results.csv` next to the
    /// work file.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_path {
            return path.clone();
        }
        let work = self.resolved_work_path();
        match work.parent() {
            Some(dir) => dir.join(RESULTS_FILE),
            None => PathBuf::from(RESULTS_FILE),
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.source_path.exists() {
            return Err(ProbeError::Config(format!(
                "source file does not exist: {}",
                self.source_path.display()
            )));
        }

        if !self.source_path.is_file() {
            return Err(ProbeError::Config(format!(
                "source path is not a regular file: {}",
                self.source_path.display()
            )));
        }

        if self.trials == 0 {
            return Err(ProbeError::Config(
                "trial count must be at least 1".to_string(),
            ));
        }

        let work = self.resolved_work_path();

        let work_dir = work
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if !work_dir.is_dir() {
            return Err(ProbeError::Config(format!(
                "work directory does not exist: {}",
                work_dir.display()
            )));
        }

        // The copy phase would clobber the source if the two paths collide.
        if Self::same_file(&self.source_path, &work) {
            return Err(ProbeError::Config(format!(
                "work path must differ from the source file: {}",
                work.display()
            )));
        }

        Ok(())
    }

    fn same_file(source: &Path, work: &Path) -> bool {
        if source == work {
            return true;
        }
        // The work file may not exist yet; compare canonical parents plus
        // file names.
        let canonical_source = match fs::canonicalize(source) {
            Ok(path) => path,
            Err(_) => return false,
        };
        let work_dir = work
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        match (fs::canonicalize(&work_dir), work.file_name()) {
            (Ok(dir), Some(name)) => dir.join(name) == canonical_source,
            _ => false,
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProbeError::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            ProbeError::Config(format!(
                "failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_config(dir: &Path) -> ProbeConfig {
        let source = dir.join("source.dat");
        fs::write(&source, b"0123456789").unwrap();
        ProbeConfig::new(source, dir.join("work.dat"), 3)
    }

    #[test]
    fn test_validate_ok() {
        let dir = tempdir().unwrap();
        assert!(sample_config(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_missing_source() {
        let dir = tempdir().unwrap();
        let config = ProbeConfig::new(
            dir.path().join("absent.dat"),
            dir.path().join("work.dat"),
            1,
        );
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn test_validate_source_must_be_file() {
        let dir = tempdir().unwrap();
        let config = ProbeConfig::new(
            dir.path().to_path_buf(),
            dir.path().join("work.dat"),
            1,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_trials() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.trials = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("trial count"));
    }

    #[test]
    fn test_validate_rejects_work_path_equal_to_source() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.work_path = config.source_path.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_work_dir_containing_source_name() {
        // Directory work path resolving onto the source file itself.
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.work_path = dir.path().to_path_buf();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_work_dir() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.work_path = dir.path().join("no-such-dir").join("work.dat");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_work_path_from_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("scratch");
        fs::create_dir(&sub).unwrap();
        let mut config = sample_config(dir.path());
        config.work_path = sub.clone();
        assert_eq!(config.resolved_work_path(), sub.join("source.dat"));
    }

    #[test]
    fn test_default_log_path_is_in_work_dir() {
        let dir = tempdir().unwrap();
        let config = sample_config(dir.path());
        assert_eq!(config.log_path(), dir.path().join(RESULTS_FILE));
    }

    #[test]
    fn test_log_path_override() {
        let dir = tempdir().unwrap();
        let config =
            sample_config(dir.path()).with_log_path(dir.path().join("probe-log.csv"));
        assert_eq!(config.log_path(), dir.path().join("probe-log.csv"));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempdir().unwrap();
        let config = sample_config(dir.path())
            .with_size_unit(SizeUnit::Kb)
            .with_persist_mode(PersistMode::Append)
            .with_schema(RowSchema {
                include_file_name: true,
                include_file_size: true,
            });

        let path = dir.path().join("probe.toml");
        config.save(&path).unwrap();
        let loaded = ProbeConfig::from_file(&path).unwrap();

        assert_eq!(loaded.source_path, config.source_path);
        assert_eq!(loaded.trials, config.trials);
        assert_eq!(loaded.size_unit, SizeUnit::Kb);
        assert_eq!(loaded.persist_mode, PersistMode::Append);
        assert!(loaded.schema.include_file_name);
        assert!(loaded.schema.include_file_size);
    }

    #[test]
    fn test_toml_defaults_for_omitted_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        fs::write(
            &path,
            "source_path = \"/tmp/a.dat\"\nwork_path = \"/tmp/work\"\ntrials = 2\n",
        )
        .unwrap();

        let loaded = ProbeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.size_unit, SizeUnit::Mb);
        assert_eq!(loaded.persist_mode, PersistMode::Overwrite);
        assert!(!loaded.schema.include_file_name);
        assert!(loaded.log_path.is_none());
    }
}
