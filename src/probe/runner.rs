//! Trial runner
//!
//! Executes the configured number of trials sequentially. Each trial runs
//! Copy -> Write -> Read in that fixed order against the same work path:
//! the copy phase creates the work file and the write phase truncates and
//! rewrites it before the next trial begins. Rows are persisted after the
//! full loop completes (all-or-nothing), then the work file is removed.

use std::path::Path;

use chrono::Utc;

use crate::config::ProbeConfig;
use crate::io::disk::{self, WorkFile};
use crate::models::TrialResult;
use crate::report::ResultsLog;
use crate::{Phase, ProbeError, Result};

/// Callback invoked after each trial's write phase, before cleanup, with
/// the trial index and the work path. Lets callers observe the work file
/// while it still exists on disk.
type TrialObserver = Box<dyn Fn(u32, &Path)>;

/// Sequential disk-load prober.
pub struct Prober {
    config: ProbeConfig,
    observer: Option<TrialObserver>,
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober")
            .field("config", &self.config)
            .field("observer", &self.observer.as_ref().map(|_| "Fn(u32, &Path)"))
            .finish()
    }
}

impl Prober {
    /// Create a prober from a validated configuration.
    pub fn new(config: ProbeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
        })
    }

    /// Install a per-trial observer.
    pub fn with_trial_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32, &Path) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run all trials to completion. Results are a side effect: rows land
    /// in the results log and the work file is gone when this returns.
    ///
    /// Any phase failure aborts the remaining trials; rows gathered so far
    /// are dropped and the work file is still removed by its guard.
    pub fn run(&self) -> Result<()> {
        let source = &self.config.source_path;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());

        let size_bytes =
            disk::file_size(source).map_err(|e| ProbeError::io(Phase::Size, None, e))?;

        let work_path = self.config.resolved_work_path();
        let started = Utc::now();
        println!(
            "[{}] probing {} ({} {}), {} trials",
            started.format("%Y-%m-%d %H:%M:%S UTC"),
            file_name,
            self.config.size_unit.format(size_bytes),
            self.config.size_unit,
            self.config.trials
        );

        let work = WorkFile::new(work_path.clone());
        let mut rows = Vec::with_capacity(self.config.trials as usize);

        for trial in 1..=self.config.trials {
            let copy = disk::timed_copy(source, &work_path)
                .map_err(|e| ProbeError::io(Phase::Copy, Some(trial), e))?;
            let write = disk::timed_write(&work_path, size_bytes)
                .map_err(|e| ProbeError::io(Phase::Write, Some(trial), e))?;
            if let Some(observer) = &self.observer {
                observer(trial, &work_path);
            }
            let read = disk::timed_read(source)
                .map_err(|e| ProbeError::io(Phase::Read, Some(trial), e))?;

            let row = TrialResult::new(trial, copy, read, write);
            println!(
                "trial {}/{}: copy {:.4}s  read {:.4}s  write {:.4}s",
                trial, self.config.trials, row.copy_secs, row.read_secs, row.write_secs
            );
            rows.push(row);
        }

        let log = ResultsLog::new(
            self.config.log_path(),
            self.config.schema,
            self.config.size_unit,
            self.config.persist_mode,
        );
        log.persist(&file_name, size_bytes, &rows)?;

        // Timings are captured; remove the work file so nothing stale
        // accumulates across runs.
        work.remove()
            .map_err(|e| ProbeError::io(Phase::Cleanup, None, e))?;

        println!(
            "run complete: {} trials recorded in {}",
            rows.len(),
            log.path().display()
        );
        Ok(())
    }
}
