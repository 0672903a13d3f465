//! Timed disk operations
//!
//! Each operation opens its own file handle and releases it on every exit
//! path. Timer boundaries are deliberate and must stay where they are for
//! result comparability:
//!
//! - copy: the whole `fs::copy` call is measured.
//! - write: measured after the truncating open, stopped after the last
//!   write and before close. Open/truncate and close/flush latency are
//!   excluded, so the figure reflects write-to-page-cache throughput.
//! - read: measured from before the open through the single whole-file
//!   read.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::util::SizeUnit;
use crate::{Phase, ProbeError, Result, CHUNK_SIZE};

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Size of a file converted to the requested unit.
///
/// Pure query: no side effects. The unit is already validated at parse
/// time, so the only failure mode is the metadata lookup itself.
pub fn size_in(path: &Path, unit: SizeUnit) -> Result<f64> {
    let bytes = file_size(path).map_err(|e| ProbeError::io(Phase::Size, None, e))?;
    Ok(unit.convert(bytes))
}

/// Duplicate the source file to the work path, overwriting any existing
/// file there, and return the elapsed wall-clock time.
pub fn timed_copy(source: &Path, work: &Path) -> io::Result<Duration> {
    let started = Instant::now();
    fs::copy(source, work)?;
    Ok(started.elapsed())
}

/// Write exactly `size` zero bytes to the work path in 1 MiB chunks,
/// truncating whatever the copy phase left behind, and return the elapsed
/// time of the writes alone.
pub fn timed_write(work: &Path, size: u64) -> io::Result<Duration> {
    let mut file = File::create(work)?;
    let chunk = vec![0u8; CHUNK_SIZE];
    let started = Instant::now();
    write_zero_chunks(&mut file, &chunk, size)?;
    Ok(started.elapsed())
}

/// Read the entire source file into memory in one request, discard it,
/// and return the elapsed time including the open.
pub fn timed_read(source: &Path) -> io::Result<Duration> {
    let started = Instant::now();
    let mut file = File::open(source)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(started.elapsed())
}

/// Chunk loop of the write phase: emit the full buffer while at least one
/// chunk remains, then the exact remainder. A size of 0 writes nothing.
pub(crate) fn write_zero_chunks<W: Write>(out: &mut W, chunk: &[u8], size: u64) -> io::Result<()> {
    let chunk_len = chunk.len() as u64;
    let mut remaining = size;
    while remaining >= chunk_len {
        out.write_all(chunk)?;
        remaining -= chunk_len;
    }
    if remaining > 0 {
        out.write_all(&chunk[..remaining as usize])?;
    }
    Ok(())
}

/// Work-file handle with automatic cleanup.
///
/// The drop guard removes the file on every exit path, including mid-run
/// failures; the success path calls [`WorkFile::remove`] instead so that a
/// deletion error is reported rather than swallowed.
#[derive(Debug)]
pub struct WorkFile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl WorkFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cleanup_on_drop: true,
        }
    }

    /// Disable automatic cleanup (for debugging)
    pub fn keep_on_drop(&mut self) {
        self.cleanup_on_drop = false;
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the work file now, disarming the drop guard.
    pub fn remove(mut self) -> io::Result<()> {
        self.cleanup_on_drop = false;
        fs::remove_file(&self.path)
    }
}

impl Drop for WorkFile {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            let _ = fs::remove_file(&self.path);
        }
    }
}
