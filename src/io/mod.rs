//! I/O operations module
//!
//! Contains the scoped disk operations the prober times: copy, chunked
//! zero-write, and whole-file read, plus size inspection and the work-file
//! cleanup guard.

pub mod disk;

pub use disk::{file_size, size_in, timed_copy, timed_read, timed_write, WorkFile};
