//! # Async File Logger
//!
//! A buffered, asynchronous multi-file logging engine: producer
//! threads enqueue records destined for named log files, and a single
//! background worker formats, rotates and durably appends them,
//! keeping disk I/O off the producer's latency path.
//!
//! ## Features
//!
//! - **Multiple Files**: every record names its target log file;
//!   per-file buffers preserve FIFO order within each file
//! - **Never Blocks, Never Throws**: producer calls are fire-and-forget;
//!   overflow drops and counts, format errors fall back to the template
//! - **Columnar Output**: configurable metadata columns, widths,
//!   separators and an optional header row per fresh file
//! - **Rotation**: size-based rotation into numbered backups with a
//!   retention limit

pub mod core;
pub mod macros;
mod writer;

pub mod prelude {
    pub use crate::core::{
        Level, LevelFormat, LogRecord, LogStream, Logger, LoggerError, LoggerOptions,
        MetadataColumn, Result, MAX_FORMATTED_MESSAGE_SIZE,
    };
}

pub use crate::core::{
    local_timestamp, Level, LevelFormat, LogRecord, LogStream, Logger, LoggerError, LoggerOptions,
    MetadataColumn, Result, MAX_FORMATTED_MESSAGE_SIZE,
};
