//! Logging macros capturing the call site.
//!
//! The macros record `file!()`, `line!()` and `module_path!()` so the
//! source columns of the log line point back to the producer without
//! any boilerplate at the call site.
//!
//! # Examples
//!
//! ```no_run
//! use async_file_logger::{info, log_stream, Level, Logger};
//!
//! let mut logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "app.log", "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "app.log", "Server listening on port {}", port);
//!
//! // Streaming accumulator, enqueued exactly once
//! log_stream!(logger, "app.log", Level::Debug)
//!     .value("request took ")
//!     .value(12)
//!     .value("ms")
//!     .finish();
//!
//! logger.shutdown();
//! ```

/// Format and enqueue a message at an explicit level.
///
/// If formatting fails the raw template string is logged instead; the
/// call never panics and never returns an error.
///
/// # Examples
///
/// ```no_run
/// # use async_file_logger::{log_format, Level, Logger};
/// # let mut logger = Logger::new();
/// log_format!(logger, "app.log", Level::Info, "Simple message");
/// log_format!(logger, "app.log", Level::Error, "Error code: {}", 500);
/// # logger.shutdown();
/// ```
#[macro_export]
macro_rules! log_format {
    ($logger:expr, $file:expr, $level:expr, $template:tt $(, $arg:expr)* $(,)?) => {
        $logger.write_formatted(
            $file,
            $level,
            file!(),
            line!(),
            module_path!(),
            $template,
            format_args!($template $(, $arg)*),
        )
    };
}

/// Begin a streaming accumulator at an explicit level.
///
/// The returned [`LogStream`](crate::LogStream) enqueues its message
/// exactly once, on `finish()` or at end of scope.
///
/// # Examples
///
/// ```no_run
/// # use async_file_logger::{log_stream, Level, Logger};
/// # let mut logger = Logger::new();
/// log_stream!(logger, "app.log", Level::Notice)
///     .value("cache hit ratio: ")
///     .value(0.97)
///     .finish();
/// # logger.shutdown();
/// ```
#[macro_export]
macro_rules! log_stream {
    ($logger:expr, $file:expr, $level:expr) => {
        $logger.stream($file, $level, file!(), line!(), module_path!())
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Fatal, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Warning, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Notice, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Debug, $($arg)+)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $file:expr, $($arg:tt)+) => {
        $crate::log_format!($logger, $file, $crate::Level::Verbose, $($arg)+)
    };
}
