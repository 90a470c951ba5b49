//! The logging engine
//!
//! Producers enqueue records into per-file buffers; one background
//! worker flushes qualifying buffers through the file writer. Producer
//! calls never block on I/O and never fail: a full buffer drops the
//! incoming record and counts it, a broken format string logs the raw
//! template, and writer-side faults stay on the worker where they are
//! retried on the next cycle.

use super::config::{LoggerOptions, MetadataColumn, ScalarConfig, TextConfig};
use super::level::{Level, LevelFormat};
use super::record::LogRecord;
use super::stream::LogStream;
use super::timestamp::local_timestamp;
use crate::writer::{FileTarget, FileWriter};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Upper bound on a message rendered by [`Logger::write_formatted`].
pub const MAX_FORMATTED_MESSAGE_SIZE: usize = 8192;

/// How long the worker waits for a wake signal before re-scanning on
/// its own. This also paces retries after a failed flush.
const SCAN_INTERVAL: Duration = Duration::from_millis(100);

/// Per-file buffer plus cached writer state.
///
/// Entries are created lazily on first use of a file name and never
/// removed while the logger lives. Producers only push to the back of
/// the buffer and the worker only drains a prefix from the front, so a
/// snapshot of the buffer taken under the table lock stays a valid
/// prefix after the lock is released.
#[derive(Debug, Default)]
struct FileEntry {
    buffer: VecDeque<LogRecord>,
    path: Option<PathBuf>,
    dirs_created: bool,
}

/// State shared between the producer-facing handle and the worker.
struct Shared {
    files: Mutex<BTreeMap<String, FileEntry>>,
    scalars: ScalarConfig,
    text: Mutex<TextConfig>,
    running: AtomicBool,
}

/// The asynchronous multi-file logging engine.
///
/// An explicitly owned object: construction starts the background
/// worker, [`shutdown`](Self::shutdown) (or drop) stops it and drains
/// every buffer. Configuration setters take `&self` and may be called
/// at any time from any thread.
///
/// # Example
///
/// ```no_run
/// use async_file_logger::{Level, Logger};
///
/// let mut logger = Logger::new();
/// logger.set_level(Level::Info).set_buffer_flush_size(8);
///
/// logger.write("app.log", Level::Info, file!(), line!(), module_path!(), "started");
/// logger.shutdown();
/// ```
pub struct Logger {
    shared: Arc<Shared>,
    wake: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
    process_id: u32,
}

impl Logger {
    /// Construct the engine and start its flush worker.
    #[must_use]
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            files: Mutex::new(BTreeMap::new()),
            scalars: ScalarConfig::new(),
            text: Mutex::new(TextConfig::default()),
            running: AtomicBool::new(true),
        });

        let (wake_tx, wake_rx) = bounded(1);
        let process_id = std::process::id();

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || run_worker(&worker_shared, &wake_rx, process_id));

        Self {
            shared,
            wake: Some(wake_tx),
            worker: Some(worker),
            process_id,
        }
    }

    /// Whether a record at `level` would currently be accepted.
    pub fn should_log(&self, level: Level) -> bool {
        self.is_running() && level <= self.shared.scalars.level()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Enqueue a plain message for `file_name`.
    pub fn write(
        &self,
        file_name: &str,
        level: Level,
        source_file: &str,
        source_line: u32,
        source_function: &str,
        message: impl Into<String>,
    ) {
        if self.should_log(level) {
            self.enqueue(
                file_name,
                level,
                source_file,
                source_line,
                source_function,
                message.into(),
            );
        }
    }

    /// Render `args` into a bounded buffer and enqueue the result.
    ///
    /// The rendered message is capped at [`MAX_FORMATTED_MESSAGE_SIZE`]
    /// and silently truncated past it. If a `Display` impl fails
    /// mid-format, the raw `template` is logged instead; the record is
    /// never dropped and the failure never reaches the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn write_formatted(
        &self,
        file_name: &str,
        level: Level,
        source_file: &str,
        source_line: u32,
        source_function: &str,
        template: &str,
        args: fmt::Arguments<'_>,
    ) {
        if !self.should_log(level) {
            return;
        }

        let mut buffer = BoundedMessage::new(MAX_FORMATTED_MESSAGE_SIZE);
        let message = match fmt::Write::write_fmt(&mut buffer, args) {
            Ok(()) => buffer.into_string(),
            Err(fmt::Error) => template.to_string(),
        };

        self.enqueue(file_name, level, source_file, source_line, source_function, message);
    }

    /// Begin a scoped streaming accumulator for `file_name`.
    pub fn stream(
        &self,
        file_name: &str,
        level: Level,
        source_file: &str,
        source_line: u32,
        source_function: &str,
    ) -> LogStream<'_> {
        LogStream::new(self, file_name, level, source_file, source_line, source_function)
    }

    pub(crate) fn enqueue(
        &self,
        file_name: &str,
        level: Level,
        source_file: &str,
        source_line: u32,
        source_function: &str,
        message: String,
    ) {
        // Timestamp and basename are rendered before taking the table
        // lock; only the lookup and append happen under it.
        let format = self.shared.text.lock().timestamp_format.clone();
        let timestamp = local_timestamp(&format);
        let record = LogRecord::new(
            timestamp,
            level,
            source_file,
            source_line,
            source_function,
            message,
        );

        let mut files = self.shared.files.lock();
        let entry = files.entry(file_name.to_string()).or_default();

        let max_size = self.shared.scalars.buffer_max_size();
        if max_size == 0 || entry.buffer.len() < max_size {
            entry.buffer.push_back(record);

            if self.shared.scalars.buffer_flush_size() <= entry.buffer.len() {
                // Release the lock before waking the worker.
                drop(files);
                if let Some(wake) = &self.wake {
                    let _ = wake.try_send(());
                }
            }
        } else {
            // Buffer at capacity: the incoming record is rejected,
            // buffered records are never evicted.
            self.shared.scalars.record_discarded();
        }
    }

    /// Apply a partial options snapshot; unset fields keep their value.
    pub fn configure(&self, options: &LoggerOptions) -> &Self {
        if let Some(level) = options.level {
            self.set_level(level);
        }
        if let Some(format) = options.level_format {
            self.set_level_format(format);
        }
        if let Some(value) = options.create_dirs {
            self.set_create_dirs(value);
        }
        if let Some(value) = options.write_header {
            self.set_write_header(value);
        }
        if let Some(value) = options.write_header_underline {
            self.set_write_header_underline(value);
        }
        if let Some(fill) = options.header_underline_fill {
            self.set_header_underline_fill(fill);
        }
        if let Some(size) = options.buffer_max_size {
            self.set_buffer_max_size(size);
        }
        if let Some(size) = options.buffer_flush_size {
            self.set_buffer_flush_size(size);
        }
        if let Some(size) = options.file_rotation_size {
            self.set_file_rotation_size(size);
        }
        if let Some(limit) = options.file_rotation_limit {
            self.set_file_rotation_limit(limit);
        }
        if let Some(width) = options.timestamp_width {
            self.set_timestamp_width(width);
        }
        if let Some(width) = options.process_id_width {
            self.set_process_id_width(width);
        }
        if let Some(width) = options.thread_id_width {
            self.set_thread_id_width(width);
        }
        if let Some(width) = options.file_name_width {
            self.set_file_name_width(width);
        }
        if let Some(width) = options.line_width {
            self.set_line_width(width);
        }
        if let Some(width) = options.function_width {
            self.set_function_width(width);
        }

        {
            let mut text = self.shared.text.lock();
            if let Some(value) = &options.separator {
                text.separator = value.clone();
            }
            if let Some(value) = &options.header_underline_separator {
                text.header_underline_separator = value.clone();
            }
            if let Some(value) = &options.timestamp_format {
                text.timestamp_format = value.clone();
            }
            if let Some(value) = &options.timestamp_header {
                text.timestamp_header = value.clone();
            }
            if let Some(value) = &options.process_id_header {
                text.process_id_header = value.clone();
            }
            if let Some(value) = &options.thread_id_header {
                text.thread_id_header = value.clone();
            }
            if let Some(value) = &options.file_name_header {
                text.file_name_header = value.clone();
            }
            if let Some(value) = &options.line_header {
                text.line_header = value.clone();
            }
            if let Some(value) = &options.function_header {
                text.function_header = value.clone();
            }
            if let Some(value) = &options.message_header {
                text.message_header = value.clone();
            }
            if let Some(columns) = &options.metadata_columns {
                text.columns = columns.clone();
            }
        }

        self
    }

    pub fn level(&self) -> Level {
        self.shared.scalars.level()
    }

    pub fn set_level(&self, level: Level) -> &Self {
        self.shared.scalars.set_level(level);
        self
    }

    pub fn level_format(&self) -> LevelFormat {
        self.shared.scalars.level_format()
    }

    pub fn set_level_format(&self, format: LevelFormat) -> &Self {
        self.shared.scalars.set_level_format(format);
        self
    }

    pub fn create_dirs(&self) -> bool {
        self.shared.scalars.create_dirs()
    }

    pub fn set_create_dirs(&self, value: bool) -> &Self {
        self.shared.scalars.set_create_dirs(value);
        self
    }

    pub fn write_header(&self) -> bool {
        self.shared.scalars.write_header()
    }

    pub fn set_write_header(&self, value: bool) -> &Self {
        self.shared.scalars.set_write_header(value);
        self
    }

    pub fn write_header_underline(&self) -> bool {
        self.shared.scalars.write_header_underline()
    }

    pub fn set_write_header_underline(&self, value: bool) -> &Self {
        self.shared.scalars.set_write_header_underline(value);
        self
    }

    pub fn header_underline_fill(&self) -> char {
        self.shared.scalars.header_underline_fill()
    }

    pub fn set_header_underline_fill(&self, fill: char) -> &Self {
        self.shared.scalars.set_header_underline_fill(fill);
        self
    }

    pub fn buffer_max_size(&self) -> usize {
        self.shared.scalars.buffer_max_size()
    }

    pub fn set_buffer_max_size(&self, size: usize) -> &Self {
        self.shared.scalars.set_buffer_max_size(size);
        self
    }

    pub fn buffer_flush_size(&self) -> usize {
        self.shared.scalars.buffer_flush_size()
    }

    /// Change the flush threshold and wake the worker so buffers that
    /// already qualify under the new threshold are flushed promptly.
    pub fn set_buffer_flush_size(&self, size: usize) -> &Self {
        self.shared.scalars.set_buffer_flush_size(size);
        if let Some(wake) = &self.wake {
            let _ = wake.try_send(());
        }
        self
    }

    pub fn file_rotation_size(&self) -> u64 {
        self.shared.scalars.file_rotation_size()
    }

    pub fn set_file_rotation_size(&self, size: u64) -> &Self {
        self.shared.scalars.set_file_rotation_size(size);
        self
    }

    pub fn file_rotation_limit(&self) -> usize {
        self.shared.scalars.file_rotation_limit()
    }

    pub fn set_file_rotation_limit(&self, limit: usize) -> &Self {
        self.shared.scalars.set_file_rotation_limit(limit);
        self
    }

    /// Records dropped because their buffer was at capacity.
    pub fn discarded_count(&self) -> u64 {
        self.shared.scalars.discarded_count()
    }

    pub fn reset_discarded_count(&self) -> &Self {
        self.shared.scalars.reset_discarded_count();
        self
    }

    pub fn timestamp_width(&self) -> usize {
        self.shared.scalars.timestamp_width()
    }

    pub fn set_timestamp_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_timestamp_width(width);
        self
    }

    pub fn process_id_width(&self) -> usize {
        self.shared.scalars.process_id_width()
    }

    pub fn set_process_id_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_process_id_width(width);
        self
    }

    pub fn thread_id_width(&self) -> usize {
        self.shared.scalars.thread_id_width()
    }

    pub fn set_thread_id_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_thread_id_width(width);
        self
    }

    pub fn file_name_width(&self) -> usize {
        self.shared.scalars.file_name_width()
    }

    pub fn set_file_name_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_file_name_width(width);
        self
    }

    pub fn line_width(&self) -> usize {
        self.shared.scalars.line_width()
    }

    pub fn set_line_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_line_width(width);
        self
    }

    pub fn function_width(&self) -> usize {
        self.shared.scalars.function_width()
    }

    pub fn set_function_width(&self, width: usize) -> &Self {
        self.shared.scalars.set_function_width(width);
        self
    }

    pub fn separator(&self) -> String {
        self.shared.text.lock().separator.clone()
    }

    pub fn set_separator(&self, separator: impl Into<String>) -> &Self {
        self.shared.text.lock().separator = separator.into();
        self
    }

    pub fn header_underline_separator(&self) -> String {
        self.shared.text.lock().header_underline_separator.clone()
    }

    pub fn set_header_underline_separator(&self, separator: impl Into<String>) -> &Self {
        self.shared.text.lock().header_underline_separator = separator.into();
        self
    }

    pub fn timestamp_format(&self) -> String {
        self.shared.text.lock().timestamp_format.clone()
    }

    pub fn set_timestamp_format(&self, format: impl Into<String>) -> &Self {
        self.shared.text.lock().timestamp_format = format.into();
        self
    }

    pub fn timestamp_header(&self) -> String {
        self.shared.text.lock().timestamp_header.clone()
    }

    pub fn set_timestamp_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().timestamp_header = header.into();
        self
    }

    pub fn process_id_header(&self) -> String {
        self.shared.text.lock().process_id_header.clone()
    }

    pub fn set_process_id_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().process_id_header = header.into();
        self
    }

    pub fn thread_id_header(&self) -> String {
        self.shared.text.lock().thread_id_header.clone()
    }

    pub fn set_thread_id_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().thread_id_header = header.into();
        self
    }

    pub fn file_name_header(&self) -> String {
        self.shared.text.lock().file_name_header.clone()
    }

    pub fn set_file_name_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().file_name_header = header.into();
        self
    }

    pub fn line_header(&self) -> String {
        self.shared.text.lock().line_header.clone()
    }

    pub fn set_line_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().line_header = header.into();
        self
    }

    pub fn function_header(&self) -> String {
        self.shared.text.lock().function_header.clone()
    }

    pub fn set_function_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().function_header = header.into();
        self
    }

    pub fn message_header(&self) -> String {
        self.shared.text.lock().message_header.clone()
    }

    pub fn set_message_header(&self, header: impl Into<String>) -> &Self {
        self.shared.text.lock().message_header = header.into();
        self
    }

    pub fn metadata_columns(&self) -> Vec<MetadataColumn> {
        self.shared.text.lock().columns.clone()
    }

    pub fn set_metadata_columns(&self, columns: Vec<MetadataColumn>) -> &Self {
        self.shared.text.lock().columns = columns;
        self
    }

    /// Stop the engine: stop accepting records, join the worker, then
    /// synchronously drain every remaining buffer on this thread.
    ///
    /// A write failure during the final drain is terminal for that
    /// file's pending records; there is no further retry. Called
    /// automatically on drop.
    pub fn shutdown(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);

        // Disconnecting the wake channel wakes the worker even when no
        // signal is queued.
        drop(self.wake.take());

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        let writer = FileWriter::new(&self.shared.scalars, &self.shared.text, self.process_id);
        let mut files = self.shared.files.lock();

        for (name, entry) in files.iter_mut() {
            if entry.buffer.is_empty() {
                continue;
            }

            let records: Vec<LogRecord> = entry.buffer.iter().cloned().collect();
            let mut target = FileTarget {
                name: name.clone(),
                path: entry.path.clone(),
                dirs_created: entry.dirs_created,
            };

            if writer.write_range(&mut target, &records).is_ok() {
                entry.buffer.drain(..records.len());
            }

            entry.path = target.path;
            entry.dirs_created = target.dirs_created;
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The flush scheduler loop.
///
/// Two states: waiting on the wake channel (with a timeout standing in
/// for the periodic scan), and scanning the file table. A scan that
/// flushed something re-scans immediately to drain bursts; a scan that
/// found nothing, or only failed writes, goes back to waiting so a
/// persistently failing file retries at the scan interval instead of
/// spinning.
fn run_worker(shared: &Shared, wake: &Receiver<()>, process_id: u32) {
    let mut should_wait = false;

    loop {
        if should_wait {
            match wake.recv_timeout(SCAN_INTERVAL) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            should_wait = false;
        }

        if !shared.running.load(Ordering::SeqCst) {
            break;
        }

        should_wait = !scan_once(shared, process_id);
    }
}

/// One pass over the file table; returns whether anything was flushed.
///
/// The buffer prefix present at snapshot time is cloned out under the
/// lock and written with the lock released; producers can only append
/// behind it. On success exactly that prefix is drained; on failure it
/// stays buffered for the next cycle.
fn scan_once(shared: &Shared, process_id: u32) -> bool {
    let writer = FileWriter::new(&shared.scalars, &shared.text, process_id);
    let names: Vec<String> = shared.files.lock().keys().cloned().collect();
    let mut flushed = false;

    for name in names {
        let snapshot = {
            let files = shared.files.lock();
            files.get(&name).and_then(|entry| {
                let flush_size = shared.scalars.buffer_flush_size();
                if entry.buffer.is_empty() || entry.buffer.len() < flush_size {
                    None
                } else {
                    Some((
                        entry.buffer.iter().cloned().collect::<Vec<LogRecord>>(),
                        FileTarget {
                            name: name.clone(),
                            path: entry.path.clone(),
                            dirs_created: entry.dirs_created,
                        },
                    ))
                }
            })
        };

        let Some((records, mut target)) = snapshot else {
            continue;
        };

        let written = writer.write_range(&mut target, &records).is_ok();

        let mut files = shared.files.lock();
        if let Some(entry) = files.get_mut(&name) {
            // Resolved path and directory state survive failed writes.
            entry.path = target.path;
            entry.dirs_created = target.dirs_created;

            if written {
                entry.buffer.drain(..records.len());
                flushed = true;
            }
        }
    }

    flushed
}

/// A `fmt::Write` sink that accepts at most `max_size` bytes and
/// silently ignores the rest, cutting on a char boundary.
struct BoundedMessage {
    buffer: String,
    max_size: usize,
}

impl BoundedMessage {
    fn new(max_size: usize) -> Self {
        Self {
            buffer: String::new(),
            max_size,
        }
    }

    fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Write for BoundedMessage {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.max_size.saturating_sub(self.buffer.len());
        if remaining == 0 {
            return Ok(());
        }

        if s.len() <= remaining {
            self.buffer.push_str(s);
        } else {
            let mut end = remaining;
            while end > 0 && !s.is_char_boundary(end) {
                end -= 1;
            }
            self.buffer.push_str(&s[..end]);
        }

        Ok(())
    }
}
