//! Engine configuration
//!
//! Configuration is split in two, matching how it is accessed:
//!
//! - [`ScalarConfig`] holds numeric and boolean knobs as independent
//!   atomics. Producers read the level threshold on every call, so these
//!   reads must never contend with the file-table lock.
//! - [`TextConfig`] holds strings and the ordered column list behind one
//!   mutex; they are read and written as a unit by the writer.

use super::level::{Level, LevelFormat};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering};

pub const DEFAULT_BUFFER_MAX_SIZE: usize = 0; // 0 means unlimited
pub const DEFAULT_BUFFER_FLUSH_SIZE: usize = 1;
pub const DEFAULT_FILE_ROTATION_SIZE: u64 = 0; // 0 means no rotation (in bytes)
pub const DEFAULT_FILE_ROTATION_LIMIT: usize = 1;
pub const DEFAULT_HEADER_UNDERLINE_FILL: char = '-';

pub const DEFAULT_TIMESTAMP_WIDTH: usize = 24;
pub const DEFAULT_PROCESS_ID_WIDTH: usize = 6;
pub const DEFAULT_THREAD_ID_WIDTH: usize = 6;
pub const DEFAULT_FILE_NAME_WIDTH: usize = 20;
pub const DEFAULT_LINE_WIDTH: usize = 6;
pub const DEFAULT_FUNCTION_WIDTH: usize = 20;

pub const DEFAULT_SEPARATOR: &str = " | ";
pub const DEFAULT_HEADER_UNDERLINE_SEPARATOR: &str = "-+-";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%.4S";

/// One structured field prepended to the message column.
///
/// The message itself is always the last column and cannot be disabled;
/// everything else is selectable and ordered through
/// [`TextConfig::columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataColumn {
    Timestamp,
    ProcessId,
    ThreadId,
    Level,
    FileName,
    Line,
    Function,
}

impl MetadataColumn {
    /// Default column order: every metadata column, source info last.
    pub fn all() -> Vec<MetadataColumn> {
        vec![
            MetadataColumn::Timestamp,
            MetadataColumn::ProcessId,
            MetadataColumn::ThreadId,
            MetadataColumn::Level,
            MetadataColumn::FileName,
            MetadataColumn::Line,
            MetadataColumn::Function,
        ]
    }
}

/// Lock-free scalar knobs plus the process-wide discard counter.
#[derive(Debug)]
pub(crate) struct ScalarConfig {
    level: AtomicU8,
    level_format: AtomicU8,
    create_dirs: AtomicBool,
    write_header: AtomicBool,
    write_header_underline: AtomicBool,
    header_underline_fill: AtomicU32,
    buffer_max_size: AtomicUsize,
    buffer_flush_size: AtomicUsize,
    file_rotation_size: AtomicU64,
    file_rotation_limit: AtomicUsize,
    discarded: AtomicU64,
    timestamp_width: AtomicUsize,
    process_id_width: AtomicUsize,
    thread_id_width: AtomicUsize,
    file_name_width: AtomicUsize,
    line_width: AtomicUsize,
    function_width: AtomicUsize,
}

impl ScalarConfig {
    pub fn new() -> Self {
        Self {
            level: AtomicU8::new(Level::Verbose as u8),
            level_format: AtomicU8::new(LevelFormat::Full as u8),
            create_dirs: AtomicBool::new(true),
            write_header: AtomicBool::new(true),
            write_header_underline: AtomicBool::new(true),
            header_underline_fill: AtomicU32::new(DEFAULT_HEADER_UNDERLINE_FILL as u32),
            buffer_max_size: AtomicUsize::new(DEFAULT_BUFFER_MAX_SIZE),
            buffer_flush_size: AtomicUsize::new(DEFAULT_BUFFER_FLUSH_SIZE),
            file_rotation_size: AtomicU64::new(DEFAULT_FILE_ROTATION_SIZE),
            file_rotation_limit: AtomicUsize::new(DEFAULT_FILE_ROTATION_LIMIT),
            discarded: AtomicU64::new(0),
            timestamp_width: AtomicUsize::new(DEFAULT_TIMESTAMP_WIDTH),
            process_id_width: AtomicUsize::new(DEFAULT_PROCESS_ID_WIDTH),
            thread_id_width: AtomicUsize::new(DEFAULT_THREAD_ID_WIDTH),
            file_name_width: AtomicUsize::new(DEFAULT_FILE_NAME_WIDTH),
            line_width: AtomicUsize::new(DEFAULT_LINE_WIDTH),
            function_width: AtomicUsize::new(DEFAULT_FUNCTION_WIDTH),
        }
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level_format(&self) -> LevelFormat {
        LevelFormat::from_u8(self.level_format.load(Ordering::Relaxed))
    }

    pub fn set_level_format(&self, format: LevelFormat) {
        self.level_format.store(format as u8, Ordering::Relaxed);
    }

    pub fn create_dirs(&self) -> bool {
        self.create_dirs.load(Ordering::Relaxed)
    }

    pub fn set_create_dirs(&self, value: bool) {
        self.create_dirs.store(value, Ordering::Relaxed);
    }

    pub fn write_header(&self) -> bool {
        self.write_header.load(Ordering::Relaxed)
    }

    pub fn set_write_header(&self, value: bool) {
        self.write_header.store(value, Ordering::Relaxed);
    }

    pub fn write_header_underline(&self) -> bool {
        self.write_header_underline.load(Ordering::Relaxed)
    }

    pub fn set_write_header_underline(&self, value: bool) {
        self.write_header_underline.store(value, Ordering::Relaxed);
    }

    pub fn header_underline_fill(&self) -> char {
        char::from_u32(self.header_underline_fill.load(Ordering::Relaxed))
            .unwrap_or(DEFAULT_HEADER_UNDERLINE_FILL)
    }

    pub fn set_header_underline_fill(&self, fill: char) {
        self.header_underline_fill.store(fill as u32, Ordering::Relaxed);
    }

    pub fn buffer_max_size(&self) -> usize {
        self.buffer_max_size.load(Ordering::Relaxed)
    }

    pub fn set_buffer_max_size(&self, size: usize) {
        self.buffer_max_size.store(size, Ordering::Relaxed);
    }

    pub fn buffer_flush_size(&self) -> usize {
        self.buffer_flush_size.load(Ordering::Relaxed)
    }

    pub fn set_buffer_flush_size(&self, size: usize) {
        self.buffer_flush_size.store(size, Ordering::Relaxed);
    }

    pub fn file_rotation_size(&self) -> u64 {
        self.file_rotation_size.load(Ordering::Relaxed)
    }

    pub fn set_file_rotation_size(&self, size: u64) {
        self.file_rotation_size.store(size, Ordering::Relaxed);
    }

    pub fn file_rotation_limit(&self) -> usize {
        self.file_rotation_limit.load(Ordering::Relaxed)
    }

    pub fn set_file_rotation_limit(&self, limit: usize) {
        self.file_rotation_limit.store(limit, Ordering::Relaxed);
    }

    pub fn discarded_count(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    pub fn reset_discarded_count(&self) {
        self.discarded.store(0, Ordering::Relaxed);
    }

    pub fn timestamp_width(&self) -> usize {
        self.timestamp_width.load(Ordering::Relaxed)
    }

    pub fn set_timestamp_width(&self, width: usize) {
        self.timestamp_width.store(width, Ordering::Relaxed);
    }

    pub fn process_id_width(&self) -> usize {
        self.process_id_width.load(Ordering::Relaxed)
    }

    pub fn set_process_id_width(&self, width: usize) {
        self.process_id_width.store(width, Ordering::Relaxed);
    }

    pub fn thread_id_width(&self) -> usize {
        self.thread_id_width.load(Ordering::Relaxed)
    }

    pub fn set_thread_id_width(&self, width: usize) {
        self.thread_id_width.store(width, Ordering::Relaxed);
    }

    pub fn file_name_width(&self) -> usize {
        self.file_name_width.load(Ordering::Relaxed)
    }

    pub fn set_file_name_width(&self, width: usize) {
        self.file_name_width.store(width, Ordering::Relaxed);
    }

    pub fn line_width(&self) -> usize {
        self.line_width.load(Ordering::Relaxed)
    }

    pub fn set_line_width(&self, width: usize) {
        self.line_width.store(width, Ordering::Relaxed);
    }

    pub fn function_width(&self) -> usize {
        self.function_width.load(Ordering::Relaxed)
    }

    pub fn set_function_width(&self, width: usize) {
        self.function_width.store(width, Ordering::Relaxed);
    }
}

impl Default for ScalarConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// String-valued configuration, guarded as a unit.
#[derive(Debug, Clone)]
pub(crate) struct TextConfig {
    pub separator: String,
    pub header_underline_separator: String,
    pub timestamp_format: String,
    pub timestamp_header: String,
    pub process_id_header: String,
    pub thread_id_header: String,
    pub file_name_header: String,
    pub line_header: String,
    pub function_header: String,
    pub message_header: String,
    pub columns: Vec<MetadataColumn>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            header_underline_separator: DEFAULT_HEADER_UNDERLINE_SEPARATOR.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            timestamp_header: "Timestamp".to_string(),
            process_id_header: "PID".to_string(),
            thread_id_header: "TID".to_string(),
            file_name_header: "File Name".to_string(),
            line_header: "Line".to_string(),
            function_header: "Function".to_string(),
            message_header: "Message".to_string(),
            columns: MetadataColumn::all(),
        }
    }
}

/// A partial configuration snapshot for [`crate::Logger::configure`].
///
/// Every recognized option appears as an `Option`; unset fields leave
/// the current value untouched, so a snapshot can adjust one knob or
/// replace the whole surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    pub level: Option<Level>,
    pub level_format: Option<LevelFormat>,
    pub create_dirs: Option<bool>,
    pub write_header: Option<bool>,
    pub write_header_underline: Option<bool>,
    pub header_underline_fill: Option<char>,
    pub buffer_max_size: Option<usize>,
    pub buffer_flush_size: Option<usize>,
    pub file_rotation_size: Option<u64>,
    pub file_rotation_limit: Option<usize>,
    pub timestamp_width: Option<usize>,
    pub process_id_width: Option<usize>,
    pub thread_id_width: Option<usize>,
    pub file_name_width: Option<usize>,
    pub line_width: Option<usize>,
    pub function_width: Option<usize>,
    pub separator: Option<String>,
    pub header_underline_separator: Option<String>,
    pub timestamp_format: Option<String>,
    pub timestamp_header: Option<String>,
    pub process_id_header: Option<String>,
    pub thread_id_header: Option<String>,
    pub file_name_header: Option<String>,
    pub line_header: Option<String>,
    pub function_header: Option<String>,
    pub message_header: Option<String>,
    pub metadata_columns: Option<Vec<MetadataColumn>>,
}
