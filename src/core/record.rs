//! Log record structure

use super::level::Level;
use std::cell::RefCell;
use std::path::Path;

// Thread-local cache for the thread id string to avoid repeated formatting
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get the cached thread id token, computing and caching it on first access
pub(crate) fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            // ThreadId has no stable numeric accessor; its Debug form is
            // "ThreadId(N)", so keep just the digits as the token.
            let raw = format!("{:?}", std::thread::current().id());
            let token: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            *cache = Some(if token.is_empty() { raw } else { token });
        }
        cache
            .as_ref()
            .expect("thread id cache initialized in previous line")
            .clone()
    })
}

/// One buffered log entry.
///
/// Records are immutable once created: they are appended to a file
/// buffer by a producer, later serialized by the writer, and dropped
/// after a successful write. The timestamp is rendered at creation time
/// so that it reflects the moment of the call, not the moment of the
/// flush.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: String,
    pub thread_id: String,
    pub level: Level,
    /// Basename of the source file, without directories.
    pub source_file: String,
    pub source_line: u32,
    pub source_function: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(
        timestamp: String,
        level: Level,
        source_file_path: &str,
        source_line: u32,
        source_function: &str,
        message: String,
    ) -> Self {
        Self {
            timestamp,
            thread_id: current_thread_id(),
            level,
            source_file: file_basename(source_file_path),
            source_line,
            source_function: source_function.to_string(),
            message,
        }
    }
}

/// Strip any directory components from a source path.
fn file_basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
