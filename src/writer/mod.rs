//! File output
//!
//! The writer receives a frozen range of records from the flush
//! scheduler and turns it into durable, columnar plain text. It owns
//! path resolution, one-time directory creation, the header row on
//! fresh files and size-based rotation. Any failure here is reported
//! back to the scheduler, which keeps the records buffered and retries
//! on its next cycle.

mod rotation;

use crate::core::config::{MetadataColumn, ScalarConfig, TextConfig};
use crate::core::error::{LoggerError, Result};
use crate::core::level::Level;
use crate::core::record::LogRecord;
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-file state carried between flushes.
///
/// The resolved path and directory-creation flag live in the file
/// table; the scheduler hands them to the writer by value and stores
/// them back after the write so partial progress (a resolved path, a
/// created directory tree) survives a failed flush.
#[derive(Debug)]
pub(crate) struct FileTarget {
    pub name: String,
    pub path: Option<PathBuf>,
    pub dirs_created: bool,
}

pub(crate) struct FileWriter<'a> {
    scalars: &'a ScalarConfig,
    text: &'a Mutex<TextConfig>,
    process_id: u32,
}

impl<'a> FileWriter<'a> {
    pub fn new(scalars: &'a ScalarConfig, text: &'a Mutex<TextConfig>, process_id: u32) -> Self {
        Self {
            scalars,
            text,
            process_id,
        }
    }

    /// Append a contiguous range of records to the target file.
    ///
    /// The file is opened per flush. Each record re-checks the rotation
    /// threshold first, so a range spanning the threshold rotates
    /// mid-flush; the header is written whenever the file is empty at
    /// that point.
    pub fn write_range(&self, target: &mut FileTarget, records: &[LogRecord]) -> Result<()> {
        let path = match target.path.clone() {
            Some(path) => path,
            None => {
                let resolved =
                    std::path::absolute(Path::new(&target.name)).map_err(|e| {
                        LoggerError::io_operation(
                            "resolving log path",
                            format!("Failed to resolve '{}'", target.name),
                            e,
                        )
                    })?;
                target.path = Some(resolved.clone());
                resolved
            }
        };

        if self.scalars.create_dirs() && !target.dirs_created {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "creating log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
            target.dirs_created = true;
        }

        let rotation_size = self.scalars.file_rotation_size();
        let write_header = self.scalars.write_header();

        let (mut writer, mut size) = open_append(&path)?;

        for record in records {
            if rotation_size != 0 && rotation_size <= size {
                writer.flush().map_err(|e| {
                    LoggerError::file_rotation(
                        path.display().to_string(),
                        format!("Failed to flush before rotation: {}", e),
                    )
                })?;
                drop(writer);

                rotation::rotate_file(&path, self.scalars.file_rotation_limit())?;

                let reopened = open_append(&path)?;
                writer = reopened.0;
                size = reopened.1;
            }

            if write_header && size == 0 {
                let header = self.render_header();
                writer.write_all(header.as_bytes()).map_err(|e| {
                    LoggerError::file_write(
                        path.display().to_string(),
                        format!("Failed to write header: {}", e),
                    )
                })?;
                size += header.len() as u64;
            }

            let line = self.render_row(record);
            writer.write_all(line.as_bytes()).map_err(|e| {
                LoggerError::file_write(
                    path.display().to_string(),
                    format!("Failed to write log record: {}", e),
                )
            })?;
            size += line.len() as u64;
        }

        writer.flush().map_err(|e| {
            LoggerError::file_write(
                path.display().to_string(),
                format!("Failed to flush: {}", e),
            )
        })?;

        Ok(())
    }

    /// Render one record as a single line in the configured column
    /// layout. File name and function are truncated to their widths;
    /// the other fields pad but never truncate.
    fn render_row(&self, record: &LogRecord) -> String {
        let text = self.text.lock();
        let mut line = String::new();

        for column in &text.columns {
            match column {
                MetadataColumn::Timestamp => {
                    pad_field(&mut line, &record.timestamp, self.scalars.timestamp_width());
                }
                MetadataColumn::ProcessId => {
                    pad_field(
                        &mut line,
                        &self.process_id.to_string(),
                        self.scalars.process_id_width(),
                    );
                }
                MetadataColumn::ThreadId => {
                    pad_field(&mut line, &record.thread_id, self.scalars.thread_id_width());
                }
                MetadataColumn::Level => {
                    line.push_str(record.level.render(self.scalars.level_format()));
                }
                MetadataColumn::FileName => {
                    let width = self.scalars.file_name_width();
                    pad_field(&mut line, truncate_chars(&record.source_file, width), width);
                }
                MetadataColumn::Line => {
                    pad_field(
                        &mut line,
                        &record.source_line.to_string(),
                        self.scalars.line_width(),
                    );
                }
                MetadataColumn::Function => {
                    let width = self.scalars.function_width();
                    pad_field(
                        &mut line,
                        truncate_chars(&record.source_function, width),
                        width,
                    );
                }
            }
            line.push_str(&text.separator);
        }

        line.push_str(&record.message);
        line.push('\n');
        line
    }

    /// Render the header row, plus the underline row when enabled. The
    /// level column takes the width of its rendered header text; the
    /// message column closes both rows.
    fn render_header(&self) -> String {
        let text = self.text.lock();
        let level_header = Level::Header.render(self.scalars.level_format());
        let mut out = String::new();

        for column in &text.columns {
            match column {
                MetadataColumn::Timestamp => {
                    pad_field(&mut out, &text.timestamp_header, self.scalars.timestamp_width());
                }
                MetadataColumn::ProcessId => {
                    pad_field(
                        &mut out,
                        &text.process_id_header,
                        self.scalars.process_id_width(),
                    );
                }
                MetadataColumn::ThreadId => {
                    pad_field(&mut out, &text.thread_id_header, self.scalars.thread_id_width());
                }
                MetadataColumn::Level => out.push_str(level_header),
                MetadataColumn::FileName => {
                    pad_field(&mut out, &text.file_name_header, self.scalars.file_name_width());
                }
                MetadataColumn::Line => {
                    pad_field(&mut out, &text.line_header, self.scalars.line_width());
                }
                MetadataColumn::Function => {
                    pad_field(&mut out, &text.function_header, self.scalars.function_width());
                }
            }
            out.push_str(&text.separator);
        }

        out.push_str(&text.message_header);
        out.push('\n');

        if self.scalars.write_header_underline() {
            let fill = self.scalars.header_underline_fill();

            for column in &text.columns {
                let width = match column {
                    MetadataColumn::Timestamp => self.scalars.timestamp_width(),
                    MetadataColumn::ProcessId => self.scalars.process_id_width(),
                    MetadataColumn::ThreadId => self.scalars.thread_id_width(),
                    MetadataColumn::Level => level_header.chars().count(),
                    MetadataColumn::FileName => self.scalars.file_name_width(),
                    MetadataColumn::Line => self.scalars.line_width(),
                    MetadataColumn::Function => self.scalars.function_width(),
                };
                out.extend(std::iter::repeat(fill).take(width));
                out.push_str(&text.header_underline_separator);
            }

            out.extend(std::iter::repeat(fill).take(text.message_header.chars().count()));
            out.push('\n');
        }

        out
    }
}

fn open_append(path: &Path) -> Result<(BufWriter<File>, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_write(
                path.display().to_string(),
                format!("Failed to open for append: {}", e),
            )
        })?;

    let size = file
        .metadata()
        .map_err(|e| {
            LoggerError::file_write(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?
        .len();

    Ok((BufWriter::new(file), size))
}

/// Left-justify `value` to `width` characters; wider values are
/// written in full.
fn pad_field(out: &mut String, value: &str, width: usize) {
    let _ = write!(out, "{:<width$}", value);
}

/// Cut `value` to at most `width` characters on a char boundary.
fn truncate_chars(value: &str, width: usize) -> &str {
    match value.char_indices().nth(width) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}
