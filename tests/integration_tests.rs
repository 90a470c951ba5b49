//! Integration tests for the logging engine
//!
//! These tests verify:
//! - Per-file FIFO order preservation
//! - Level threshold filtering
//! - Bounded-buffer overflow accounting
//! - Flush-size and shutdown drain behaviour
//! - Size-based rotation with numbered backups
//! - Header idempotence and column layout

use async_file_logger::{Level, LevelFormat, Logger, LoggerOptions, MetadataColumn};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}

fn lines_of(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// The message column is last; strip everything before it.
fn message_of(line: &str, separator: &str) -> String {
    match line.rfind(separator) {
        Some(index) => line[index + separator.len()..].to_string(),
        None => line.to_string(),
    }
}

#[test]
fn test_order_preserved_within_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("order.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(1000);

    for i in 0..100 {
        logger.write(
            &name,
            Level::Info,
            file!(),
            line!(),
            module_path!(),
            format!("message {:03}", i),
        );
    }

    logger.shutdown();

    let lines = lines_of(&log_file);
    assert_eq!(lines.len(), 100);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(message_of(line, " | "), format!("message {:03}", i));
    }
}

#[test]
fn test_level_threshold_filtering() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("levels.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger
        .set_write_header(false)
        .set_buffer_flush_size(1000)
        .set_level(Level::Warning);

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "info message");
    logger.write(&name, Level::Error, file!(), line!(), module_path!(), "error message");
    logger.write(&name, Level::None, file!(), line!(), module_path!(), "none message");
    logger.write(&name, Level::Verbose, file!(), line!(), module_path!(), "verbose message");
    logger.write(&name, Level::Fatal, file!(), line!(), module_path!(), "fatal message");

    logger.shutdown();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(!content.contains("info message"));
    assert!(!content.contains("verbose message"));
    assert!(content.contains("error message"));
    assert!(content.contains("none message"));
    assert!(content.contains("fatal message"));
}

#[test]
fn test_off_disables_logging_entirely() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("off.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.set_level(Level::Off);

    logger.write(&name, Level::Fatal, file!(), line!(), module_path!(), "fatal message");
    logger.write(&name, Level::None, file!(), line!(), module_path!(), "none message");

    logger.shutdown();

    assert!(!log_file.exists());
}

#[test]
fn test_overflow_boundary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let name = temp_dir
        .path()
        .join("overflow.log")
        .to_string_lossy()
        .into_owned();

    let mut logger = Logger::new();
    logger
        .set_buffer_max_size(2)
        .set_buffer_flush_size(1000); // flushing effectively disabled

    for i in 0..3 {
        logger.write(
            &name,
            Level::Info,
            file!(),
            line!(),
            module_path!(),
            format!("rapid {}", i),
        );
    }

    assert_eq!(logger.discarded_count(), 1);
    logger.shutdown();
}

#[test]
fn test_flush_size_boundary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("flush.log");
    let name = log_file.to_string_lossy().into_owned();

    let logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(1);

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "first emit");
    assert!(wait_for(|| {
        lines_of(&log_file)
            .last()
            .map(|line| message_of(line, " | ") == "first emit")
            .unwrap_or(false)
    }));

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "second emit");
    assert!(wait_for(|| {
        lines_of(&log_file)
            .last()
            .map(|line| message_of(line, " | ") == "second emit")
            .unwrap_or(false)
    }));
}

#[test]
fn test_rotation_keeps_retention_limit() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("rotate.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger
        .set_write_header(false)
        .set_buffer_flush_size(1000)
        .set_file_rotation_size(100)
        .set_file_rotation_limit(2);

    // Far more than three rotations' worth of data.
    for i in 0..60 {
        logger.write(
            &name,
            Level::Info,
            file!(),
            line!(),
            module_path!(),
            format!("rotation filler message {:02}", i),
        );
    }

    logger.shutdown();

    assert!(log_file.exists());
    assert!(temp_dir.path().join("rotate_1.log").exists());
    assert!(temp_dir.path().join("rotate_2.log").exists());
    assert!(!temp_dir.path().join("rotate_3.log").exists());

    // Newest data always lands in the base file.
    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("rotation filler message 59"));
}

#[test]
fn test_header_written_exactly_once() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("header.log");
    let name = log_file.to_string_lossy().into_owned();

    let logger = Logger::new();
    logger.set_buffer_flush_size(1);

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "first");
    assert!(wait_for(|| lines_of(&log_file).len() >= 3));

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "second");
    assert!(wait_for(|| lines_of(&log_file).len() >= 4));

    let lines = lines_of(&log_file);
    let header_count = lines
        .iter()
        .filter(|line| line.contains("Timestamp") && line.contains("Message"))
        .count();
    assert_eq!(header_count, 1, "header must appear exactly once");

    // Header + underline + two data rows.
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("-+-"));
    assert!(lines[2].ends_with("first"));
    assert!(lines[3].ends_with("second"));
}

#[test]
fn test_header_disabled() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("no_header.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(1000);

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "only data");
    logger.shutdown();

    let lines = lines_of(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("only data"));
}

#[test]
fn test_shutdown_drains_all_buffers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_a = temp_dir.path().join("drain_a.log");
    let file_b = temp_dir.path().join("drain_b.log");
    let name_a = file_a.to_string_lossy().into_owned();
    let name_b = file_b.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(1000);

    for i in 0..7 {
        logger.write(
            &name_a,
            Level::Info,
            file!(),
            line!(),
            module_path!(),
            format!("a{}", i),
        );
    }
    for i in 0..3 {
        logger.write(
            &name_b,
            Level::Debug,
            file!(),
            line!(),
            module_path!(),
            format!("b{}", i),
        );
    }

    logger.shutdown();

    assert_eq!(lines_of(&file_a).len(), 7);
    assert_eq!(lines_of(&file_b).len(), 3);
}

#[test]
fn test_concurrent_producers_keep_per_file_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(16);

    std::thread::scope(|scope| {
        for thread_index in 0..5 {
            let logger = &logger;
            let name = name.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    logger.write(
                        &name,
                        Level::Info,
                        file!(),
                        line!(),
                        module_path!(),
                        format!("thread {} message {:03}", thread_index, i),
                    );
                }
            });
        }
    });

    logger.shutdown();

    let lines = lines_of(&log_file);
    assert_eq!(lines.len(), 250);

    // Within each producer, messages appear in emission order.
    for thread_index in 0..5 {
        let prefix = format!("thread {} message", thread_index);
        let own: Vec<String> = lines
            .iter()
            .map(|line| message_of(line, " | "))
            .filter(|message| message.starts_with(&prefix))
            .collect();
        assert_eq!(own.len(), 50);
        for (i, message) in own.iter().enumerate() {
            assert_eq!(message, &format!("{} {:03}", prefix, i));
        }
    }
}

#[test]
fn test_records_route_to_their_own_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let errors = temp_dir.path().join("errors.log");
    let audit = temp_dir.path().join("audit.log");

    let mut logger = Logger::new();
    logger.set_write_header(false).set_buffer_flush_size(1000);

    logger.write(
        &errors.to_string_lossy(),
        Level::Error,
        file!(),
        line!(),
        module_path!(),
        "disk failure",
    );
    logger.write(
        &audit.to_string_lossy(),
        Level::Notice,
        file!(),
        line!(),
        module_path!(),
        "user login",
    );

    logger.shutdown();

    let error_content = fs::read_to_string(&errors).expect("Failed to read errors.log");
    let audit_content = fs::read_to_string(&audit).expect("Failed to read audit.log");
    assert!(error_content.contains("disk failure"));
    assert!(!error_content.contains("user login"));
    assert!(audit_content.contains("user login"));
}

#[test]
fn test_column_layout_is_configurable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("columns.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger.configure(&LoggerOptions {
        write_header: Some(false),
        buffer_flush_size: Some(1000),
        level_format: Some(LevelFormat::Char),
        separator: Some(" ~ ".to_string()),
        metadata_columns: Some(vec![MetadataColumn::Level, MetadataColumn::Line]),
        line_width: Some(3),
        ..LoggerOptions::default()
    });

    logger.write(&name, Level::Warning, file!(), line!(), module_path!(), "compact");
    logger.shutdown();

    let lines = lines_of(&log_file);
    assert_eq!(lines.len(), 1);
    // "W ~ <line> ~ compact" with the line number padded to 3 chars.
    assert!(lines[0].starts_with("W ~ "));
    assert!(lines[0].ends_with(" ~ compact"));
}

#[test]
fn test_custom_headers_and_underline_fill() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("custom_header.log");
    let name = log_file.to_string_lossy().into_owned();

    let mut logger = Logger::new();
    logger
        .set_buffer_flush_size(1000)
        .set_header_underline_fill('=')
        .set_timestamp_header("When")
        .set_message_header("What");

    logger.write(&name, Level::Info, file!(), line!(), module_path!(), "payload");
    logger.shutdown();

    let lines = lines_of(&log_file);
    assert!(lines[0].contains("When"));
    assert!(lines[0].ends_with("What"));
    assert!(lines[1].contains("===="));
}

#[test]
fn test_discarded_count_reset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let name = temp_dir
        .path()
        .join("discard.log")
        .to_string_lossy()
        .into_owned();

    let mut logger = Logger::new();
    logger.set_buffer_max_size(1).set_buffer_flush_size(1000);

    for _ in 0..5 {
        logger.write(&name, Level::Info, file!(), line!(), module_path!(), "spam");
    }

    assert_eq!(logger.discarded_count(), 4);
    logger.reset_discarded_count();
    assert_eq!(logger.discarded_count(), 0);

    logger.shutdown();
}

#[test]
fn test_drop_performs_shutdown_drain() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("dropped.log");
    let name = log_file.to_string_lossy().into_owned();

    {
        let logger = Logger::new();
        logger.set_write_header(false).set_buffer_flush_size(1000);
        logger.write(&name, Level::Info, file!(), line!(), module_path!(), "from drop");
        // Logger drops here; the drain must still run.
    }

    let lines = lines_of(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("from drop"));
}
