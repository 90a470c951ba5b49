//! Numbered-backup file rotation
//!
//! Backups follow the classic logrotate naming scheme: for a log file
//! `app.log`, backups are `app_1.log`, `app_2.log`, ... with `app.log`
//! always holding the newest data and higher indices holding older data.

use crate::core::error::{LoggerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Rotate `path` out of the way, pruning backups beyond the retention
/// limit and shifting the survivors up by one index.
///
/// Enumeration stops at the first gap in the numbering, so stray files
/// with higher indices left behind by an earlier configuration are not
/// touched. A retention limit of 0 simply deletes the current file.
pub(crate) fn rotate_file(path: &Path, retention_limit: usize) -> Result<()> {
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    // Walk the numbered sequence: indices within the limit survive,
    // indices at or beyond it are deleted outright.
    let mut surviving = 0usize;
    let mut index = 0usize;
    loop {
        let candidate = numbered_path(&parent, &stem, &extension, index);
        if !candidate.exists() {
            break;
        }

        if index < retention_limit {
            surviving += 1;
        } else {
            fs::remove_file(&candidate).map_err(|e| {
                LoggerError::file_rotation(
                    candidate.display().to_string(),
                    format!("Failed to remove backup beyond retention limit: {}", e),
                )
            })?;
        }

        index += 1;
    }

    // Shift survivors upward, highest index first, leaving the base
    // path free for new writes.
    for i in (1..=surviving).rev() {
        let from = numbered_path(&parent, &stem, &extension, i - 1);
        let to = numbered_path(&parent, &stem, &extension, i);

        fs::rename(&from, &to).map_err(|e| {
            LoggerError::file_rotation(
                from.display().to_string(),
                format!("Failed to shift backup to '{}': {}", to.display(), e),
            )
        })?;
    }

    Ok(())
}

/// `stem.ext` for index 0, `stem_N.ext` otherwise.
fn numbered_path(parent: &Path, stem: &str, extension: &str, index: usize) -> PathBuf {
    let name = if index == 0 {
        format!("{}{}", stem, extension)
    } else {
        format!("{}_{}{}", stem, index, extension)
    };
    parent.join(name)
}
