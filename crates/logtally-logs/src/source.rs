use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TallyError};

/// List the log files in `input_dir`, sorted by file name.
///
/// Only regular files are returned. With `extension` set, files with any other
/// extension are skipped (compared case-insensitively, without the dot).
pub fn discover(input_dir: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(TallyError::MissingInputDirectory(input_dir.to_path_buf()));
    }

    let entries = fs::read_dir(input_dir).map_err(|e| TallyError::read(input_dir, e))?;
    let mut paths = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| TallyError::read(input_dir, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| TallyError::read(&path, e))?;
        // Follow symlinks so a linked log file still counts as a file
        if !(file_type.is_file() || (file_type.is_symlink() && path.is_file())) {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }

        if let Some(wanted) = extension {
            let wanted = wanted.trim_start_matches('.');
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
            if !matches {
                warn!(file = %display_name(&path), "Skipping file without .{} extension", wanted);
                continue;
            }
        }

        paths.push(path);
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Read a whole file as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| TallyError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(file = %display_name(path), "File is not valid UTF-8; invalid bytes replaced");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// File name used in logs and error messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
