//! Locating result files on disk.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Default extension of calculation result files.
pub const DEFAULT_EXTENSION: &str = "cprj";

/// Expand inputs into a list of result files.
///
/// Files are taken as given. Directories are walked recursively, sorted by
/// name, keeping files whose extension matches `extension`
/// case-insensitively. Anything else is reported and ignored.
pub fn discover_files(inputs: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        if has_extension(entry.path(), extension) {
                            files.push(entry.into_path());
                        }
                    }
                    Ok(_) => {}
                    Err(err) => warn!("Cannot read {}: {}", input.display(), err),
                }
            }
        } else {
            warn!("File not found: {}", input.display());
        }
    }

    files
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
