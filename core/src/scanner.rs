use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ConvertError;
use crate::format::Format;

/// Collect every file under `root` whose extension is exactly `format`'s
/// (case-sensitive). Subdirectories are walked recursively.
///
/// Any unreadable entry fails the whole scan.
pub fn scan(root: &Path, format: Format) -> Result<Vec<PathBuf>, ConvertError> {
    let files: Result<Vec<_>, _> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    return Some(Err(ConvertError::Traversal {
                        root: root.to_path_buf(),
                        source: e,
                    }))
                }
            };
            if entry.file_type().is_dir() {
                return None;
            }
            let path = entry.into_path();
            if format.matches(&path) {
                Some(Ok(path))
            } else {
                None
            }
        })
        .collect();

    let files = files?;
    log::debug!(
        "Found {} file(s) matching {} under {}",
        files.len(),
        format.extension(),
        root.display()
    );
    Ok(files)
}
