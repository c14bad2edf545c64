//! Input discovery - finds transcript candidates below a root directory

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Extension of input files (case-sensitive)
pub const INPUT_EXTENSION: &str = "json";

/// Input files sharing one containing directory
#[derive(Debug, Clone)]
pub struct DirGroup {
    /// Containing directory
    pub dir: PathBuf,
    /// Files in enumeration order
    pub files: Vec<PathBuf>,
}

/// Check whether a path has the input extension
pub fn is_input_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(INPUT_EXTENSION))
}

fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Recursively collect input files grouped by directory
///
/// Entries are visited in file-name order so repeated runs see the same
/// sequence. Symlinked directories are not descended into, but a symlink to a
/// regular file counts as an input. Unreadable subdirectories are logged and
/// skipped; only a failure on the root itself is returned.
pub fn scan_dir<P: AsRef<Path>>(root: P) -> Result<Vec<DirGroup>> {
    let root = root.as_ref();
    let mut groups: Vec<DirGroup> = Vec::new();
    let mut group_index: HashMap<PathBuf, usize> = HashMap::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !is_regular_file(&entry) || !is_input_file(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let dir = path.parent().unwrap_or(root).to_path_buf();
        let idx = *group_index.entry(dir.clone()).or_insert_with(|| {
            groups.push(DirGroup {
                dir,
                files: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].files.push(path);
    }

    tracing::debug!(
        "Found {} input files in {} directories under {:?}",
        groups.iter().map(|g| g.files.len()).sum::<usize>(),
        groups.len(),
        root
    );
    Ok(groups)
}
