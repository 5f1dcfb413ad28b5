use std::path::{Component, Path, PathBuf};

use crate::duplicates::DuplicateIndex;
use crate::entry::{ArchiveHandle, Entry};
use crate::error::{Error, Result};
use crate::path;
use crate::query::{Query, QueryMode};

/// Where one matched entry lands on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPlan {
    pub directory: PathBuf,
    pub file_name: String,
    /// Whether `directory` includes the owning archive's name.
    pub archive_qualified: bool,
}

impl OutputPlan {
    pub fn target(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Target for a decoded output with its own name.
    /// Falls back to the planned file name when `name` has no usable last segment.
    pub fn target_named(&self, name: &str) -> PathBuf {
        let normalized = path::normalize(name);
        match path::basename(&normalized) {
            "" | "." | ".." => self.target(),
            base => self.directory.join(base),
        }
    }
}

/// Lay out `entry` under `root`.
///
/// `{root}[/{archive}][/{subfolders}]/{file name}`: the archive directory is
/// added only for paths present in several archives, and subfolders only
/// when a folder query matched the entry below its prefix.
pub fn plan(
    root: &Path,
    entry: &Entry,
    archive: &ArchiveHandle,
    query: &Query,
    duplicates: &DuplicateIndex,
) -> OutputPlan {
    let mut directory = root.to_path_buf();

    let archive_qualified = duplicates.contains(&entry.normalized_path);
    if archive_qualified {
        directory.push(&archive.name);
    }

    if query.mode() == QueryMode::FolderPrefix {
        for segment in path::subfolders(&entry.display_path, query.depth()) {
            if !segment.is_empty() {
                directory.push(segment);
            }
        }
    }

    OutputPlan {
        directory,
        file_name: entry.physical_name.clone(),
        archive_qualified,
    }
}

/// Fail unless `target` lies strictly below `root` through plain segments only.
pub fn ensure_within(root: &Path, target: &Path) -> Result<()> {
    let inside = target.strip_prefix(root).is_ok_and(|rel| {
        rel.components().next().is_some()
            && rel.components().all(|c| matches!(c, Component::Normal(_)))
    });
    if !inside {
        return Err(Error::OutsideOutputRoot {
            target: target.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    Ok(())
}
