//! Container reader seams.
//!
//! Reading a container format is not this crate's job: a [`ContainerReader`]
//! opens a file into an [`ArchiveSource`], which lists virtual paths and
//! yields raw bytes on demand.

use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::overlay::OverlayBuilder;

#[cfg(feature = "zip")]
pub mod zip;

/// One listed entry before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub virtual_path: String,
    pub slot: usize,
}

impl RawEntry {
    pub fn new(virtual_path: impl Into<String>, slot: usize) -> Self {
        Self {
            virtual_path: virtual_path.into(),
            slot,
        }
    }
}

/// An opened archive.
pub trait ArchiveSource {
    /// Entries in the archive's own order.
    fn entries(&mut self) -> Result<Vec<RawEntry>>;

    /// Raw bytes for a slot returned by [`ArchiveSource::entries`].
    fn read(&mut self, slot: usize) -> Result<Vec<u8>>;
}

/// Key material and version tag handed to readers at mount time.
#[derive(Clone, Debug, Default)]
pub struct MountContext {
    pub key: Vec<u8>,
    pub version: String,
}

impl MountContext {
    pub fn new(key: Vec<u8>, version: impl Into<String>) -> Self {
        Self {
            key,
            version: version.into(),
        }
    }
}

/// Opens container files of one format.
pub trait ContainerReader {
    /// Whether this reader claims `path`.
    fn handles(&self, path: &Path) -> bool;

    fn open(&self, path: &Path, ctx: &MountContext) -> Result<Box<dyn ArchiveSource>>;
}

/// In-memory archive, for callers that already hold entry bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    files: Vec<(String, Vec<u8>)>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, virtual_path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.push((virtual_path.into(), bytes.into()));
        self
    }
}

impl ArchiveSource for MemoryArchive {
    fn entries(&mut self) -> Result<Vec<RawEntry>> {
        Ok(self
            .files
            .iter()
            .enumerate()
            .map(|(slot, (path, _))| RawEntry::new(path.as_str(), slot))
            .collect())
    }

    fn read(&mut self, slot: usize) -> Result<Vec<u8>> {
        self.files
            .get(slot)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| Error::ReadFailed {
                archive: "memory".to_string(),
                path: format!("slot {slot}"),
                reason: "no such slot".to_string(),
            })
    }
}

/// Mount every container under `root` that one of `readers` claims.
///
/// Containers are visited recursively in file-name order. A container that
/// fails to open is skipped with a warning.
pub fn mount_dir(
    root: &Path,
    readers: &[Box<dyn ContainerReader>],
    ctx: &MountContext,
) -> Result<OverlayBuilder> {
    if !root.is_dir() {
        return Err(Error::MountFailed {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut builder = OverlayBuilder::new();
    for item in WalkDir::new(root).sort_by_file_name() {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }

        let path = item.path();
        let Some(reader) = readers.iter().find(|r| r.handles(path)) else {
            continue;
        };

        let mounted = reader
            .open(path, ctx)
            .and_then(|source| builder.mount(path, source));
        match mounted {
            Ok(id) => debug!(archive = %id, path = %path.display(), "mounted container"),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping container"),
        }
    }

    info!(archives = builder.len(), "mount complete");
    Ok(builder)
}

/// Case-insensitive extension check shared by readers.
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_archive_lists_and_reads() {
        let mut archive = MemoryArchive::new()
            .with_file("Content/a.uasset", b"a".to_vec())
            .with_file("Content/b.uasset", b"bb".to_vec());
        let entries = archive.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], RawEntry::new("Content/b.uasset", 1));
        assert_eq!(archive.read(1).unwrap(), b"bb");
        assert!(archive.read(5).is_err());
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension(Path::new("Paks/pakchunk0.ZIP"), &["zip"]));
        assert!(!has_extension(Path::new("Paks/pakchunk0.sig"), &["zip"]));
        assert!(!has_extension(Path::new("Paks/noext"), &["zip"]));
    }

    #[test]
    fn mount_dir_rejects_missing_root() {
        let root = Path::new("/nonexistent/strata/root");
        let result = mount_dir(root, &[], &MountContext::default());
        assert!(matches!(result, Err(Error::MountFailed { .. })));
    }
}
