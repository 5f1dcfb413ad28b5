//! Two-phase overlay construction.
//!
//! Archives are mounted into an [`OverlayBuilder`]. [`OverlayBuilder::finish`]
//! computes the duplicate index over every mounted archive at once and hands
//! back a read-only [`Overlay`] plus the [`SourceTable`] used to fetch bytes.

use std::path::Path;

use tracing::info;

use crate::duplicates::DuplicateIndex;
use crate::entry::{ArchiveHandle, ArchiveId, Entry};
use crate::error::{Error, Result};
use crate::index::ArchiveIndex;
use crate::source::ArchiveSource;

/// Archive name reserved for the duplicate list in path dumps.
pub const RESERVED_NAME: &str = "duplicates";

#[derive(Default)]
pub struct OverlayBuilder {
    archives: Vec<ArchiveHandle>,
    indexes: Vec<ArchiveIndex>,
    sources: Vec<Box<dyn ArchiveSource>>,
}

impl OverlayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate and index `source`, naming it after the stem of `path`.
    pub fn mount(
        &mut self,
        path: impl AsRef<Path>,
        mut source: Box<dyn ArchiveSource>,
    ) -> Result<ArchiveId> {
        let path = path.as_ref();
        let raw = source.entries().map_err(|e| Error::MountFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let id = ArchiveId(self.archives.len());
        let name = self.unique_name(&archive_stem(path));

        self.indexes.push(ArchiveIndex::build(id, raw));
        self.archives.push(ArchiveHandle {
            id,
            name,
            path: path.to_path_buf(),
        });
        self.sources.push(source);
        Ok(id)
    }

    fn unique_name(&self, stem: &str) -> String {
        let taken = |name: &str| {
            name.eq_ignore_ascii_case(RESERVED_NAME)
                || self.archives.iter().any(|a| a.name.eq_ignore_ascii_case(name))
        };
        if !taken(stem) {
            return stem.to_string();
        }
        (2..)
            .map(|n| format!("{stem}-{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| stem.to_string())
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Freeze the mounted set.
    pub fn finish(self) -> (Overlay, SourceTable) {
        let duplicates = DuplicateIndex::build(&self.indexes);
        let overlay = Overlay {
            archives: self.archives,
            indexes: self.indexes,
            duplicates,
        };
        info!(
            archives = overlay.archives.len(),
            entries = overlay.entry_count(),
            duplicates = overlay.duplicates.len(),
            "overlay ready"
        );
        (overlay, SourceTable { sources: self.sources })
    }
}

/// Container file stem, or `archive` when the stem cannot be a single
/// directory name (`...zip` has the stem `..`).
fn archive_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !matches!(s.as_str(), "" | "." | ".."))
        .filter(|s| !s.contains(['/', '\\', '\0']))
        .unwrap_or_else(|| "archive".to_string())
}

/// Read-only view over every mounted archive.
#[derive(Clone, Debug)]
pub struct Overlay {
    archives: Vec<ArchiveHandle>,
    indexes: Vec<ArchiveIndex>,
    duplicates: DuplicateIndex,
}

impl Overlay {
    /// Archives in mount order.
    pub fn archives(&self) -> &[ArchiveHandle] {
        &self.archives
    }

    pub fn archive(&self, id: ArchiveId) -> &ArchiveHandle {
        &self.archives[id.0]
    }

    pub fn index(&self, id: ArchiveId) -> &ArchiveIndex {
        &self.indexes[id.0]
    }

    pub fn indexes(&self) -> &[ArchiveIndex] {
        &self.indexes
    }

    pub fn duplicates(&self) -> &DuplicateIndex {
        &self.duplicates
    }

    /// Every entry, archives in mount order and entries in enumeration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.indexes.iter().flat_map(|index| index.entries())
    }

    pub fn entry_count(&self) -> usize {
        self.indexes.iter().map(ArchiveIndex::len).sum()
    }
}

/// Byte access for mounted archives, indexed by [`ArchiveId`].
pub struct SourceTable {
    sources: Vec<Box<dyn ArchiveSource>>,
}

impl SourceTable {
    pub fn read(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let source = self
            .sources
            .get_mut(entry.archive.0)
            .ok_or_else(|| Error::ReadFailed {
                archive: entry.archive.to_string(),
                path: entry.virtual_path.clone(),
                reason: "archive is not mounted".to_string(),
            })?;
        source.read(entry.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryArchive;

    fn memory(paths: &[&str]) -> Box<dyn ArchiveSource> {
        Box::new(
            paths
                .iter()
                .fold(MemoryArchive::new(), |a, p| a.with_file(*p, p.as_bytes().to_vec())),
        )
    }

    #[test]
    fn names_come_from_file_stems() {
        let mut builder = OverlayBuilder::new();
        builder.mount("Paks/pakchunk0-Windows.pak", memory(&["a"])).unwrap();
        builder.mount("Paks/mods/Patch_P.zip", memory(&["b"])).unwrap();
        let (overlay, _) = builder.finish();
        let names: Vec<_> = overlay.archives().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["pakchunk0-Windows", "Patch_P"]);
    }

    #[test]
    fn colliding_and_reserved_names_are_suffixed() {
        let mut builder = OverlayBuilder::new();
        builder.mount("a/pak.zip", memory(&["x"])).unwrap();
        builder.mount("b/PAK.zip", memory(&["y"])).unwrap();
        builder.mount("c/duplicates.zip", memory(&["z"])).unwrap();
        let (overlay, _) = builder.finish();
        let names: Vec<_> = overlay.archives().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["pak", "PAK-2", "duplicates-2"]);
    }

    #[test]
    fn dot_stems_fall_back_to_archive() {
        let mut builder = OverlayBuilder::new();
        builder.mount("Paks/...zip", memory(&["x"])).unwrap();
        builder.mount("Paks/..zip", memory(&["y"])).unwrap();
        builder.mount("Paks/b.zip", memory(&["z"])).unwrap();
        let (overlay, _) = builder.finish();
        let names: Vec<_> = overlay.archives().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["archive", "archive-2", "b"]);
    }

    #[test]
    fn finish_builds_global_duplicates() {
        let mut builder = OverlayBuilder::new();
        builder.mount("one.zip", memory(&["Content/A/x.uasset"])).unwrap();
        builder.mount("two.zip", memory(&["content/a/X.uasset", "Content/y"])).unwrap();
        let (overlay, mut sources) = builder.finish();

        assert_eq!(overlay.entry_count(), 3);
        assert!(overlay.duplicates().contains("content\\a\\x.uasset"));
        assert!(!overlay.duplicates().contains("content\\y"));

        let entry = overlay.index(ArchiveId(1)).get("content\\y").unwrap().clone();
        assert_eq!(sources.read(&entry).unwrap(), b"Content/y");
    }
}
