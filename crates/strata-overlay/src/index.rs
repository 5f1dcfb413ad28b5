use std::collections::HashMap;

use tracing::{debug, warn};

use crate::entry::{ArchiveId, Entry};
use crate::source::RawEntry;

/// Normalized path to entry mapping for a single archive.
///
/// Entries keep enumeration order. A path listed twice by the same archive
/// keeps its first position and the last entry's data.
#[derive(Clone, Debug, Default)]
pub struct ArchiveIndex {
    entries: Vec<Entry>,
    by_path: HashMap<String, usize>,
}

impl ArchiveIndex {
    /// Index a raw enumeration. Malformed paths are skipped with a warning.
    pub fn build(archive: ArchiveId, raw: impl IntoIterator<Item = RawEntry>) -> Self {
        let mut index = Self::default();
        for RawEntry { virtual_path, slot } in raw {
            match Entry::new(virtual_path.as_str(), archive, slot) {
                Ok(entry) => index.insert(entry),
                Err(e) => warn!(%archive, error = %e, "skipping malformed entry"),
            }
        }
        debug!(%archive, entries = index.len(), "indexed archive");
        index
    }

    pub fn insert(&mut self, entry: Entry) {
        match self.by_path.get(&entry.normalized_path) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.by_path
                    .insert(entry.normalized_path.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Exact lookup by folded key.
    pub fn get(&self, normalized: &str) -> Option<&Entry> {
        self.by_path.get(normalized).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.by_path.contains_key(normalized)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.normalized_path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(paths: &[&str]) -> Vec<RawEntry> {
        paths
            .iter()
            .enumerate()
            .map(|(slot, p)| RawEntry::new(*p, slot))
            .collect()
    }

    #[test]
    fn build_keeps_enumeration_order() {
        let index = ArchiveIndex::build(
            ArchiveId(0),
            raw(&["Content/B.uasset", "Content/A.uasset", "Content/C.uasset"]),
        );
        let paths: Vec<_> = index.paths().collect();
        assert_eq!(
            paths,
            vec!["content\\b.uasset", "content\\a.uasset", "content\\c.uasset"]
        );
    }

    #[test]
    fn lookup_is_case_insensitive_through_key() {
        let index = ArchiveIndex::build(ArchiveId(0), raw(&["Content/UI/Icon.uasset"]));
        assert!(index.contains("content\\ui\\icon.uasset"));
        assert_eq!(
            index.get("content\\ui\\icon.uasset").unwrap().display_path,
            "Content\\UI\\Icon.uasset"
        );
    }

    #[test]
    fn duplicate_within_archive_last_wins() {
        let index = ArchiveIndex::build(
            ArchiveId(0),
            raw(&["Content/x.uasset", "Content/Other.uasset", "content\\X.uasset"]),
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].slot, 2);
        assert_eq!(index.entries()[0].virtual_path, "content\\X.uasset");
    }

    #[test]
    fn malformed_paths_are_skipped() {
        let index = ArchiveIndex::build(
            ArchiveId(0),
            raw(&["", "../evil", "Content/ok.uasset"]),
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].slot, 2);
    }
}
