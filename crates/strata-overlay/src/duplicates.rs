use std::collections::{BTreeSet, HashMap};

use crate::entry::ArchiveId;
use crate::index::ArchiveIndex;

/// Paths present in more than one mounted archive.
///
/// Only meaningful over the complete set of mounted archives; a path that
/// is absent here is unique across the overlay.
#[derive(Clone, Debug, Default)]
pub struct DuplicateIndex {
    paths: HashMap<String, Vec<ArchiveId>>,
}

impl DuplicateIndex {
    /// `indexes[i]` must belong to `ArchiveId(i)`.
    pub fn build(indexes: &[ArchiveIndex]) -> Self {
        let mut seen: HashMap<&str, BTreeSet<ArchiveId>> = HashMap::new();
        for (i, index) in indexes.iter().enumerate() {
            for path in index.paths() {
                seen.entry(path).or_default().insert(ArchiveId(i));
            }
        }

        let paths = seen
            .into_iter()
            .filter(|(_, archives)| archives.len() > 1)
            .map(|(path, archives)| (path.to_string(), archives.into_iter().collect()))
            .collect();

        Self { paths }
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.paths.contains_key(normalized)
    }

    /// Archives containing `normalized`, in mount order.
    pub fn archives(&self, normalized: &str) -> Option<&[ArchiveId]> {
        self.paths.get(normalized).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ArchiveId])> {
        self.paths.iter().map(|(p, a)| (p.as_str(), a.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
