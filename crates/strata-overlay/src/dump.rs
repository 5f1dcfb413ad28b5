//! Diagnostic dump of every indexed path and the duplicate report.
//!
//! The JSON document has one array per mounted archive, keyed by archive
//! name, plus a `duplicates` array of `{ path, archives }` records.

use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::Result;
use crate::extract::write_output;
use crate::overlay::{Overlay, RESERVED_NAME};

pub const DUMP_FILE_NAME: &str = "paths.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub path: String,
    /// Distinct archive names, sorted.
    pub archives: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// `(archive name, normalized paths)` in mount order.
    pub archives: Vec<(String, Vec<String>)>,
    /// Sorted by path.
    pub duplicates: Vec<DuplicateRecord>,
}

impl Serialize for DumpReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.archives.len() + 1))?;
        for (name, paths) in &self.archives {
            map.serialize_entry(name, paths)?;
        }
        map.serialize_entry(RESERVED_NAME, &self.duplicates)?;
        map.end()
    }
}

pub fn dump(overlay: &Overlay) -> DumpReport {
    let archives = overlay
        .archives()
        .iter()
        .map(|handle| {
            let paths = overlay.index(handle.id).paths().map(str::to_string).collect();
            (handle.name.clone(), paths)
        })
        .collect();

    let mut duplicates: Vec<DuplicateRecord> = overlay
        .duplicates()
        .iter()
        .map(|(path, ids)| {
            let mut archives: Vec<String> = ids
                .iter()
                .map(|&id| overlay.archive(id).name.clone())
                .collect();
            archives.sort();
            archives.dedup();
            DuplicateRecord {
                path: path.to_string(),
                archives,
            }
        })
        .collect();
    duplicates.sort_by(|a, b| a.path.cmp(&b.path));

    DumpReport {
        archives,
        duplicates,
    }
}

/// Write `report` as pretty JSON to `{output_root}/paths.json`.
pub fn write_dump(report: &DumpReport, output_root: &Path) -> Result<PathBuf> {
    let target = output_root.join(DUMP_FILE_NAME);
    let json = serde_json::to_vec_pretty(report)?;
    write_output(&target, &json)?;
    info!(path = %target.display(), "dumped all virtual paths");
    Ok(target)
}
