use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::source::{ArchiveSource, ContainerReader, MountContext, RawEntry, has_extension};

/// Upper bound on the buffer reserved up front from a record's declared size.
const PREALLOC_LIMIT: usize = 16 * 1024 * 1024;

/// Mounts `.zip` containers.
///
/// Key material and version tag are not used; encrypted records fail at
/// read time and are skipped by the extractor.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipReader;

impl ContainerReader for ZipReader {
    fn handles(&self, path: &Path) -> bool {
        has_extension(path, &["zip"])
    }

    fn open(&self, path: &Path, _ctx: &MountContext) -> Result<Box<dyn ArchiveSource>> {
        let file = File::open(path).map_err(|e| Error::MountFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let source = ZipSource::new(BufReader::new(file), path.display().to_string()).map_err(
            |e| Error::MountFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        )?;
        Ok(Box::new(source))
    }
}

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    label: String,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let archive = zip::ZipArchive::new(reader).map_err(|e| Error::ReadFailed {
            archive: label.clone(),
            path: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self { archive, label })
    }
}

fn read_failed(archive: &str, path: String, reason: impl ToString) -> Error {
    Error::ReadFailed {
        archive: archive.to_string(),
        path,
        reason: reason.to_string(),
    }
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn entries(&mut self) -> Result<Vec<RawEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for slot in 0..self.archive.len() {
            // Central directory only; nothing is decompressed here.
            let file = self
                .archive
                .by_index_raw(slot)
                .map_err(|e| read_failed(&self.label, format!("slot {slot}"), e))?;
            if file.is_dir() {
                continue;
            }
            entries.push(RawEntry::new(file.name(), slot));
        }
        Ok(entries)
    }

    fn read(&mut self, slot: usize) -> Result<Vec<u8>> {
        let label = &self.label;
        let mut file = self
            .archive
            .by_index(slot)
            .map_err(|e| read_failed(label, format!("slot {slot}"), e))?;
        let name = file.name().to_string();
        // Declared sizes are untrusted; the buffer grows past the cap as needed.
        let hint = usize::try_from(file.size()).map_or(0, |n| n.min(PREALLOC_LIMIT));
        let mut bytes = Vec::with_capacity(hint);
        file.read_to_end(&mut bytes)
            .map_err(|e| read_failed(label, name, e))?;
        Ok(bytes)
    }
}
