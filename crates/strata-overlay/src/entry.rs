use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::path;

/// Handle into the overlay's archive table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveId(pub(crate) usize);

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One mounted archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveHandle {
    pub id: ArchiveId,
    /// Container file stem, unique within one overlay.
    pub name: String,
    pub path: PathBuf,
}

/// One virtual file inside one archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Path as recorded by the archive.
    pub virtual_path: String,
    /// Separator-unified path with the archive's casing.
    pub display_path: String,
    /// Lower-cased comparison key.
    pub normalized_path: String,
    /// File name used for the extracted file.
    pub physical_name: String,
    pub archive: ArchiveId,
    /// Opaque position understood by the owning source.
    pub slot: usize,
}

impl Entry {
    /// Build an entry from a raw archive path, rejecting paths that cannot be extracted.
    pub fn new(
        virtual_path: impl Into<String>,
        archive: ArchiveId,
        slot: usize,
    ) -> Result<Self> {
        let virtual_path = virtual_path.into();
        let display_path = path::normalize(&virtual_path);
        if let Err(reason) = path::validate(&display_path) {
            return Err(Error::MalformedPath {
                path: virtual_path,
                reason,
            });
        }
        let physical_name = path::basename(&display_path).to_string();
        Ok(Self {
            normalized_path: display_path.to_lowercase(),
            physical_name,
            display_path,
            virtual_path,
            archive,
            slot,
        })
    }

    pub fn with_physical_name(mut self, name: impl Into<String>) -> Self {
        self.physical_name = name.into();
        self
    }
}
