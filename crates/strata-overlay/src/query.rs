//! Query classification and resolution.
//!
//! A query is classified once against the whole overlay, then matched:
//!
//! - no separator: [`QueryMode::FilenameOnly`], a whole-segment suffix match
//! - a path some archive contains exactly: [`QueryMode::ExactPath`]
//! - a path that prefixes entries in any archive: [`QueryMode::FolderPrefix`]
//!
//! Exact matches win over folder semantics. Classification looks at the union
//! of all archives, so a folder that exists in only one archive is still a
//! folder for every archive.

use std::fmt;

use serde::Serialize;

use crate::entry::{ArchiveHandle, Entry};
use crate::error::{Error, Result};
use crate::overlay::Overlay;
use crate::path::{self, SEPARATOR};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    FilenameOnly,
    ExactPath,
    FolderPrefix,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FilenameOnly => "filename",
            Self::ExactPath => "file",
            Self::FolderPrefix => "folder",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    raw: String,
    key: String,
    mode: QueryMode,
}

impl Query {
    pub fn classify(raw: &str, overlay: &Overlay) -> Result<Self> {
        let key = path::fold(raw);
        if key.is_empty() {
            return Err(Error::EmptyQuery(raw.to_string()));
        }

        let mode = if !key.contains(SEPARATOR) {
            QueryMode::FilenameOnly
        } else if overlay.indexes().iter().any(|index| index.contains(&key)) {
            QueryMode::ExactPath
        } else if overlay
            .entries()
            .any(|e| path::strip_folder(&e.normalized_path, &key).is_some())
        {
            QueryMode::FolderPrefix
        } else {
            QueryMode::ExactPath
        };

        Ok(Self {
            raw: raw.to_string(),
            key,
            mode,
        })
    }

    /// The query as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Folded comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Number of path segments in the key.
    pub fn depth(&self) -> usize {
        path::depth(&self.key)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Match<'a> {
    pub entry: &'a Entry,
    pub archive: &'a ArchiveHandle,
}

/// Entries matched by one query, archives in mount order.
#[derive(Clone, Debug)]
pub struct MatchSet<'a> {
    query: Query,
    matches: Vec<Match<'a>>,
}

impl<'a> MatchSet<'a> {
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match<'a>> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl<'a> IntoIterator for MatchSet<'a> {
    type Item = Match<'a>;
    type IntoIter = std::vec::IntoIter<Match<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

pub fn resolve<'a>(query: &Query, overlay: &'a Overlay) -> MatchSet<'a> {
    let key = query.key();
    let with_archive = |entry: &'a Entry| Match {
        entry,
        archive: overlay.archive(entry.archive),
    };

    let matches = match query.mode() {
        QueryMode::FilenameOnly => overlay
            .entries()
            .filter(|e| path::ends_with_segment(&e.normalized_path, key))
            .map(with_archive)
            .collect(),
        QueryMode::ExactPath => overlay
            .indexes()
            .iter()
            .filter_map(|index| index.get(key))
            .map(with_archive)
            .collect(),
        QueryMode::FolderPrefix => overlay
            .entries()
            .filter(|e| path::strip_folder(&e.normalized_path, key).is_some())
            .map(with_archive)
            .collect(),
    };

    MatchSet {
        query: query.clone(),
        matches,
    }
}
