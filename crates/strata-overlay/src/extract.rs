//! Decoding and writing matched entries.
//!
//! Each matched entry is read, decoded, planned, and written on its own. A
//! failure at any of those steps skips that entry and is recorded in the
//! [`ExtractReport`]; the remaining entries are still processed.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::decode::PackageDecoder;
use crate::error::{Error, Result};
use crate::options::{ExtractOptions, OutputMode};
use crate::overlay::{Overlay, SourceTable};
use crate::plan::{ensure_within, plan};
use crate::query::{Match, MatchSet, Query, QueryMode, resolve};

#[derive(Clone, Debug, Serialize)]
pub struct ExtractedEntry {
    pub virtual_path: String,
    pub archive: String,
    pub target: PathBuf,
    /// An earlier entry of the same query was written to `target` and has
    /// been overwritten by this one.
    pub replaced: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkippedEntry {
    pub virtual_path: String,
    pub archive: String,
    pub reason: String,
}

/// Outcome of one query.
#[derive(Clone, Debug, Serialize)]
pub struct ExtractReport {
    pub query: String,
    pub mode: QueryMode,
    pub extracted: Vec<ExtractedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ExtractReport {
    /// At least one file was written.
    pub fn is_success(&self) -> bool {
        !self.extracted.is_empty()
    }

    /// The query matched nothing in any archive.
    pub fn is_not_found(&self) -> bool {
        self.extracted.is_empty() && self.skipped.is_empty()
    }
}

pub struct Extractor<'a, D> {
    overlay: &'a Overlay,
    sources: &'a mut SourceTable,
    decoder: D,
    options: ExtractOptions,
}

impl<'a, D: PackageDecoder> Extractor<'a, D> {
    pub fn new(
        overlay: &'a Overlay,
        sources: &'a mut SourceTable,
        decoder: D,
        options: ExtractOptions,
    ) -> Self {
        Self {
            overlay,
            sources,
            decoder,
            options,
        }
    }

    /// Classify, resolve and extract one query.
    ///
    /// Only an empty query is an error; missing matches and per-entry
    /// failures are reported in the returned [`ExtractReport`].
    pub fn extract(&mut self, raw: &str) -> Result<ExtractReport> {
        let query = Query::classify(raw, self.overlay)?;
        info!(query = raw, mode = %query.mode(), "searching (case-insensitive)");
        let matches = resolve(&query, self.overlay);
        Ok(self.extract_matches(matches))
    }

    pub fn extract_matches(&mut self, matches: MatchSet<'a>) -> ExtractReport {
        let query = matches.query().clone();
        let mut report = ExtractReport {
            query: query.raw().to_string(),
            mode: query.mode(),
            extracted: Vec::new(),
            skipped: Vec::new(),
        };

        if matches.is_empty() {
            info!(
                query = query.raw(),
                "could not find any file matching query (case-insensitive)"
            );
            return report;
        }

        let mut written = HashSet::new();
        for m in matches {
            match self.extract_one(&m, &query) {
                Ok(targets) => {
                    for target in targets {
                        let replaced = !written.insert(target.clone());
                        if replaced {
                            warn!(
                                path = %m.entry.virtual_path,
                                archive = %m.archive.name,
                                target = %target.display(),
                                "overwrote output of an earlier match"
                            );
                        }
                        info!(
                            path = %m.entry.virtual_path,
                            archive = %m.archive.name,
                            target = %target.display(),
                            "extracted"
                        );
                        report.extracted.push(ExtractedEntry {
                            virtual_path: m.entry.virtual_path.clone(),
                            archive: m.archive.name.clone(),
                            target,
                            replaced,
                        });
                    }
                }
                Err(e) => {
                    info!(
                        path = %m.entry.virtual_path,
                        archive = %m.archive.name,
                        error = %e,
                        "could not load file"
                    );
                    report.skipped.push(SkippedEntry {
                        virtual_path: m.entry.virtual_path.clone(),
                        archive: m.archive.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn extract_one(&mut self, m: &Match<'_>, query: &Query) -> Result<Vec<PathBuf>> {
        let raw = self.sources.read(m.entry)?;
        let mut outputs = self
            .decoder
            .decode(m.entry, raw)
            .map_err(|source| Error::DecodeFailed {
                path: m.entry.virtual_path.clone(),
                source,
            })?;
        if outputs.is_empty() {
            return Err(Error::EmptyDecode(m.entry.virtual_path.clone()));
        }

        let plan = plan(
            &self.options.output_root,
            m.entry,
            m.archive,
            query,
            self.overlay.duplicates(),
        );
        debug!(
            path = %m.entry.virtual_path,
            directory = %plan.directory.display(),
            qualified = plan.archive_qualified,
            "planned"
        );

        let root = &self.options.output_root;
        match self.options.output_mode {
            OutputMode::FirstOnly => {
                let first = outputs.swap_remove(0);
                let target = plan.target();
                ensure_within(root, &target)?;
                write_output(&target, &first.bytes)?;
                Ok(vec![target])
            }
            OutputMode::All => {
                let mut targets = Vec::with_capacity(outputs.len());
                for output in &outputs {
                    let target = plan.target_named(&output.name);
                    ensure_within(root, &target)?;
                    write_output(&target, &output.bytes)?;
                    targets.push(target);
                }
                Ok(targets)
            }
        }
    }
}

/// Write `bytes` to `target`, creating parent directories first.
///
/// The bytes go to a temporary file next to `target` which then replaces it,
/// so concurrent writers to one path end last-write-wins with no torn file.
pub fn write_output(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target.parent().ok_or_else(|| Error::WriteFailed {
        path: target.to_path_buf(),
        source: std::io::Error::other("no parent directory"),
    })?;

    std::fs::create_dir_all(dir).map_err(|e| Error::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let write_failed = |source| Error::WriteFailed {
        path: target.to_path_buf(),
        source,
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".strata-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.persist(target).map_err(|e| write_failed(e.error))?;
    Ok(())
}
