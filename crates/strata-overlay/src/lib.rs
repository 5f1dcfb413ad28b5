//! Case-insensitive overlay index over layered archives, with duplicate-aware extraction.
//!
//! # Architecture
//!
//! - `path.rs` - Virtual path normalization and segment-aware matching
//! - `index.rs` - Per-archive path index
//! - `duplicates.rs` - Cross-archive duplicate index
//! - `overlay.rs` - Two-phase mount (builder, then frozen overlay)
//! - `query.rs` - Query classification and resolution
//! - `plan.rs` - Output layout decisions
//! - `extract.rs` - Decoding and writing matched entries
//! - `dump.rs` - Diagnostic path dump
//! - `source/` - Container reader seams and implementations

pub use decode::{DecodeError, DecodedOutput, PackageDecoder, RawDecoder};
pub use dump::{DUMP_FILE_NAME, DumpReport, DuplicateRecord, dump, write_dump};
pub use duplicates::DuplicateIndex;
pub use entry::{ArchiveHandle, ArchiveId, Entry};
pub use error::{Error, Result};
pub use extract::{ExtractReport, ExtractedEntry, Extractor, SkippedEntry, write_output};
pub use index::ArchiveIndex;
pub use options::{ExtractOptions, OutputMode};
pub use overlay::{Overlay, OverlayBuilder, SourceTable};
pub use path::{SEPARATOR, fold, normalize};
pub use plan::{OutputPlan, ensure_within, plan};
pub use query::{Match, MatchSet, Query, QueryMode, resolve};
pub use source::{ArchiveSource, ContainerReader, MemoryArchive, MountContext, RawEntry, mount_dir};

#[cfg(feature = "zip")]
pub use source::zip::ZipReader;

pub mod decode;
pub mod dump;
pub mod duplicates;
pub mod entry;
mod error;
pub mod extract;
pub mod index;
pub mod options;
pub mod overlay;
pub mod path;
pub mod plan;
pub mod query;
pub mod source;
