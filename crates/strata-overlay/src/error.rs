use std::io;
use std::path::PathBuf;

use crate::decode::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("query is empty after normalization: '{0}'")]
    EmptyQuery(String),

    #[error("malformed virtual path '{path}': {reason}")]
    MalformedPath { path: String, reason: &'static str },

    #[error("failed to mount '{path}': {reason}")]
    MountFailed { path: PathBuf, reason: String },

    #[error("failed to read '{path}' from archive '{archive}': {reason}")]
    ReadFailed {
        archive: String,
        path: String,
        reason: String,
    },

    #[error("failed to decode '{path}': {source}")]
    DecodeFailed { path: String, source: DecodeError },

    #[error("decoder produced no output for '{0}'")]
    EmptyDecode(String),

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("failed to serialize path dump: {0}")]
    Dump(#[from] serde_json::Error),

    #[error("output target escapes output root: '{target}' is not under '{root}'")]
    OutsideOutputRoot { target: PathBuf, root: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
