//! Package decoding seam.
//!
//! Turning raw archive bytes into exported files is format-specific and lives
//! outside this crate. A decoder may yield several named outputs per entry.

use crate::entry::Entry;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported package: {0}")]
    Unsupported(String),

    #[error("corrupted package: {0}")]
    Corrupted(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedOutput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DecodedOutput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

pub trait PackageDecoder {
    /// Decode `raw` into its outputs, in the decoder's preferred order.
    fn decode(&self, entry: &Entry, raw: Vec<u8>) -> Result<Vec<DecodedOutput>, DecodeError>;
}

/// Passes raw bytes through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawDecoder;

impl PackageDecoder for RawDecoder {
    fn decode(&self, entry: &Entry, raw: Vec<u8>) -> Result<Vec<DecodedOutput>, DecodeError> {
        Ok(vec![DecodedOutput::new(entry.physical_name.as_str(), raw)])
    }
}

impl<F> PackageDecoder for F
where
    F: Fn(&Entry, Vec<u8>) -> Result<Vec<DecodedOutput>, DecodeError>,
{
    fn decode(&self, entry: &Entry, raw: Vec<u8>) -> Result<Vec<DecodedOutput>, DecodeError> {
        self(entry, raw)
    }
}
