use std::path::{Path, PathBuf};

/// Which decoded outputs of a package are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Only the first decoded output, written under the entry's file name.
    #[default]
    FirstOnly,
    /// Every decoded output, each under its own name.
    All,
}

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub output_root: PathBuf,
    pub output_mode: OutputMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("Output"),
            output_mode: OutputMode::default(),
        }
    }
}

impl ExtractOptions {
    pub fn new(output_root: impl AsRef<Path>) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }
}
