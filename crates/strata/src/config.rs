use std::path::PathBuf;

use strata_overlay::{MountContext, OutputMode};

use crate::cli::Args;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Game directory does not exist: {}", .0.display())]
    GameDirMissing(PathBuf),

    #[error("Game directory is not a directory: {}", .0.display())]
    GameDirNotDirectory(PathBuf),

    #[error("AES key is empty")]
    EmptyKey,

    #[error("AES key is not valid hex: {0}")]
    InvalidKey(#[from] hex::FromHexError),

    #[error("Engine version must not be empty")]
    EmptyVersion,

    #[error("Content path is required when not dumping paths.")]
    MissingContentPath,

    #[error("Output path exists and is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),

    #[error("Could not resolve output directory: {0}")]
    OutputUnresolved(#[source] std::io::Error),
}

/// Validated run configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub game_dir: PathBuf,
    /// Absolute output root.
    pub output: PathBuf,
    pub queries: Vec<String>,
    pub mount: MountContext,
    pub dump_paths: bool,
    pub output_mode: OutputMode,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if !args.game_dir.exists() {
            return Err(ConfigError::GameDirMissing(args.game_dir));
        }
        if !args.game_dir.is_dir() {
            return Err(ConfigError::GameDirNotDirectory(args.game_dir));
        }

        let key = parse_key(&args.aes_key)?;

        let version = args.engine_version.trim();
        if version.is_empty() {
            return Err(ConfigError::EmptyVersion);
        }

        let queries: Vec<String> = args
            .content_paths
            .into_iter()
            .filter(|q| !q.trim().is_empty())
            .collect();
        if queries.is_empty() && !args.dump_paths {
            return Err(ConfigError::MissingContentPath);
        }

        let output = std::path::absolute(&args.output).map_err(ConfigError::OutputUnresolved)?;
        if output.exists() && !output.is_dir() {
            return Err(ConfigError::OutputNotDirectory(output));
        }

        Ok(Self {
            game_dir: args.game_dir,
            output,
            queries,
            mount: MountContext::new(key, version),
            dump_paths: args.dump_paths,
            output_mode: if args.all_outputs {
                OutputMode::All
            } else {
                OutputMode::FirstOnly
            },
        })
    }
}

fn parse_key(raw: &str) -> Result<Vec<u8>, ConfigError> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if digits.is_empty() {
        return Err(ConfigError::EmptyKey);
    }
    Ok(hex::decode(digits)?)
}
