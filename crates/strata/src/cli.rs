use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "strata", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Args {
    /// Virtual content path to extract: a full path, a bare file name, or a folder.
    /// May be given more than once.
    #[arg(short = 'p', long = "content-path", value_name = "PATH")]
    pub content_paths: Vec<String>,

    /// Engine version tag handed to archive readers.
    #[arg(short, long, value_name = "TAG")]
    pub engine_version: String,

    /// Archive key in hex, optionally prefixed with `0x`.
    #[arg(short = 'k', long, env = "STRATA_AES_KEY", hide_env_values = true)]
    pub aes_key: String,

    /// Directory containing the archive containers (searched recursively).
    #[arg(short, long, value_name = "DIR")]
    pub game_dir: PathBuf,

    /// Output directory.
    #[arg(short, long, value_name = "DIR", default_value = "Output")]
    pub output: PathBuf,

    /// Dump all virtual paths and duplicates to `paths.json` in the output directory.
    #[arg(short, long)]
    pub dump_paths: bool,

    /// Print progress while mounting and extracting.
    #[arg(short, long)]
    pub verbose: bool,

    /// Write every decoded output of a package instead of only the first.
    #[arg(long)]
    pub all_outputs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from([
            "strata", "-p", "x.uasset", "-p", "Game/Content/UI", "-e", "GAME_UE5_3", "-k", "0xABCD",
            "-g", "Paks", "-d", "-v",
        ])
        .unwrap();
        assert_eq!(args.content_paths, vec!["x.uasset", "Game/Content/UI"]);
        assert_eq!(args.engine_version, "GAME_UE5_3");
        assert_eq!(args.output, PathBuf::from("Output"));
        assert!(args.dump_paths);
        assert!(args.verbose);
        assert!(!args.all_outputs);
    }

    #[test]
    fn game_dir_is_required() {
        let result = Args::try_parse_from(["strata", "-e", "GAME_UE5_3", "-k", "00"]);
        assert!(result.is_err());
    }
}
