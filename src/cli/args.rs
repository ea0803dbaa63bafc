//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// setup-texlive - Provision a cached TeX Live installation
///
/// Selects a fresh mirror, restores a cached installation when one exists,
/// and installs or updates TeX Live with the requested packages.
#[derive(Parser, Debug)]
#[command(name = "setup-texlive")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SETUP_TEXLIVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (overrides general.log_format)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore, install or update TeX Live
    Run(RunArgs),

    /// Print the cache key a run would use
    Key(KeyArgs),

    /// Resolve and print the selected mirror
    Mirror(MirrorArgs),

    /// Print the detected TeX Live platform
    Platform,

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Inputs shared by `run` and `key`; unset flags fall back to `INPUT_*`
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Repository to install from (skips mirror selection)
    #[arg(long)]
    pub repository: Option<String>,

    /// File listing the packages to install
    #[arg(long)]
    pub package_file: Option<PathBuf>,

    /// Packages to install, whitespace separated (wins over --package-file)
    #[arg(long)]
    pub packages: Option<String>,

    /// Cache namespace, change it to invalidate existing caches
    #[arg(long)]
    pub cache_version: Option<String>,

    /// Only use mirrors serving this TeX Live release
    #[arg(long)]
    pub texlive_version: Option<u32>,

    /// Keep a stale cached installation when updating it fails
    #[arg(long)]
    pub accept_stale: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Do not consult the mirror catalog
    #[arg(long)]
    pub no_mirror: bool,
}

/// Arguments for the mirror command
#[derive(Parser, Debug)]
pub struct MirrorArgs {
    /// Only consider mirrors serving this TeX Live release
    #[arg(long)]
    pub texlive_version: Option<u32>,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for informational commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Simple text
    Plain,
    /// JSON output
    Json,
}

/// Format of diagnostic log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
