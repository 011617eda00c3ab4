//! Ioncache CLI: precomputes the ion cache and inspects its entries.
//!
//! `ioncache precompute` enumerates every ion configuration of the loaded
//! compounds and fills the cache with the ones not yet attempted.
//! `ioncache inspect` prints the records stored under one cache key.

#![warn(missing_docs)]

mod error;
mod inspect;
mod logging;
mod precompute;
mod ui;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ioncache_common::MassType;
use ioncache_config::{ToolConfig, CONFIG_FILE};

use crate::error::CliError;

/// Ioncache: precomputed m/z values for compound, adduct and isotope
/// combinations.
#[derive(Parser, Debug)]
#[command(name = "ioncache", version, about = "Ion cache precomputation")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a custom `ioncache.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every missing cache entry.
    Precompute(PrecomputeArgs),
    /// Print the records stored under a cache key.
    Inspect(InspectArgs),
}

/// Arguments for the `ioncache precompute` subcommand.
#[derive(Parser, Debug)]
pub struct PrecomputeArgs {
    /// Write the cache under the home directory instead of the working
    /// directory.
    #[arg(long)]
    pub home: bool,

    /// Only load compounds from this group.
    #[arg(long)]
    pub group_name: Option<String>,

    /// Compound source document, overriding the configuration.
    #[arg(long)]
    pub compounds: Option<PathBuf>,

    /// Generation worker threads (default: cores minus reserve).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Which m/z value to record.
    #[arg(long, value_enum)]
    pub mass_type: Option<MassTypeArg>,
}

/// Arguments for the `ioncache inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Base formula expression of the compound (the entry directory name).
    pub expression: String,

    /// 16-digit hexadecimal cache key.
    pub key: String,

    /// Look in the home directory cache.
    #[arg(long)]
    pub home: bool,
}

/// Mass convention selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MassTypeArg {
    /// Monoisotopic masses.
    Monoisotopic,
    /// Average masses.
    Average,
}

impl From<MassTypeArg> for MassType {
    fn from(arg: MassTypeArg) -> Self {
        match arg {
            MassTypeArg::Monoisotopic => MassType::Monoisotopic,
            MassTypeArg::Average => MassType::Average,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the tool configuration: the explicit `--config` file, or
    /// `ioncache.toml` in the working directory when present.
    pub fn load_config(&self) -> Result<ToolConfig, CliError> {
        let config = match &self.config {
            Some(path) => ioncache_config::load_config(path)?,
            None => ioncache_config::load_config_or_default(Path::new(CONFIG_FILE))?,
        };
        Ok(config)
    }
}

/// The cache root, under the user's home directory when `home` is set.
pub fn cache_root(config: &ToolConfig, home: bool) -> Result<PathBuf, CliError> {
    if !home {
        return Ok(config.cache.resolve_root(None));
    }
    // No home-directory crate in the dependency set; the std function is correct on Unix.
    #[allow(deprecated)]
    let dir = std::env::home_dir().ok_or(CliError::NoHomeDir)?;
    Ok(config.cache.resolve_root(Some(&dir)))
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Precompute(ref args) => precompute::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
