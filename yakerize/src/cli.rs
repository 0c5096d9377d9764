//! CLI argument definitions for yakerize.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary focused on orchestration.

use crate::clean::CleanOptions;
use crate::resolution::RequestArgs;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Stage and build yak packages from pre-built Grasshopper components.
#[derive(Parser, Debug)]
#[command(name = "yakerize")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Stage and build the package for Rhino 8:\n",
    "    $ yakerize stage\n\n",
    "  Build a Rhino 7 package with an explicit version:\n",
    "    $ yakerize stage --target-rhino rh7 --version 1.2.0\n\n",
    "  Remove generated files but keep the documentation build:\n",
    "    $ yakerize clean --no-docs\n\n",
    "Settings are read from yakerize.toml in the base directory.",
))]
pub struct Cli {
    /// Project base directory [default: current directory].
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<Utf8PathBuf>,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stage the package contents and build the yak package.
    Stage(StageArgs),

    /// Remove generated artefacts from the project tree.
    Clean(CleanArgs),

    /// Add an "Unreleased" section to CHANGELOG.md and commit it.
    PrepareChangelog(PrepareChangelogArgs),
}

/// Arguments for the stage command.
#[derive(Args, Debug, Clone, Default)]
pub struct StageArgs {
    /// Directory holding the pre-built .ghuser components.
    #[arg(long, value_name = "DIR")]
    pub components_dir: Option<Utf8PathBuf>,

    /// Staging directory [default: dist/yak_package].
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<Utf8PathBuf>,

    /// Manifest template containing the version placeholder.
    #[arg(long, value_name = "FILE")]
    pub manifest_path: Option<Utf8PathBuf>,

    /// Package logo.
    #[arg(long, value_name = "FILE")]
    pub logo_path: Option<Utf8PathBuf>,

    /// Readme copied into misc/ [default: README.md].
    #[arg(long, value_name = "FILE")]
    pub readme_path: Option<Utf8PathBuf>,

    /// License copied into misc/ [default: LICENSE].
    #[arg(long, value_name = "FILE")]
    pub license_path: Option<Utf8PathBuf>,

    /// Package version [default: read from the project metadata file].
    #[arg(long = "version", value_name = "VERSION")]
    pub package_version: Option<String>,

    /// Target Rhino version (rh7, rh8) [default: rh8].
    #[arg(long, value_name = "TAG")]
    pub target_rhino: Option<String>,

    /// Builder platform (any, win, mac) [default: any].
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,
}

impl From<StageArgs> for RequestArgs {
    fn from(args: StageArgs) -> Self {
        Self {
            components_dir: args.components_dir,
            target_dir: args.target_dir,
            manifest_path: args.manifest_path,
            logo_path: args.logo_path,
            readme_path: args.readme_path,
            license_path: args.license_path,
            version: args.package_version,
            target_rhino: args.target_rhino,
            platform: args.platform,
        }
    }
}

/// Arguments for the clean command.
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Keep generated API documentation.
    #[arg(long)]
    pub no_docs: bool,

    /// Keep __pycache__ directories and .pyc files.
    #[arg(long)]
    pub no_bytecode: bool,

    /// Keep build/ and egg-info directories.
    #[arg(long)]
    pub no_builds: bool,

    /// Keep componentizer output directories.
    #[arg(long)]
    pub no_ghuser: bool,
}

impl From<&CleanArgs> for CleanOptions {
    fn from(args: &CleanArgs) -> Self {
        Self {
            docs: !args.no_docs,
            bytecode: !args.no_bytecode,
            builds: !args.no_builds,
            ghuser: !args.no_ghuser,
        }
    }
}

/// Arguments for the prepare-changelog command.
#[derive(Args, Debug, Clone, Default)]
pub struct PrepareChangelogArgs {
    /// Update CHANGELOG.md without running git add and git commit.
    #[arg(long)]
    pub no_commit: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
