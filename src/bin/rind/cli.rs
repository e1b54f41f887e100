//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rind::util::ConfigSetting;

/// Rind - A metadata-only build backend for Python meta-packages
#[derive(Parser)]
#[command(name = "rind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Meta package directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Build backend config setting, may be repeated
    #[arg(short = 'C', long = "config-setting", value_name = "KEY=VALUE", global = true)]
    pub config_settings: Vec<ConfigSetting>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List extra requirements for building a wheel
    GetRequiresForBuildWheel(RequiresArgs),

    /// List extra requirements for building an sdist
    GetRequiresForBuildSdist(RequiresArgs),

    /// Write the .dist-info directory without building a wheel
    PrepareMetadataForBuildWheel(PrepareMetadataArgs),

    /// Build the metadata-only wheel
    BuildWheel(BuildWheelArgs),

    /// Build the source distribution
    BuildSdist(BuildSdistArgs),

    /// Print the resolved metadata as JSON
    Metadata,
}

#[derive(Args)]
pub struct RequiresArgs {
    /// Print a JSON array instead of one requirement per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PrepareMetadataArgs {
    /// Directory to write the .dist-info directory into
    pub metadata_directory: PathBuf,
}

#[derive(Args)]
pub struct BuildWheelArgs {
    /// Directory to write the wheel into
    pub wheel_directory: PathBuf,

    /// Directory holding metadata from prepare-metadata-for-build-wheel
    #[arg(long)]
    pub metadata_directory: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildSdistArgs {
    /// Directory to write the sdist into
    pub sdist_directory: PathBuf,
}
