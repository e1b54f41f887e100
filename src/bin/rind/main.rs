//! Rind CLI - A metadata-only build backend for Python meta-packages

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use rind::{ConfigError, VersionError};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::HookContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = help_for(&e) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

/// The fix suggested by a typed error, if the failure carries one.
fn help_for(err: &anyhow::Error) -> Option<String> {
    let diagnostic: &dyn Diagnostic = match err.downcast_ref::<ConfigError>() {
        Some(config) => config,
        None => err.downcast_ref::<VersionError>()?,
    };
    diagnostic.help().map(|help| help.to_string())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries hook results.
    let filter = if cli.verbose {
        EnvFilter::new("rind=debug")
    } else {
        EnvFilter::new("rind=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let ctx = HookContext::new(cli.project_root, cli.config_settings)?;

    match cli.command {
        Commands::GetRequiresForBuildWheel(args) => commands::requires::execute_wheel(args, &ctx),
        Commands::GetRequiresForBuildSdist(args) => commands::requires::execute_sdist(args, &ctx),
        Commands::PrepareMetadataForBuildWheel(args) => {
            commands::prepare_metadata::execute(args, &ctx)
        }
        Commands::BuildWheel(args) => commands::build_wheel::execute(args, &ctx),
        Commands::BuildSdist(args) => commands::build_sdist::execute(args, &ctx),
        Commands::Metadata => commands::metadata::execute(&ctx),
    }
}
