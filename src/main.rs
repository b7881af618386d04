//! RegiSena console
//!
//! Maintains the personas and equipos registries from a line-driven session.

mod catalog;
mod cli;
mod config;
mod controller;
mod error;
mod form;
mod logging;
mod records;
mod session;
mod store;
mod ui;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::catalog::{EquipmentCatalog, StaticCatalog};
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::session::Session;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Config { subcommand } => {
            // Config commands use minimal logging
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::Catalog { config, json } => {
            logging::init_simple(tracing::Level::WARN)?;
            let config = AppConfig::load(config.as_deref())?;
            print_catalog(&catalog::load_catalog(&config.catalog)?, json)
        }
        Commands::Session {
            config,
            slice,
            script,
        } => {
            let mut config = AppConfig::load(config.as_deref())?;
            if let Some(slice) = slice {
                config.session.default_slice = slice
                    .parse()
                    .map_err(|e: String| Error::config_field_invalid("--slice", e))?;
            }

            // The guards must be kept alive for the lifetime of the program
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;
            info!(version = env!("CARGO_PKG_VERSION"), "Starting RegiSena console");

            run_session(config, script)
        }
    }
}

/// Run the session on a script file, or on stdin
fn run_session(config: AppConfig, script: Option<String>) -> Result<()> {
    let catalog: Arc<dyn EquipmentCatalog> = Arc::new(catalog::load_catalog(&config.catalog)?);
    let mut session = Session::new(catalog, config.session, io::stdout().lock());

    match script {
        Some(path) => {
            let path = PathBuf::from(path);
            let file = File::open(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            info!(script = %path.display(), "Replaying session script");
            session.run(BufReader::new(file))
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                session.run_interactive()
            } else {
                session.run(stdin.lock())
            }
        }
    }
}

fn print_catalog(catalog: &StaticCatalog, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        return Ok(());
    }

    println!("Equipment catalog ({}, {} entries)", catalog.origin(), catalog.len());
    for entry in catalog.entries() {
        println!("{:>4}  {:<8} {}", entry.id.0, entry.code, entry.name);
    }
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: cli::ConfigSubcommand) -> Result<()> {
    use cli::ConfigSubcommand;

    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = AppConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let created = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", created.display());
        }
        ConfigSubcommand::Validate { config } => {
            AppConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
