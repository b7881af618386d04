//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the RegiSena console.

use clap::{Parser, Subcommand};

/// RegiSena - personas and equipment registry console
///
/// Maintains the personas and equipos registries in an interactive session:
/// list records, open the edit form, assign catalog equipment and save.
#[derive(Parser, Debug)]
#[command(name = "regisena")]
#[command(author, version, long_about = None)]
#[command(about = "RegiSena - personas and equipment registry console")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session (reads commands from stdin or a script)
    Session {
        /// Path to configuration file
        #[arg(short, long, env = "REGISENA_CONFIG")]
        config: Option<String>,

        /// Slice to start on (personas, equipos)
        #[arg(long)]
        slice: Option<String>,

        /// Read session commands from a file instead of stdin
        #[arg(long)]
        script: Option<String>,
    },

    /// Print the equipment catalog
    Catalog {
        /// Path to configuration file
        #[arg(short, long, env = "REGISENA_CONFIG")]
        config: Option<String>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
