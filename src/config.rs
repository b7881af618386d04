//! Configuration system for the RegiSena console
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (REGISENA_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::records::Slice;

/// Main console configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interactive session behaviour
    pub session: SessionSettings,

    /// Equipment catalog source
    pub catalog: CatalogSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Slice active when the session starts
    pub default_slice: Slice,

    /// Prompt printed before each command in interactive mode
    pub prompt: String,

    /// Echo each command back (useful when replaying scripts)
    pub echo_commands: bool,
}

/// Equipment catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog TOML file (unset = bundled catalog)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_slice: Slice::Personas,
            prompt: "regisena> ".to_string(),
            echo_commands: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        let config_file = Self::find_config_file(config_path)?;
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides()?;

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            } else {
                return Err(Error::config_not_found(path));
            }
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            PathBuf::from("regisena.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("regisena").join("config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".regisena").join("config.toml"))
                .unwrap_or_default(),
            // System config (Linux)
            PathBuf::from("/etc/regisena/config.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Session settings
        if let Ok(val) = std::env::var("REGISENA_DEFAULT_SLICE") {
            self.session.default_slice = val
                .parse()
                .map_err(|e: String| Error::config_field_invalid("session.default_slice", e))?;
        }
        if let Ok(val) = std::env::var("REGISENA_PROMPT") {
            self.session.prompt = val;
        }

        // Catalog settings
        if let Ok(val) = std::env::var("REGISENA_CATALOG_FILE") {
            self.catalog.file = Some(val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("REGISENA_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("REGISENA_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("REGISENA_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        Ok(())
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.catalog.file {
            self.catalog.file = Some(expand_path(file));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.session.prompt.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "session.prompt",
                "Prompt cannot be empty",
            ));
        }

        if let Some(ref file) = self.catalog.file {
            if file.trim().is_empty() {
                return Err(Error::config_field_invalid(
                    "catalog.file",
                    "Catalog file path cannot be empty; remove the key to use the bundled catalog",
                ));
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.logging.max_files == 0 {
            return Err(Error::config_validation("logging.max_files must be at least 1"));
        }

        Ok(())
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".regisena")
                .join("config.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# RegiSena Console Configuration

[session]
# Slice shown when the session starts: personas or equipos
default_slice = "personas"

# Prompt printed before each command
prompt = "regisena> "

# Echo commands back (handy when replaying a script)
echo_commands = false

[catalog]
# Equipment catalog file (comment out to use the bundled catalog)
# file = "~/.regisena/catalog.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.regisena/logs/regisena.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
