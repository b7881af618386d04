//! Error types for the RegiSena console
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Error context and chaining
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Catalog errors (3xx)
    CatalogNotFound = 300,
    CatalogParseError = 301,
    CatalogInvalid = 302,

    // Form errors (4xx)
    NoEquipmentSelected = 400,
    FormReadOnly = 401,
    LastAssignment = 402,
    AssignmentNotFound = 403,
    InvalidFieldValue = 404,
    FormNotOpen = 405,
    FormAlreadyOpen = 406,

    // Store errors (5xx)
    DuplicateRecord = 500,
    RowNotFound = 501,

    // Session errors (6xx)
    UnknownCommand = 600,
    CommandSyntax = 601,
    NotSupported = 602,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Catalog errors
            400..=499 => 40, // Form errors
            500..=599 => 50, // Store errors
            600..=699 => 60, // Session errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the console
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────

    /// Catalog file not found
    #[error("Equipment catalog not found: {path}")]
    CatalogNotFound { path: PathBuf },

    /// Catalog file could not be parsed
    #[error("Failed to parse equipment catalog {origin}: {message}")]
    CatalogParse { origin: String, message: String },

    /// Catalog parsed but breaks an invariant
    #[error("Invalid equipment catalog {origin}: {reason}")]
    CatalogInvalid { origin: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Form Errors
    // ─────────────────────────────────────────────────────────────

    /// Persona submitted without any selected equipment
    #[error("At least one equipment must be selected")]
    NoEquipmentSelected,

    /// Mutation attempted on a view-only form
    #[error("The form is open in view-only mode")]
    FormReadOnly,

    /// Attempt to remove the only remaining assignment
    #[error("Assignment {id} is the last one and cannot be removed")]
    LastAssignment { id: u64 },

    /// Assignment id not present in the working copy
    #[error("No equipment assignment with id {id}")]
    AssignmentNotFound { id: u64 },

    /// Field input rejected at entry time
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Form operation issued while the modal is closed
    #[error("No form is open")]
    FormNotOpen,

    /// List action issued while the modal is open
    #[error("A {noun} form is already open")]
    FormAlreadyOpen { noun: &'static str },

    // ─────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────

    /// A record with this identifier already exists
    #[error("Record {id} already exists")]
    DuplicateRecord { id: String },

    /// Row number outside the rendered table
    #[error("Row {row} does not exist ({len} rows)")]
    RowNotFound { row: usize, len: usize },

    // ─────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────

    /// Unrecognized session command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Command recognized but its arguments are malformed
    #[error("Usage: {usage}")]
    CommandSyntax { usage: &'static str },

    /// Operation not available for the active slice
    #[error("Not supported: {0}")]
    NotSupported(String),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::InternalError,

            Error::CatalogNotFound { .. } => ErrorCode::CatalogNotFound,
            Error::CatalogParse { .. } => ErrorCode::CatalogParseError,
            Error::CatalogInvalid { .. } => ErrorCode::CatalogInvalid,

            Error::NoEquipmentSelected => ErrorCode::NoEquipmentSelected,
            Error::FormReadOnly => ErrorCode::FormReadOnly,
            Error::LastAssignment { .. } => ErrorCode::LastAssignment,
            Error::AssignmentNotFound { .. } => ErrorCode::AssignmentNotFound,
            Error::InvalidFieldValue { .. } => ErrorCode::InvalidFieldValue,
            Error::FormNotOpen => ErrorCode::FormNotOpen,
            Error::FormAlreadyOpen { .. } => ErrorCode::FormAlreadyOpen,

            Error::DuplicateRecord { .. } => ErrorCode::DuplicateRecord,
            Error::RowNotFound { .. } => ErrorCode::RowNotFound,

            Error::UnknownCommand(_) => ErrorCode::UnknownCommand,
            Error::CommandSyntax { .. } => ErrorCode::CommandSyntax,
            Error::NotSupported(_) => ErrorCode::NotSupported,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the session can report the error and keep reading commands
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.code() as u16,
            400..=499 | 500..=599 | 600..=699
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'regisena config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'regisena config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            Error::CatalogNotFound { .. } => Some(
                "Check 'catalog.file' in the configuration or unset REGISENA_CATALOG_FILE to use the bundled catalog."
            ),
            Error::CatalogParse { .. } => Some(
                "Catalog files hold [[entries]] tables with id, code and name keys."
            ),
            Error::CatalogInvalid { .. } => Some(
                "Every catalog entry needs a unique id and a non-empty code and name."
            ),

            Error::NoEquipmentSelected => Some(
                "Use 'select <assignment> <catalog-id>' to pick an equipment before saving."
            ),
            Error::FormReadOnly => Some(
                "Close the form with 'cancel' and reopen it with 'edit <row>'."
            ),
            Error::LastAssignment { .. } => Some(
                "Use 'select <assignment> none' to clear the assignment instead."
            ),
            Error::FormNotOpen => Some(
                "Open a form first with 'new' or 'edit <row>'."
            ),
            Error::FormAlreadyOpen { .. } => Some(
                "Finish the open form with 'save' or 'cancel' first."
            ),
            Error::RowNotFound { .. } => Some(
                "Run 'list' to see the available row numbers."
            ),
            Error::UnknownCommand(_) => Some(
                "Type 'help' to list the available commands."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error as a session notice (no colors)
    pub fn format_for_notice(&self) -> String {
        match self.suggestion() {
            Some(hint) => format!("! {}\n  {}", self, hint),
            None => format!("! {}", self),
        }
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an invalid field value error
    pub fn invalid_field(
        field: impl fmt::Display,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidFieldValue {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a catalog invariant error
    pub fn catalog_invalid(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CatalogInvalid {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
