//! Error types for persona-community
//!
//! Provides structured error handling with:
//! - A small set of domain error kinds callers can branch on
//!   (validation, not-found, membership constraint, storage)
//! - Numeric error codes and CLI exit codes
//! - User-facing suggestions

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for library operations
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
    IoNotFound = 203,

    // Validation errors (3xx)
    InvalidInput = 300,
    EmptyCatalog = 301,

    // Lookup errors (4xx)
    NotFound = 400,

    // Membership constraint errors (5xx)
    CommunityFull = 500,
    AlreadyMember = 501,
    NotAMember = 502,
    BelowMinimum = 503,

    // Storage errors (6xx)
    StorageFailure = 600,
    Serialization = 601,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            600..=699 => 60,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of stored entity, used by not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Persona,
    Identity,
    Community,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Persona => write!(f, "persona"),
            Entity::Identity => write!(f, "identity"),
            Entity::Community => write!(f, "community"),
        }
    }
}

/// A membership operation that would break a community invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("community {community_id} is at its maximum of {max_members} members")]
    CommunityFull {
        community_id: String,
        max_members: usize,
    },

    #[error("identity {identity_id} is already a member of community {community_id}")]
    AlreadyMember {
        community_id: String,
        identity_id: String,
    },

    #[error("identity {identity_id} is not a member of community {community_id}")]
    NotAMember {
        community_id: String,
        identity_id: String,
    },

    #[error("removing a member would drop community {community_id} below its minimum of {min_members} members")]
    BelowMinimum {
        community_id: String,
        min_members: usize,
    },
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Domain Errors
    // ─────────────────────────────────────────────────────────────

    /// Caller-supplied input was rejected
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A referenced persona, identity or community does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    /// A membership change would violate community limits
    #[error("Constraint violated: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// Opaque failure reported by the storage collaborator
    #[error("Storage error: {message}")]
    Storage { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

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
    // IO / Serialization Errors
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

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Validation { field, .. } => match field.as_deref() {
                Some("personas") => ErrorCode::EmptyCatalog,
                _ => ErrorCode::InvalidInput,
            },
            Error::NotFound { .. } => ErrorCode::NotFound,
            Error::Constraint(violation) => match violation {
                ConstraintViolation::CommunityFull { .. } => ErrorCode::CommunityFull,
                ConstraintViolation::AlreadyMember { .. } => ErrorCode::AlreadyMember,
                ConstraintViolation::NotAMember { .. } => ErrorCode::NotAMember,
                ConstraintViolation::BelowMinimum { .. } => ErrorCode::BelowMinimum,
            },
            Error::Storage { .. } => ErrorCode::StorageFailure,

            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) | Error::Json(_) => ErrorCode::Serialization,
        }
    }

    /// Whether this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Whether this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this is a membership constraint error
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::Constraint(_))
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Validation { field, .. } if field.as_deref() == Some("personas") => Some(
                "No personas are stored yet. Run 'persona-community persona seed' to install the starter set.",
            ),
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-community config init' to create a default configuration file.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-community config validate' to see details.",
            ),
            Error::NotFound { .. } => Some(
                "List existing records with 'persona-community community list' or 'persona list'.",
            ),
            Error::Constraint(ConstraintViolation::CommunityFull { .. }) => Some(
                "Raise max_members with an update before adding more members.",
            ),
            Error::Constraint(ConstraintViolation::BelowMinimum { .. }) => Some(
                "Lower min_members with an update before removing more members.",
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code().as_str(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a validation error naming the offending field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not-found error
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}
