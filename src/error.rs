//! Error types for setup-texlive
//!
//! All modules use `SetupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for setup-texlive operations
pub type SetupResult<T> = Result<T, SetupError>;

/// All errors that can occur in setup-texlive
#[derive(Error, Debug)]
pub enum SetupError {
    // Pre-flight errors
    #[error("Unsupported platform {0}")]
    UnsupportedPlatform(String),

    #[error("Unsupported architecture {0}")]
    UnsupportedArchitecture(String),

    #[error("package-file or packages input required")]
    MissingPackageInput,

    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error("Invalid value for input {name}: {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("Failed to read package file {path}: {source}")]
    PackageFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Mirror errors
    #[error("No mirror available for {requested}")]
    NoMirrorAvailable { requested: String },

    #[error("Malformed mirror catalog from {url}: {reason}")]
    CatalogParse { url: String, reason: String },

    // Install/update errors
    #[error("{description} failed with status code {status}")]
    DownloadFailed { description: String, status: u16 },

    #[error("{description} failed with status code {status}")]
    InstallerExit { description: String, status: i32 },

    #[error("{description} failed with status code {status}")]
    PackageManagerExit { description: String, status: i32 },

    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Failed to extract archive into {dest}: {reason}")]
    Archive { dest: PathBuf, reason: String },

    // Cache store errors
    #[error("Cache store error: {0}")]
    CacheStore(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SetupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an HTTP transport error
    pub fn http(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Http {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingPackageInput => {
                Some("Pass --packages with inline package names or --package-file with a path")
            }
            Self::NoMirrorAvailable { .. } => {
                Some("Check the requested texlive_version or pass --repository explicitly")
            }
            Self::UnsupportedArchitecture(_) => {
                Some("Only x86_64 and aarch64 Linux runners are supported")
            }
            Self::PackageManagerExit { .. } => {
                Some("Set accept-stale to keep a previously cached installation when updates fail")
            }
            _ => None,
        }
    }
}
