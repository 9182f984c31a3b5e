//! Error types for titan-init operations.
//!
//! This module defines [`InitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every pipeline failure is fatal to the run; nothing is retried
//! - Variants group into the kinds reported by [`InitError::kind`]
//! - Use `anyhow::Error` (via `InitError::Other`) for unexpected errors
//! - Placeholder substitution has no error path at all

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for titan-init operations.
#[derive(Debug, Error)]
pub enum InitError {
    /// The registry answered with a non-success status.
    #[error("Registry returned HTTP {status} for '{package}': {body}")]
    Registry {
        package: String,
        status: u16,
        body: String,
    },

    /// The registry answered 200 but the metadata is unusable.
    #[error("Malformed registry metadata for '{package}': {message}")]
    RegistryMetadata { package: String, message: String },

    /// Network failure while talking to the registry or streaming an archive.
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive stream broke off after extraction had started.
    #[error("Download of {url} was interrupted: {message}")]
    Interrupted { url: String, message: String },

    /// Corrupt or truncated archive.
    #[error("Failed to extract archive: {message}")]
    Extraction { message: String },

    /// An archive entry tried to escape the staging directory.
    #[error("Archive entry escapes the staging directory: {path}")]
    PathTraversal { path: String },

    /// The archive does not contain exactly one top-level directory.
    #[error("Archive must contain exactly one top-level directory, found {found} top-level entries")]
    ArchiveLayout { found: usize },

    /// Filesystem failure with the path it happened on.
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured template directory is missing from the package.
    #[error("Template directory not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// A write was attempted before the destination was cleared.
    #[error("Destination {path} has not been cleared")]
    DestinationNotCleared { path: PathBuf },

    /// Settings file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid settings or answers.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of an [`InitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Registry,
    Transport,
    Extraction,
    Filesystem,
    Config,
    Other,
}

impl InitError {
    /// Wrap an I/O error with the path it concerns.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry { .. } | Self::RegistryMetadata { .. } => ErrorKind::Registry,
            Self::Transport { .. } | Self::Interrupted { .. } => ErrorKind::Transport,
            Self::Extraction { .. } | Self::PathTraversal { .. } | Self::ArchiveLayout { .. } => {
                ErrorKind::Extraction
            }
            Self::Filesystem { .. }
            | Self::TemplateNotFound { .. }
            | Self::DestinationNotCleared { .. }
            | Self::Io(_) => ErrorKind::Filesystem,
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => ErrorKind::Config,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

/// Result type alias for titan-init operations.
pub type Result<T> = std::result::Result<T, InitError>;
