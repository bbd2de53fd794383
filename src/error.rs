// src/error.rs

//! Error types shared across the library

use crate::hash::HashAlgorithm;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout lpak
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding, fetching, verifying, or scripting a manifest
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest bytes could not be decoded
    #[error("Failed to decode {format} manifest: {message}")]
    ParseError {
        format: &'static str,
        message: String,
    },

    /// Manifest could not be serialized
    #[error("Failed to encode {format} manifest: {message}")]
    SerializeError {
        format: &'static str,
        message: String,
    },

    /// Transport failure or non-2xx response while fetching a source
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// A computed digest did not match the manifest
    #[error("{source_ref} ({path}): {algorithm} sums do not match: expected {expected}, got {actual}")]
    ChecksumMismatch {
        algorithm: HashAlgorithm,
        /// Archive reference from the manifest, or the file checked
        source_ref: String,
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Filesystem failure with path context
    #[error("I/O error: {0}")]
    IoError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A source or destination path cannot be used
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Release identifier could not be generated or parsed
    #[error("Release error: {0}")]
    ReleaseError(String),

    /// The build script template referenced a variable with no value
    #[error("Template variable not defined: {0}")]
    MissingVariable(String),

    /// Archive creation failed
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// A component could not be initialized (HTTP client, etc.)
    #[error("Initialization error: {0}")]
    InitError(String),
}

impl Error {
    /// Whether this error is a digest mismatch
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. })
    }
}
