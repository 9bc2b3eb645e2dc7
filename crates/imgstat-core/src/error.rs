//! Error types for imgstat.
//!
//! Errors are split by phase: matching files on disk, then probing each
//! file for metadata. Every error carries the directory or file it concerns.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for an imgstat run.
#[derive(Error, Debug)]
pub enum ImgstatError {
    /// File matching failed before any probing started
    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    /// A file could not be probed
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Writing the report failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while expanding directories into file lists.
#[derive(Error, Debug)]
pub enum MatchError {
    /// The generated glob pattern could not be compiled
    #[error("Invalid pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The directory does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// An entry under the directory could not be read
    #[error("Cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// The matcher task for a directory did not complete
    #[error("Matcher for {directory} failed: {message}")]
    Task { directory: PathBuf, message: String },
}

/// Errors raised while probing a single file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The file could not be opened or stat'ed
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a decodable image
    #[error("Cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The image format could not be determined
    #[error("Unknown image format for {0}")]
    UnknownFormat(PathBuf),

    /// The probe task panicked or was cancelled
    #[error("Probe task for {path} failed: {message}")]
    Task { path: PathBuf, message: String },
}

impl ProbeError {
    /// File this error concerns.
    pub(crate) fn path(&self) -> &std::path::Path {
        match self {
            ProbeError::Io { path, .. }
            | ProbeError::Decode { path, .. }
            | ProbeError::Task { path, .. } => path,
            ProbeError::UnknownFormat(path) => path,
        }
    }
}

/// Convenience type alias for imgstat results.
pub type Result<T> = std::result::Result<T, ImgstatError>;

/// Convenience type alias for probe results.
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
