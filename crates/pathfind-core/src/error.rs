//! Error types for tree construction and searching.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a tree from disk.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that can occur while preparing or running a search.
///
/// Only the pattern variants abort a search. The per-file variants are
/// produced by content readers and turned into [`SearchWarning`]s by the
/// walker.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A file mask could not be turned into a matcher.
    #[error("Invalid file mask '{mask}': {message}")]
    InvalidFileMask { mask: String, message: String },

    /// File could not be read.
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is binary or not valid UTF-8.
    #[error("Cannot decode {path} as text")]
    Undecodable { path: PathBuf },

    /// File exceeds the reader's size limit.
    #[error("File too large ({size} bytes): {path}")]
    TooLarge { path: PathBuf, size: u64 },

    /// File is not known to the content source.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// The background worker failed.
    #[error("Search worker failed: {message}")]
    Worker { message: String },
}

impl SearchError {
    /// Create a read error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Unreadable { path, source },
        }
    }

    /// Convert a per-file error into a warning.
    ///
    /// Returns `None` for errors that are not tied to a file.
    pub fn to_warning(&self) -> Option<SearchWarning> {
        let (path, kind) = match self {
            Self::Unreadable { path, .. } | Self::NotFound { path } => {
                (path, WarningKind::Unreadable)
            }
            Self::Undecodable { path } => (path, WarningKind::Undecodable),
            Self::TooLarge { path, .. } => (path, WarningKind::TooLarge),
            _ => return None,
        };
        Some(SearchWarning::new(path.clone(), self.to_string(), kind))
    }
}

/// Kind of non-fatal warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// File could not be read.
    Unreadable,
    /// File is binary or not valid UTF-8.
    Undecodable,
    /// File was larger than the reader accepts.
    TooLarge,
    /// The selected scope was not found and the whole tree was searched.
    ScopeFallback,
    /// Error reading a directory entry while building the tree.
    ReadError,
    /// Error reading metadata while building the tree.
    MetadataError,
    /// A path needs a file and a directory under the same name.
    PathConflict,
}

/// Non-fatal warning encountered while building a tree or searching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl SearchWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a scope fallback warning.
    pub fn scope_fallback(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Scope not found, searching whole tree: {}", path.display()),
            path,
            kind: WarningKind::ScopeFallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_search_error_io_maps_not_found() {
        let err = SearchError::io(
            "/test/missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, SearchError::NotFound { .. }));
        assert_eq!(err.to_warning().unwrap().kind, WarningKind::Unreadable);
    }

    #[test]
    fn test_per_file_error_becomes_warning() {
        let err = SearchError::Undecodable {
            path: PathBuf::from("/a/b.bin"),
        };
        let warning = err.to_warning().unwrap();
        assert_eq!(warning.kind, WarningKind::Undecodable);
        assert_eq!(warning.path, PathBuf::from("/a/b.bin"));

        let fatal = SearchError::InvalidPattern {
            pattern: "(".into(),
            message: "unclosed group".into(),
        };
        assert!(fatal.to_warning().is_none());
    }

    #[test]
    fn test_scope_fallback_warning() {
        let warning = SearchWarning::scope_fallback("/gone");
        assert_eq!(warning.kind, WarningKind::ScopeFallback);
        assert!(warning.message.contains("/gone"));
    }
}
