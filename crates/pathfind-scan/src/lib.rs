//! Directory scanning for pathfind.
//!
//! This crate turns a directory on disk into an immutable
//! [`FileTree`] snapshot that a search can walk.
//!
//! # Overview
//!
//! - **Parallel traversal** via jwalk
//! - **Progress updates** via broadcast channels
//! - **Ignore globs** and hidden-file filtering applied while reading directories
//! - **Stable order**: directories first, then files, each sorted by name
//!
//! # Example
//!
//! ```rust,no_run
//! use pathfind_scan::{JwalkScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/project");
//! let scanner = JwalkScanner::new();
//! let tree = scanner.scan(&config).unwrap();
//!
//! println!("Total files: {}", tree.total_files());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use pathfind_scan::{JwalkScanner, ScanConfig};
//!
//! let scanner = JwalkScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Scanned {} files", progress.files_scanned);
//!     }
//! });
//! ```

mod progress;
mod scanner;

pub use progress::ScanProgress;
pub use scanner::JwalkScanner;

// Re-export core types for convenience
pub use pathfind_core::{
    FileNode, FileTree, NodeKind, ScanConfig, ScanError, SearchWarning, TreeStats, WarningKind,
};
