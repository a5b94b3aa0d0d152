//! Core types and traits for pathfind.
//!
//! This crate provides the fundamental data structures used throughout
//! pathfind: file nodes, tree snapshots, scan configuration, error types
//! and the content readers that supply file text to a search.

mod config;
mod error;
mod node;
mod source;
mod tree;

pub use config::{IgnoreRules, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, SearchError, SearchWarning, WarningKind};
pub use node::{FileNode, NodeKind};
pub use source::{
    ContentSource, DEFAULT_MAX_FILE_SIZE, FsContentSource, MemoryContentSource, decode_text,
};
pub use tree::{FileTree, TreeStats};
