//! File tree container and statistics.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SearchWarning, WarningKind};
use crate::node::FileNode;

/// Summary statistics for a tree snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories (root excluded).
    pub total_dirs: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Compute stats by walking a node.
    pub fn from_node(root: &FileNode) -> Self {
        let mut stats = Self::new();
        stats.collect(root, 0);
        stats
    }

    fn collect(&mut self, node: &FileNode, depth: u32) {
        for child in &node.children {
            if child.is_dir() {
                self.record_dir(depth + 1);
                self.collect(child, depth + 1);
            } else {
                self.record_file(child.size(), depth + 1);
            }
        }
    }
}

/// An immutable snapshot of a project tree.
///
/// The tree is never mutated while a search runs over it; a refresh produces
/// a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTree {
    /// Root node of the tree.
    pub root: FileNode,

    /// Absolute path of the root node.
    pub root_path: PathBuf,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warnings encountered while building the tree.
    pub warnings: Vec<SearchWarning>,
}

impl FileTree {
    /// Create a new file tree. Directory counts are recomputed.
    pub fn new(mut root: FileNode, root_path: impl Into<PathBuf>) -> Self {
        root.update_counts();
        let stats = TreeStats::from_node(&root);
        Self {
            root,
            root_path: root_path.into(),
            stats,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings collected by the supplier.
    pub fn with_warnings(mut self, warnings: Vec<SearchWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Build an in-memory tree from file paths relative to `root_path`.
    ///
    /// Intermediate directories are created on demand. Children keep the
    /// order in which they were first seen.
    pub fn from_paths<I, P>(root_path: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<Path>,
    {
        let root_path = root_path.into();
        let mut root = FileNode::directory(root_name_of(&root_path), Vec::new());
        let mut warnings = Vec::new();

        'files: for (path, size) in files {
            let names: Vec<String> = path
                .as_ref()
                .components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();

            let Some((file_name, dirs)) = names.split_last() else {
                continue;
            };

            let mut current = &mut root;
            for dir in dirs {
                let existing = current
                    .children
                    .iter()
                    .position(|c| c.name.as_str() == dir.as_str());
                let index = match existing {
                    Some(i) if current.children[i].is_dir() => i,
                    Some(_) => {
                        warnings.push(path_conflict(&root_path, path.as_ref(), dir));
                        continue 'files;
                    }
                    None => {
                        current.children.push(FileNode::directory(dir.as_str(), Vec::new()));
                        current.children.len() - 1
                    }
                };
                current = &mut current.children[index];
            }

            if current.child(file_name).is_some_and(FileNode::is_dir) {
                warnings.push(path_conflict(&root_path, path.as_ref(), file_name));
                continue;
            }
            current.children.push(FileNode::file(file_name.as_str(), size));
        }

        Self::new(root, root_path).with_warnings(warnings)
    }

    /// Display name of the root node.
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Get the total number of files.
    pub fn total_files(&self) -> u64 {
        self.root.file_count()
    }

    /// Get the total number of directories.
    pub fn total_dirs(&self) -> u64 {
        self.root.dir_count()
    }

    /// Check if there were any warnings while building the tree.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Find the node at an absolute path.
    ///
    /// Paths are compared component by component against the node names,
    /// without touching the filesystem. Returns the matched path alongside
    /// the node.
    pub fn find(&self, path: &Path) -> Option<(PathBuf, &FileNode)> {
        let relative = path.strip_prefix(&self.root_path).ok()?;

        let mut current = &self.root;
        let mut resolved = self.root_path.clone();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str()?;
                    current = current.child(name)?;
                    resolved.push(name);
                }
                Component::CurDir => {}
                _ => return None,
            }
        }

        Some((resolved, current))
    }
}

fn path_conflict(root_path: &Path, path: &Path, name: &str) -> SearchWarning {
    SearchWarning::new(
        root_path.join(path),
        format!("'{name}' is both a file and a directory, path skipped"),
        WarningKind::PathConflict,
    )
}

/// Display name for a root path: its last component, or the whole path.
fn root_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
