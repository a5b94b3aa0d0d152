//! File and directory node types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Regular file.
    File {
        /// Size in bytes as reported by the supplier.
        size: u64,
    },
    /// Directory.
    Directory {
        /// Total number of files in this subtree.
        file_count: u64,
        /// Total number of directories in this subtree.
        dir_count: u64,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A single file or directory in the tree.
///
/// Nodes only know their own name. The absolute path of a node is derived
/// from the tree's root path plus the names on the way down, see
/// [`FileTree::find`](crate::FileTree::find).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Node type and associated metadata.
    pub kind: NodeKind,

    /// Children nodes (directories only), in the supplier's native order.
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new file node.
    pub fn file(name: impl Into<CompactString>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File { size },
            children: Vec::new(),
        }
    }

    /// Create a new directory node with the given children.
    ///
    /// Counts are computed from the children right away.
    pub fn directory(name: impl Into<CompactString>, children: Vec<FileNode>) -> Self {
        let mut node = Self {
            name: name.into(),
            kind: NodeKind::Directory {
                file_count: 0,
                dir_count: 0,
            },
            children,
        };
        node.update_counts();
        node
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Size in bytes for files, 0 for directories.
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::File { size } => size,
            NodeKind::Directory { .. } => 0,
        }
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Get file count for directories, 1 for files.
    pub fn file_count(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory { file_count, .. } => *file_count,
            NodeKind::File { .. } => 1,
        }
    }

    /// Get directory count for directories.
    pub fn dir_count(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory { dir_count, .. } => *dir_count,
            NodeKind::File { .. } => 0,
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FileNode> {
        self.children.iter().find(|c| c.name.as_str() == name)
    }

    /// Sort children directories first, then by name, recursively.
    pub fn sort_children(&mut self) {
        self.children
            .sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));
        for child in &mut self.children {
            child.sort_children();
        }
    }

    /// Recompute directory counts for this subtree, bottom-up.
    pub fn update_counts(&mut self) {
        if !self.is_dir() {
            return;
        }

        let mut files: u64 = 0;
        let mut dirs: u64 = 0;

        for child in &mut self.children {
            child.update_counts();
            match &child.kind {
                NodeKind::File { .. } => files += 1,
                NodeKind::Directory {
                    file_count: fc,
                    dir_count: dc,
                } => {
                    files += fc;
                    dirs += dc + 1;
                }
            }
        }

        self.kind = NodeKind::Directory {
            file_count: files,
            dir_count: dirs,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_node_creation() {
        let node = FileNode::file("test.txt", 1024);
        assert!(node.is_file());
        assert!(!node.is_dir());
        assert_eq!(node.size(), 1024);
        assert_eq!(node.file_count(), 1);
    }

    #[test]
    fn test_directory_counts_are_recursive() {
        let node = FileNode::directory(
            "root",
            vec![
                FileNode::file("a.txt", 1),
                FileNode::directory(
                    "sub",
                    vec![FileNode::file("b.txt", 1), FileNode::file("c.txt", 1)],
                ),
            ],
        );
        assert_eq!(node.file_count(), 3);
        assert_eq!(node.dir_count(), 1);
    }

    #[test]
    fn test_sort_children_dirs_first() {
        let mut node = FileNode::directory(
            "root",
            vec![
                FileNode::file("b.txt", 1),
                FileNode::directory("zeta", vec![]),
                FileNode::file("a.txt", 1),
                FileNode::directory("alpha", vec![]),
            ],
        );
        node.sort_children();
        let names: Vec<_> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "a.txt", "b.txt"]);
    }
}
