//! Content readers for tree files.
//!
//! A [`FileTree`](crate::FileTree) only describes structure. File content is
//! read on demand through a [`ContentSource`], which lets the same search run
//! against files on disk or against an in-memory project.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::SearchError;
use crate::tree::FileTree;

/// Number of leading bytes inspected for NUL bytes.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Default size limit for [`FsContentSource`].
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Supplies the text content of files in a tree.
pub trait ContentSource: Send + Sync {
    /// Read the file at `path` as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String, SearchError>;
}

/// Decode raw bytes as text, rejecting binary content.
pub fn decode_text(path: &Path, bytes: Vec<u8>) -> Result<String, SearchError> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(SearchError::Undecodable {
            path: path.to_path_buf(),
        });
    }
    String::from_utf8(bytes).map_err(|_| SearchError::Undecodable {
        path: path.to_path_buf(),
    })
}

/// Reads file content from the local filesystem.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    max_file_size: u64,
}

impl FsContentSource {
    /// Create a reader with the default size limit.
    pub fn new() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the largest file size that will be read.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}

impl Default for FsContentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for FsContentSource {
    fn read(&self, path: &Path) -> Result<String, SearchError> {
        let mut file = File::open(path).map_err(|e| SearchError::io(path, e))?;
        let size = file.metadata().map_err(|e| SearchError::io(path, e))?.len();
        if size > self.max_file_size {
            tracing::debug!(path = %path.display(), size, "skipping oversized file");
            return Err(SearchError::TooLarge {
                path: path.to_path_buf(),
                size,
            });
        }

        let mut bytes = Vec::with_capacity(size as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| SearchError::io(path, e))?;
        decode_text(path, bytes)
    }
}

/// Holds file content in memory, keyed by absolute path.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentSource {
    files: HashMap<PathBuf, Vec<u8>>,
    order: Vec<PathBuf>,
}

impl MemoryContentSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from files relative to `root`.
    pub fn with_files<P, C>(root: impl AsRef<Path>, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<Vec<u8>>,
    {
        let mut source = Self::new();
        for (path, content) in files {
            source.insert(root.as_ref().join(path), content);
        }
        source
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        if self.files.insert(path.clone(), content.into()).is_none() {
            self.order.push(path);
        }
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files are held.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Build the tree of all files under `root`, in insertion order.
    pub fn tree(&self, root: impl Into<PathBuf>) -> FileTree {
        let root = root.into();
        let files: Vec<(PathBuf, u64)> = self
            .order
            .iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(&root).ok()?;
                let size = self.files.get(path).map_or(0, |c| c.len() as u64);
                Some((relative.to_path_buf(), size))
            })
            .collect();
        FileTree::from_paths(root, files)
    }
}

impl ContentSource for MemoryContentSource {
    fn read(&self, path: &Path) -> Result<String, SearchError> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| SearchError::NotFound {
                path: path.to_path_buf(),
            })?;
        decode_text(path, bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_decode_rejects_binary() {
        let path = Path::new("/x.bin");
        assert!(matches!(
            decode_text(path, vec![b'a', 0, b'b']),
            Err(SearchError::Undecodable { .. })
        ));
        assert!(matches!(
            decode_text(path, vec![0xff, 0xfe, 0x41]),
            Err(SearchError::Undecodable { .. })
        ));
        assert_eq!(decode_text(path, b"ok".to_vec()).unwrap(), "ok");
    }

    #[test]
    fn test_memory_source_tree_and_read() {
        let source = MemoryContentSource::with_files(
            "/p/root",
            [("a.txt", "foo bar foo"), ("sub/b.txt", "FOO")],
        );
        assert_eq!(source.len(), 2);

        let tree = source.tree("/p/root");
        assert_eq!(tree.total_files(), 2);
        assert_eq!(tree.root_name(), "root");

        let (path, _) = tree.find(Path::new("/p/root/sub/b.txt")).unwrap();
        assert_eq!(source.read(&path).unwrap(), "FOO");
        assert!(matches!(
            source.read(Path::new("/p/root/none.txt")),
            Err(SearchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_fs_source_limits() {
        let temp = TempDir::new().unwrap();
        let small = temp.path().join("small.txt");
        let big = temp.path().join("big.txt");
        fs::write(&small, "hello").unwrap();
        fs::write(&big, "x".repeat(64)).unwrap();

        let source = FsContentSource::new().with_max_file_size(16);
        assert_eq!(source.read(&small).unwrap(), "hello");
        assert!(matches!(
            source.read(&big),
            Err(SearchError::TooLarge { size: 64, .. })
        ));
        assert!(matches!(
            source.read(&temp.path().join("missing.txt")),
            Err(SearchError::NotFound { .. })
        ));
    }
}
