use pathfind_core::{
    ContentSource, FileNode, FileTree, FsContentSource, MemoryContentSource, NodeKind, ScanConfig,
    SearchError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_node_kind_checks() {
    let file = NodeKind::File { size: 10 };
    let dir = NodeKind::Directory {
        file_count: 0,
        dir_count: 0,
    };

    assert!(file.is_file());
    assert!(!file.is_dir());
    assert!(dir.is_dir());
    assert!(!dir.is_file());
}

#[test]
fn test_tree_from_nodes() {
    let root = FileNode::directory(
        "proj",
        vec![
            FileNode::directory("src", vec![FileNode::file("main.rs", 120)]),
            FileNode::file("README.md", 40),
        ],
    );
    let tree = FileTree::new(root, "/work/proj");

    assert_eq!(tree.root_name(), "proj");
    assert_eq!(tree.total_files(), 2);
    assert_eq!(tree.total_dirs(), 1);
    assert_eq!(tree.stats.total_size, 160);
    assert!(!tree.has_warnings());

    let (path, node) = tree.find(Path::new("/work/proj/src/main.rs")).unwrap();
    assert_eq!(path, PathBuf::from("/work/proj/src/main.rs"));
    assert_eq!(node.size(), 120);
}

#[test]
fn test_tree_serialization() {
    let tree = FileTree::from_paths("/r", [("a/b.txt", 1u64)]);
    let json = serde_json::to_string(&tree).unwrap();
    let back: FileTree = serde_json::from_str(&json).unwrap();

    assert_eq!(back.total_files(), 1);
    assert!(back.find(Path::new("/r/a/b.txt")).is_some());
}

#[test]
fn test_scan_config_defaults() {
    let config = ScanConfig::new("/some/path");

    assert_eq!(config.root, PathBuf::from("/some/path"));
    assert!(!config.follow_symlinks);
    assert!(!config.include_hidden);
    assert!(config.max_depth.is_none());

    let rules = config.ignore_rules().unwrap();
    assert!(rules.should_skip(".git"));
    assert!(rules.should_skip("target"));
    assert!(!rules.should_skip("main.rs"));
}

#[test]
fn test_scan_config_requires_root() {
    assert!(ScanConfig::builder().build().is_err());
    assert!(ScanConfig::builder().root("").build().is_err());
}

#[test]
fn test_fs_source_reads_text_and_rejects_binary() {
    let temp = TempDir::new().unwrap();
    let text = temp.path().join("notes.txt");
    let binary = temp.path().join("image.bin");
    fs::write(&text, "line one\nline two\n").unwrap();
    fs::write(&binary, [0x89, b'P', b'N', b'G', 0, 0, 1]).unwrap();

    let source = FsContentSource::default();
    assert_eq!(source.read(&text).unwrap(), "line one\nline two\n");

    let err = source.read(&binary).unwrap_err();
    assert!(matches!(err, SearchError::Undecodable { .. }));
    assert!(err.to_warning().is_some());
}

#[test]
fn test_memory_source_replaces_content() {
    let mut source = MemoryContentSource::new();
    assert!(source.is_empty());

    source.insert("/m/x.txt", "old");
    source.insert("/m/x.txt", "new");
    assert_eq!(source.len(), 1);
    assert_eq!(source.read(Path::new("/m/x.txt")).unwrap(), "new");

    let tree = source.tree("/m");
    assert_eq!(tree.total_files(), 1);
}
