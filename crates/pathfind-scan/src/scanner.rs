//! JWalk-based parallel directory scanner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;

use pathfind_core::{FileNode, FileTree, ScanConfig, ScanError, SearchWarning, WarningKind};

use crate::progress::{ProgressTracker, ScanProgress};

/// Files between two progress broadcasts.
const PROGRESS_INTERVAL: u64 = 1000;

/// Scanner that builds a [`FileTree`] snapshot using jwalk for parallel traversal.
pub struct JwalkScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl JwalkScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the configured root into a tree snapshot.
    ///
    /// Children of every directory are ordered directories first, then by
    /// name. Unreadable entries become warnings on the returned tree.
    pub fn scan(&self, config: &ScanConfig) -> Result<FileTree, ScanError> {
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let mut tracker = ProgressTracker::new();
        let mut warnings = Vec::new();

        let mut entries = self.collect_entries(config, &root_path, &mut tracker, &mut warnings)?;
        let mut root = build_node(&root_path, &mut entries);
        root.sort_children();

        let _ = self.progress_tx.send(tracker.snapshot(root_path.clone()));
        tracing::debug!(
            root = %root_path.display(),
            files = root.file_count(),
            dirs = root.dir_count(),
            warnings = warnings.len(),
            "scan finished"
        );

        Ok(FileTree::new(root, root_path).with_warnings(warnings))
    }

    /// Collect all entries using jwalk, grouped by parent directory.
    fn collect_entries(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        tracker: &mut ProgressTracker,
        warnings: &mut Vec<SearchWarning>,
    ) -> Result<HashMap<PathBuf, Vec<EntryInfo>>, ScanError> {
        let rules = config.ignore_rules()?;

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        // Ignored directories are pruned here so they are never descended into.
        let walker = WalkDir::new(root_path)
            .parallelism(parallelism)
            .skip_hidden(false)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| match entry {
                    Ok(e) => !rules.should_skip(&e.file_name().to_string_lossy()),
                    Err(_) => true,
                });
            });

        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    tracing::warn!(path = %path.display(), error = %err, "cannot read entry");
                    tracker.record_error();
                    warnings.push(SearchWarning::new(
                        path,
                        err.to_string(),
                        WarningKind::ReadError,
                    ));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();

            let size = if file_type.is_file() {
                match entry.metadata() {
                    Ok(m) => m.len(),
                    Err(err) => {
                        tracker.record_error();
                        warnings.push(SearchWarning::new(
                            &path,
                            err.to_string(),
                            WarningKind::MetadataError,
                        ));
                        continue;
                    }
                }
            } else if file_type.is_dir() {
                0
            } else {
                // Unfollowed symlinks and special files have no content to search.
                continue;
            };

            let Some(parent) = path.parent() else {
                continue;
            };

            if file_type.is_dir() {
                tracker.record_dir();
            } else if tracker.record_file() % PROGRESS_INTERVAL == 0 {
                let _ = self.progress_tx.send(tracker.snapshot(path.clone()));
            }

            entries_by_parent
                .entry(parent.to_path_buf())
                .or_default()
                .push(EntryInfo {
                    name: entry.file_name().to_string_lossy().into(),
                    path: path.clone(),
                    size,
                    is_dir: file_type.is_dir(),
                });
        }

        Ok(entries_by_parent)
    }
}

impl Default for JwalkScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    size: u64,
    is_dir: bool,
}

/// Recursively build a node and its children.
fn build_node(path: &Path, entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>) -> FileNode {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let children = entries_by_parent
        .remove(path)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            if entry.is_dir {
                let mut child = build_node(&entry.path, entries_by_parent);
                child.name = entry.name;
                child
            } else {
                FileNode::file(entry.name, entry.size)
            }
        })
        .collect();

    FileNode::directory(name, children)
}
