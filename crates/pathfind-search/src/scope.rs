//! Scope selection and resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pathfind_core::{FileNode, FileTree, SearchWarning};

/// Which part of the tree to search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeSelection {
    /// The whole tree.
    #[default]
    WholeTree,
    /// A directory, by absolute path.
    Directory(PathBuf),
    /// A named scope looked up in a [`ScopeRegistry`].
    Named(String),
}

/// Maps scope names to directories in the tree.
pub trait ScopeRegistry: Send + Sync {
    /// Absolute path of the directory named `name`, if known.
    fn lookup(&self, name: &str) -> Option<PathBuf>;
}

impl ScopeRegistry for HashMap<String, PathBuf> {
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.get(name).cloned()
    }
}

impl<F> ScopeRegistry for F
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self(name)
    }
}

/// A scope resolved against a tree.
#[derive(Debug, Clone)]
pub struct ResolvedScope<'t> {
    /// Root node of the subtree to walk.
    pub node: &'t FileNode,
    /// Absolute path of `node`.
    pub path: PathBuf,
    /// Name shown in the result headline.
    pub display_name: String,
    /// Set when the selection was not found and the whole tree is used.
    pub fallback: Option<SearchWarning>,
}

impl ResolvedScope<'_> {
    /// Number of files that will be visited.
    pub fn total_files(&self) -> u64 {
        self.node.file_count()
    }
}

/// Resolves a [`ScopeSelection`] to a subtree.
///
/// Selections that cannot be found widen to the whole tree with a
/// [`WarningKind::ScopeFallback`](pathfind_core::WarningKind::ScopeFallback)
/// warning instead of failing the search.
#[derive(Clone, Copy, Default)]
pub struct ScopeResolver<'a> {
    registry: Option<&'a dyn ScopeRegistry>,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(registry: Option<&'a dyn ScopeRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve<'t>(&self, selection: &ScopeSelection, tree: &'t FileTree) -> ResolvedScope<'t> {
        match selection {
            ScopeSelection::WholeTree => whole_tree(tree, None),
            ScopeSelection::Directory(dir) => match find_dir(tree, dir) {
                Some((path, node)) => ResolvedScope {
                    node,
                    path,
                    display_name: dir.display().to_string(),
                    fallback: None,
                },
                None => fall_back(tree, dir),
            },
            ScopeSelection::Named(name) => {
                let dir = self.registry.and_then(|r| r.lookup(name));
                match dir.as_deref().and_then(|d| find_dir(tree, d)) {
                    Some((path, node)) => ResolvedScope {
                        node,
                        path,
                        display_name: name.clone(),
                        fallback: None,
                    },
                    None => fall_back(tree, dir.as_deref().unwrap_or(Path::new(name))),
                }
            }
        }
    }
}

fn find_dir<'t>(tree: &'t FileTree, dir: &Path) -> Option<(PathBuf, &'t FileNode)> {
    tree.find(dir).filter(|(_, node)| node.is_dir())
}

fn whole_tree<'t>(tree: &'t FileTree, fallback: Option<SearchWarning>) -> ResolvedScope<'t> {
    ResolvedScope {
        node: &tree.root,
        path: tree.root_path.clone(),
        display_name: tree.root_name().to_string(),
        fallback,
    }
}

fn fall_back<'t>(tree: &'t FileTree, requested: &Path) -> ResolvedScope<'t> {
    tracing::warn!(
        requested = %requested.display(),
        root = %tree.root_path.display(),
        "scope not found, searching whole tree"
    );
    whole_tree(tree, Some(SearchWarning::scope_fallback(requested)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfind_core::WarningKind;

    fn tree() -> FileTree {
        FileTree::from_paths("/p/root", [("a.txt", 1u64), ("sub/b.txt", 1), ("sub/c.md", 1)])
    }

    #[test]
    fn test_whole_tree() {
        let tree = tree();
        let scope = ScopeResolver::default().resolve(&ScopeSelection::WholeTree, &tree);
        assert_eq!(scope.display_name, "root");
        assert_eq!(scope.total_files(), 3);
        assert!(scope.fallback.is_none());
    }

    #[test]
    fn test_directory_scope() {
        let tree = tree();
        let selection = ScopeSelection::Directory(PathBuf::from("/p/root/sub"));
        let scope = ScopeResolver::default().resolve(&selection, &tree);
        assert_eq!(scope.path, PathBuf::from("/p/root/sub"));
        assert_eq!(scope.total_files(), 2);
        assert!(scope.fallback.is_none());
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let tree = tree();
        for dir in ["/p/root/gone", "/elsewhere", "/p/root/a.txt"] {
            let selection = ScopeSelection::Directory(PathBuf::from(dir));
            let scope = ScopeResolver::default().resolve(&selection, &tree);
            assert_eq!(scope.path, PathBuf::from("/p/root"));
            assert_eq!(scope.total_files(), 3);
            assert_eq!(scope.fallback.unwrap().kind, WarningKind::ScopeFallback);
        }
    }

    #[test]
    fn test_named_scope() {
        let tree = tree();
        let mut registry = HashMap::new();
        registry.insert("Sources".to_string(), PathBuf::from("/p/root/sub"));

        let resolver = ScopeResolver::new(Some(&registry));
        let scope = resolver.resolve(&ScopeSelection::Named("Sources".into()), &tree);
        assert_eq!(scope.display_name, "Sources");
        assert_eq!(scope.total_files(), 2);

        let scope = resolver.resolve(&ScopeSelection::Named("Unknown".into()), &tree);
        assert!(scope.fallback.is_some());
        assert_eq!(scope.total_files(), 3);
    }

    #[test]
    fn test_named_scope_from_closure() {
        let tree = tree();
        let registry = |name: &str| (name == "all").then(|| PathBuf::from("/p/root"));
        let resolver = ScopeResolver::new(Some(&registry));
        let scope = resolver.resolve(&ScopeSelection::Named("all".into()), &tree);
        assert!(scope.fallback.is_none());
        assert_eq!(scope.display_name, "all");
    }
}
