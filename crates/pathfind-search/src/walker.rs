//! Depth-first traversal of a resolved scope.

use std::ops::ControlFlow;
use std::path::PathBuf;

use compact_str::CompactString;

use pathfind_core::{ContentSource, FileNode, SearchWarning, WarningKind};

use crate::engine::MatchEngine;
use crate::mask::FileFilter;
use crate::progress::{Cancellation, ProgressSink, SearchProgress};
use crate::result::ResultTree;
use crate::scope::ResolvedScope;

/// Outcome of a walk, apart from the results themselves.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// The walk stopped early because cancellation was requested.
    pub cancelled: bool,
    /// Files visited, including excluded and unreadable ones.
    pub files_visited: u64,
    /// Files skipped because they could not be read.
    pub warnings: Vec<SearchWarning>,
}

/// Walks a subtree, matching every included file.
///
/// Children are visited in the tree's own order and a directory is entered
/// as soon as it is reached, so results follow a pre-order traversal. One
/// file is read and matched completely before the next one starts.
pub struct TreeWalker<'a> {
    engine: MatchEngine<'a>,
    filter: &'a FileFilter,
    source: &'a dyn ContentSource,
}

struct WalkState<'w> {
    progress: SearchProgress,
    scope_path: PathBuf,
    path: PathBuf,
    dirs: Vec<CompactString>,
    outcome: WalkOutcome,
    sink: &'w dyn ProgressSink,
    cancel: &'w dyn Cancellation,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        engine: MatchEngine<'a>,
        filter: &'a FileFilter,
        source: &'a dyn ContentSource,
    ) -> Self {
        Self {
            engine,
            filter,
            source,
        }
    }

    /// Walk `scope`, adding matching files to `results`.
    ///
    /// Cancellation is polled before each file. A cancelled walk leaves the
    /// matches of the files visited so far in `results`.
    pub fn walk(
        &self,
        scope: &ResolvedScope<'_>,
        results: &mut ResultTree,
        sink: &dyn ProgressSink,
        cancel: &dyn Cancellation,
    ) -> WalkOutcome {
        let total = scope.total_files();
        tracing::debug!(scope = %scope.path.display(), total, "walk started");

        let mut state = WalkState {
            progress: SearchProgress {
                total,
                ..SearchProgress::default()
            },
            scope_path: scope.path.clone(),
            path: scope.path.clone(),
            dirs: vec![scope.node.name.clone()],
            outcome: WalkOutcome::default(),
            sink,
            cancel,
        };

        let flow = self.visit_children(scope.node, &mut state, results);
        state.outcome.cancelled = flow.is_break();
        state.outcome.files_visited = state.progress.done;

        tracing::debug!(
            visited = state.progress.done,
            total,
            matches = results.total_matches(),
            cancelled = state.outcome.cancelled,
            "walk finished"
        );
        state.outcome
    }

    fn visit_children(
        &self,
        dir: &FileNode,
        state: &mut WalkState<'_>,
        results: &mut ResultTree,
    ) -> ControlFlow<()> {
        for child in &dir.children {
            if child.is_dir() {
                state.dirs.push(child.name.clone());
                state.path.push(child.name.as_str());
                let flow = self.visit_children(child, state, results);
                state.path.pop();
                state.dirs.pop();
                if flow.is_break() {
                    return flow;
                }
            } else {
                if state.cancel.is_cancelled() {
                    return ControlFlow::Break(());
                }
                state.path.push(child.name.as_str());
                self.visit_file(child, state, results);
                state.path.pop();
            }
        }
        ControlFlow::Continue(())
    }

    fn visit_file(&self, file: &FileNode, state: &mut WalkState<'_>, results: &mut ResultTree) {
        if self.filter.includes(&file.name) {
            match self.source.read(&state.path) {
                Ok(content) => {
                    let matches = self.engine.find_matches(&state.path, &content);
                    if !matches.is_empty() {
                        state.progress.matches_found += matches.len() as u64;
                        results.add_file(state.dirs.as_slice(), file.name.clone(), matches);
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %state.path.display(), error = %err, "skipping file");
                    let warning = err.to_warning().unwrap_or_else(|| {
                        SearchWarning::new(&state.path, err.to_string(), WarningKind::Unreadable)
                    });
                    state.outcome.warnings.push(warning);
                }
            }
        }

        state.progress.done += 1;
        state.progress.current_path = state.path.clone();
        state.progress.label = state
            .path
            .strip_prefix(&state.scope_path)
            .unwrap_or(&state.path)
            .display()
            .to_string();
        state.sink.report(&state.progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::MatchCriteria;
    use crate::progress::{NeverCancel, NoProgress};
    use crate::scope::{ScopeResolver, ScopeSelection};
    use pathfind_core::MemoryContentSource;
    use std::cell::RefCell;

    #[test]
    fn test_walk_visits_in_tree_order() {
        let source = MemoryContentSource::with_files(
            "/w/root",
            [("z.txt", "hit"), ("dir/a.txt", "hit"), ("b.txt", "miss")],
        );
        let tree = source.tree("/w/root");
        let scope = ScopeResolver::default().resolve(&ScopeSelection::WholeTree, &tree);

        let criteria = MatchCriteria::compile("hit", false, false, false).unwrap();
        let filter = FileFilter::all();
        let walker = TreeWalker::new(MatchEngine::new(&criteria), &filter, &source);

        let labels = RefCell::new(Vec::new());
        let sink = |p: &SearchProgress| labels.borrow_mut().push(p.label.clone());
        let mut results = ResultTree::new("hit", scope.display_name.clone());
        let outcome = walker.walk(&scope, &mut results, &sink, &NeverCancel);

        assert!(!outcome.cancelled);
        assert_eq!(outcome.files_visited, 3);
        assert_eq!(labels.into_inner(), vec!["z.txt", "dir/a.txt", "b.txt"]);

        let names: Vec<_> = results.files().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt"]);
    }

    #[test]
    fn test_unreadable_file_is_a_warning() {
        let mut source = MemoryContentSource::with_files("/w/root", [("a.txt", "hit")]);
        source.insert("/w/root/bin.dat", vec![0u8, 1, 2]);
        let tree = source.tree("/w/root");
        let scope = ScopeResolver::default().resolve(&ScopeSelection::WholeTree, &tree);

        let criteria = MatchCriteria::compile("hit", false, false, false).unwrap();
        let filter = FileFilter::all();
        let walker = TreeWalker::new(MatchEngine::new(&criteria), &filter, &source);
        let mut results = ResultTree::new("hit", "root");
        let outcome = walker.walk(&scope, &mut results, &NoProgress, &NeverCancel);

        assert_eq!(outcome.files_visited, 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::Undecodable);
        assert_eq!(results.total_matches(), 1);
    }
}
