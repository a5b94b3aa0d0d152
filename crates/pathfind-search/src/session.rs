//! The synchronous search entry point.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::Display;

use pathfind_core::{ContentSource, FileTree, SearchError, SearchWarning};

use crate::criteria::SearchOptions;
use crate::engine::MatchEngine;
use crate::mask::FileFilter;
use crate::progress::{Cancellation, ProgressSink};
use crate::replace::Replacement;
use crate::result::ResultTree;
use crate::scope::{ScopeRegistry, ScopeResolver, ScopeSelection};
use crate::walker::TreeWalker;

/// Everything needed to run one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub options: SearchOptions,
    #[serde(default)]
    pub scope: ScopeSelection,
    /// Replacement text, for "replace in path".
    #[serde(default)]
    pub replacement: Option<String>,
}

impl SearchRequest {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            scope: ScopeSelection::WholeTree,
            replacement: None,
        }
    }

    /// Restrict the search to a scope.
    pub fn in_scope(mut self, scope: ScopeSelection) -> Self {
        self.scope = scope;
        self
    }

    /// Turn the search into a replace preview.
    pub fn replace_with(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// Terminal status of a search.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SearchStatus {
    #[strum(to_string = "completed")]
    Completed,
    #[strum(to_string = "cancelled")]
    Cancelled,
    #[strum(to_string = "failed: {reason}")]
    Failed { reason: String },
}

/// Results of a finished or cancelled search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub results: ResultTree,
    pub status: SearchStatus,
    /// Files skipped while searching, and scope fallbacks.
    pub warnings: Vec<SearchWarning>,
    /// Files visited, matched or not.
    pub files_searched: u64,
    /// Files in the resolved scope.
    pub files_total: u64,
    pub duration: Duration,
}

/// Runs searches against trees whose content comes from one source.
#[derive(Clone, Copy)]
pub struct Searcher<'a> {
    source: &'a dyn ContentSource,
    registry: Option<&'a dyn ScopeRegistry>,
}

impl<'a> Searcher<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self {
            source,
            registry: None,
        }
    }

    /// Use `registry` to resolve named scopes.
    pub fn with_registry(mut self, registry: &'a dyn ScopeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Run a search on the calling thread.
    ///
    /// The pattern and masks are compiled first; if either is invalid the
    /// error is returned before any file is visited or progress reported.
    pub fn search(
        &self,
        tree: &FileTree,
        request: &SearchRequest,
        progress: &dyn ProgressSink,
        cancel: &dyn Cancellation,
    ) -> Result<SearchReport, SearchError> {
        let start = Instant::now();
        let options = &request.options;
        let criteria = options.compile()?;
        let filter = FileFilter::new(options.file_masks.as_slice())?;
        let replacement = request
            .replacement
            .as_ref()
            .map(|text| Replacement::new(text.as_str(), criteria.is_regex()));

        let scope = ScopeResolver::new(self.registry).resolve(&request.scope, tree);
        tracing::debug!(
            pattern = criteria.pattern(),
            scope = %scope.path.display(),
            masks = filter.masks().len(),
            "search started"
        );

        let mut results = ResultTree::new(criteria.pattern(), scope.display_name.as_str());
        if let Some(replacement) = &replacement {
            results.add_info(replacement.info_label());
        }

        let engine = MatchEngine::new(&criteria).with_replacement(replacement.as_ref());
        let walker = TreeWalker::new(engine, &filter, self.source);
        let outcome = walker.walk(&scope, &mut results, progress, cancel);

        let mut warnings: Vec<SearchWarning> = scope.fallback.iter().cloned().collect();
        warnings.extend(outcome.warnings);

        let status = if outcome.cancelled {
            SearchStatus::Cancelled
        } else {
            SearchStatus::Completed
        };

        Ok(SearchReport {
            results,
            status,
            warnings,
            files_searched: outcome.files_visited,
            files_total: scope.total_files(),
            duration: start.elapsed(),
        })
    }
}

/// Run a search and fold failures into the status.
///
/// Invalid patterns yield an empty result tree and [`SearchStatus::Failed`].
pub fn search(
    tree: &FileTree,
    request: &SearchRequest,
    source: &dyn ContentSource,
    progress: &dyn ProgressSink,
    cancel: &dyn Cancellation,
) -> (ResultTree, SearchStatus) {
    match Searcher::new(source).search(tree, request, progress, cancel) {
        Ok(report) => (report.results, report.status),
        Err(err) => (
            ResultTree::new(request.options.pattern.as_str(), tree.root_name()),
            SearchStatus::Failed {
                reason: err.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NeverCancel, NoProgress};
    use pathfind_core::MemoryContentSource;

    #[test]
    fn test_status_display() {
        assert_eq!(SearchStatus::Completed.to_string(), "completed");
        let failed = SearchStatus::Failed {
            reason: "boom".into(),
        };
        assert_eq!(failed.to_string(), "failed: boom");
    }

    #[test]
    fn test_replace_request_adds_info_node() {
        let source = MemoryContentSource::with_files("/s/root", [("a.txt", "foo")]);
        let tree = source.tree("/s/root");
        let request = SearchRequest::new(SearchOptions::literal("foo")).replace_with("bar");

        let report = Searcher::new(&source)
            .search(&tree, &request, &NoProgress, &NeverCancel)
            .unwrap();

        let info = &report.results.root().children[0];
        assert_eq!(info.label.as_str(), "Replace occurrences with 'bar'");
        let first = report.results.first_match().unwrap();
        assert_eq!(first.replacement.as_deref(), Some("bar"));
    }

    #[test]
    fn test_search_folds_errors_into_status() {
        let source = MemoryContentSource::new();
        let tree = source.tree("/s/root");
        let mut options = SearchOptions::literal("(");
        options.regex = true;

        let (results, status) = search(
            &tree,
            &SearchRequest::new(options),
            &source,
            &NoProgress,
            &NeverCancel,
        );
        assert!(results.is_empty());
        assert!(matches!(status, SearchStatus::Failed { .. }));
    }
}
