//! Running searches on a background worker.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use pathfind_core::{ContentSource, FileTree, SearchError};

use crate::progress::SearchProgress;
use crate::scope::ScopeRegistry;
use crate::session::{SearchReport, SearchRequest, Searcher};

/// Channel size for worker events.
const SEARCH_CHANNEL_SIZE: usize = 256;

/// Event sent by a background search.
#[derive(Debug)]
pub enum SearchEvent {
    /// A file was visited.
    Progress(SearchProgress),
    /// The search ended. This is always the last event.
    Finished(Result<SearchReport, SearchError>),
}

/// Handle to a search running on a worker.
///
/// Progress events are delivered in traversal order and the worker waits
/// for room in the channel, so events should be drained while it runs.
/// Dropping the handle cancels the search.
pub struct SearchHandle {
    events: mpsc::Receiver<SearchEvent>,
    cancel: CancellationToken,
    _cancel_on_drop: DropGuard,
}

impl SearchHandle {
    /// Ask the worker to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this search when tripped.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next event, or `None` once the worker is gone.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        self.events.recv().await
    }

    /// Wait for the final report, discarding progress.
    pub async fn finish(mut self) -> Result<SearchReport, SearchError> {
        while let Some(event) = self.events.recv().await {
            if let SearchEvent::Finished(result) = event {
                return result;
            }
        }
        Err(SearchError::Worker {
            message: "search worker exited without a result".to_string(),
        })
    }
}

/// Start a search on a blocking worker thread.
///
/// Must be called from within a tokio runtime.
pub fn spawn_search(
    tree: Arc<FileTree>,
    request: SearchRequest,
    source: Arc<dyn ContentSource>,
) -> SearchHandle {
    spawn_search_with_registry(tree, request, source, None)
}

/// Start a search that resolves named scopes through `registry`.
pub fn spawn_search_with_registry(
    tree: Arc<FileTree>,
    request: SearchRequest,
    source: Arc<dyn ContentSource>,
    registry: Option<Arc<dyn ScopeRegistry>>,
) -> SearchHandle {
    let (tx, rx) = mpsc::channel(SEARCH_CHANNEL_SIZE);
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    tokio::spawn(async move {
        let progress_tx = tx.clone();

        // The walk is synchronous and reads files, so keep it off the async workers.
        let result = tokio::task::spawn_blocking(move || {
            let mut searcher = Searcher::new(source.as_ref());
            if let Some(registry) = registry.as_deref() {
                searcher = searcher.with_registry(registry);
            }
            let sink = |progress: &SearchProgress| {
                let _ = progress_tx.blocking_send(SearchEvent::Progress(progress.clone()));
            };
            searcher.search(&tree, &request, &sink, &worker_cancel)
        })
        .await
        .unwrap_or_else(|e| {
            Err(SearchError::Worker {
                message: e.to_string(),
            })
        });

        let _ = tx.send(SearchEvent::Finished(result)).await;
    });

    SearchHandle {
        events: rx,
        _cancel_on_drop: cancel.clone().drop_guard(),
        cancel,
    }
}
