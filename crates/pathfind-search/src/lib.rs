//! Find and replace in path over a [`FileTree`](pathfind_core::FileTree).
//!
//! The pipeline for one search is:
//!
//! 1. [`SearchOptions`] compile into [`MatchCriteria`] and a [`FileFilter`].
//!    Invalid patterns are rejected before anything is read.
//! 2. [`ScopeResolver`] turns a [`ScopeSelection`] into a subtree, widening
//!    to the whole tree when the selection cannot be found.
//! 3. [`TreeWalker`] visits the subtree depth-first, runs the
//!    [`MatchEngine`] on every included file and reports progress once per
//!    file, polling a [`Cancellation`] before each one.
//! 4. Matching files are added to a [`ResultTree`] that mirrors only the
//!    directories containing matches.
//!
//! # Example
//!
//! ```rust
//! use pathfind_core::MemoryContentSource;
//! use pathfind_search::{NeverCancel, NoProgress, SearchOptions, SearchRequest, Searcher};
//!
//! let source = MemoryContentSource::with_files(
//!     "/project/root",
//!     [("a.txt", "foo bar foo"), ("sub/b.txt", "FOO")],
//! );
//! let tree = source.tree("/project/root");
//!
//! let request = SearchRequest::new(SearchOptions::literal("foo"));
//! let report = Searcher::new(&source)
//!     .search(&tree, &request, &NoProgress, &NeverCancel)
//!     .unwrap();
//!
//! assert_eq!(report.results.total_matches(), 3);
//! assert_eq!(report.results.headline(), "3 occurrences of 'foo' in root");
//! ```

mod criteria;
mod engine;
mod mask;
mod progress;
mod replace;
mod result;
mod scope;
mod session;
mod walker;
mod worker;

pub use criteria::{MatchCriteria, SearchOptions, SearchOptionsBuilder};
pub use engine::{MatchEngine, MatchLocation, UniversalLines, universal_lines};
pub use mask::{FileFilter, wildcard_to_regex};
pub use progress::{Cancellation, NeverCancel, NoProgress, ProgressSink, SearchProgress};
pub use replace::{Replacement, apply_to_line};
pub use result::{ResultKind, ResultNode, ResultTree};
pub use scope::{ResolvedScope, ScopeRegistry, ScopeResolver, ScopeSelection};
pub use session::{SearchReport, SearchRequest, SearchStatus, Searcher, search};
pub use walker::{TreeWalker, WalkOutcome};
pub use worker::{SearchEvent, SearchHandle, spawn_search, spawn_search_with_registry};

// Re-export core types for convenience
pub use pathfind_core::{ContentSource, FileTree, SearchError, SearchWarning, WarningKind};
