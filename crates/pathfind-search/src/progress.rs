//! Progress reporting and cooperative cancellation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Progress of a running search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchProgress {
    /// Files visited so far, including files excluded by masks or unreadable.
    pub done: u64,
    /// Files in the resolved scope. Fixed for the whole walk.
    pub total: u64,
    /// Display label of the file just visited, relative to the scope.
    pub label: String,
    /// Absolute path of the file just visited.
    pub current_path: PathBuf,
    /// Matches found so far.
    pub matches_found: u64,
}

impl SearchProgress {
    /// Completion as a fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Receives progress updates from the walker.
pub trait ProgressSink {
    fn report(&self, progress: &SearchProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&SearchProgress),
{
    fn report(&self, progress: &SearchProgress) {
        self(progress)
    }
}

/// A sink that discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &SearchProgress) {}
}

/// A flag polled by the walker once per file.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Cancellation for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl<F> Cancellation for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// A search that is never cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_closure_sink() {
        let seen = Cell::new(0);
        let sink = |p: &SearchProgress| seen.set(p.done);
        sink.report(&SearchProgress {
            done: 3,
            total: 4,
            ..Default::default()
        });
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn test_cancellation_sources() {
        let flag = AtomicBool::new(false);
        assert!(!flag.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(Cancellation::is_cancelled(&flag));

        let token = CancellationToken::new();
        assert!(!Cancellation::is_cancelled(&token));
        token.cancel();
        assert!(Cancellation::is_cancelled(&token));

        assert!((|| true).is_cancelled());
        assert!(!NeverCancel.is_cancelled());
    }

    #[test]
    fn test_fraction() {
        let progress = SearchProgress {
            done: 1,
            total: 4,
            ..Default::default()
        };
        assert_eq!(progress.fraction(), 0.25);
        assert_eq!(SearchProgress::default().fraction(), 1.0);
    }
}
