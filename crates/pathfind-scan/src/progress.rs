//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files scanned so far.
    pub files_scanned: u64,
    /// Number of directories scanned so far.
    pub dirs_scanned: u64,
    /// Current path being scanned.
    pub current_path: PathBuf,
    /// Number of errors/warnings encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters for a scan in progress.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_scanned: u64,
    dirs_scanned: u64,
    errors_count: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_scanned: 0,
            dirs_scanned: 0,
            errors_count: 0,
        }
    }

    /// Record a file; returns its 1-based ordinal.
    pub fn record_file(&mut self) -> u64 {
        self.files_scanned += 1;
        self.files_scanned
    }

    pub fn record_dir(&mut self) {
        self.dirs_scanned += 1;
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn snapshot(&self, current_path: PathBuf) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            current_path,
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_snapshot() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.record_file(), 1);
        assert_eq!(tracker.record_file(), 2);
        tracker.record_dir();
        tracker.record_error();

        let progress = tracker.snapshot(PathBuf::from("/x"));
        assert_eq!(progress.files_scanned, 2);
        assert_eq!(progress.total_items(), 3);
        assert_eq!(progress.errors_count, 1);
        assert_eq!(progress.current_path, PathBuf::from("/x"));
    }

    #[test]
    fn test_rate_without_elapsed_time() {
        assert_eq!(ScanProgress::new().files_per_second(), 0.0);
    }
}
