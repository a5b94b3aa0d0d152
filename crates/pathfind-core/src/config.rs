//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Configuration for building a tree from disk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Name patterns to ignore (gitignore-style globs, matched on the entry name).
    #[builder(default = "default_ignore_patterns()")]
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Number of threads for scanning (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_ignore_patterns() -> Vec<String> {
    [".git", "target", "node_modules"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        if let Some(ref patterns) = self.ignore_patterns {
            build_ignore_set(patterns).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            max_depth: None,
            ignore_patterns: default_ignore_patterns(),
            threads: 0,
            include_hidden: false,
        }
    }

    /// Compile the ignore patterns and hidden-file policy into rules.
    pub fn ignore_rules(&self) -> Result<IgnoreRules, ScanError> {
        Ok(IgnoreRules {
            set: build_ignore_set(&self.ignore_patterns)?,
            include_hidden: self.include_hidden,
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Compiled ignore rules for entry names.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    include_hidden: bool,
}

impl IgnoreRules {
    /// Check if an entry with this name should be skipped.
    pub fn should_skip(&self, name: &str) -> bool {
        if !self.include_hidden && name.starts_with('.') {
            return true;
        }
        self.set.is_match(name)
    }
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        // "target/" names a directory; entries are matched by name only.
        let trimmed = trimmed.trim_end_matches('/');
        let glob = GlobBuilder::new(trimmed)
            .literal_separator(true)
            .build()
            .map_err(|e| ScanError::InvalidConfig {
                message: format!("ignore pattern '{pattern}': {e}"),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidConfig {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .threads(4usize)
            .follow_symlinks(true)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.threads, 4);
        assert!(config.follow_symlinks);
        assert_eq!(config.ignore_patterns, default_ignore_patterns());
    }

    #[test]
    fn test_config_builder_rejects_bad_glob() {
        let result = ScanConfig::builder()
            .root("/test")
            .ignore_patterns(vec!["[unclosed".to_string()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_ignore_rules() {
        let config = ScanConfig::builder()
            .root("/test")
            .ignore_patterns(vec![
                "node_modules".to_string(),
                "*.log".to_string(),
                "build/".to_string(),
            ])
            .build()
            .unwrap();
        let rules = config.ignore_rules().unwrap();

        assert!(rules.should_skip("node_modules"));
        assert!(rules.should_skip("test.log"));
        assert!(rules.should_skip("build"));
        assert!(!rules.should_skip("src"));
    }

    #[test]
    fn test_hidden_entries() {
        let mut config = ScanConfig::new("/test");
        config.ignore_patterns.clear();

        assert!(config.ignore_rules().unwrap().should_skip(".env"));

        config.include_hidden = true;
        let rules = config.ignore_rules().unwrap();
        assert!(!rules.should_skip(".env"));
        assert!(!rules.should_skip("src"));
    }
}
