//! Defaults remembered between searches.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::{ScopeChoice, SearchForm};
use crate::history::BoundedHistory;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No per-user config directory on this platform.
    #[error("No config directory available")]
    NoConfigDir,

    /// Settings file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for this format.
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be serialized.
    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The form has no pattern to search for.
    #[error("Search pattern is empty")]
    EmptyPattern,
}

/// What a search dialog remembers between invocations.
///
/// Owned by the caller and passed to the form layer; nothing in the search
/// core reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSessionDefaults {
    pub search_history: BoundedHistory,
    pub replace_history: BoundedHistory,
    pub mask_history: BoundedHistory,
    pub directory_history: BoundedHistory,
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub regex: bool,
    pub scope: ScopeChoice,
    pub scope_name: String,
    pub mask_enabled: bool,
}

impl SearchSessionDefaults {
    /// Default settings file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pathfind").join("session.toml"))
    }

    /// Remember the inputs and toggles of a submitted form.
    pub fn record(&mut self, form: &SearchForm) {
        self.search_history.insert_or_promote(form.pattern.as_str());
        if let Some(replacement) = &form.replacement {
            self.replace_history.insert_or_promote(replacement.as_str());
        }
        if form.mask_enabled {
            self.mask_history.insert_or_promote(form.masks.trim());
        }
        if form.scope == ScopeChoice::Directory {
            self.directory_history.insert_or_promote(form.directory.trim());
        }

        self.case_sensitive = form.case_sensitive;
        self.whole_words = form.whole_words;
        self.regex = form.regex;
        self.scope = form.scope;
        self.scope_name = form.scope_name.clone();
        self.mask_enabled = form.mask_enabled;
    }

    /// A fresh form with the remembered toggles and an empty pattern.
    pub fn restore(&self) -> SearchForm {
        SearchForm {
            pattern: String::new(),
            replacement: None,
            case_sensitive: self.case_sensitive,
            whole_words: self.whole_words,
            regex: self.regex,
            scope: self.scope,
            directory: self
                .directory_history
                .most_recent()
                .unwrap_or_default()
                .to_string(),
            scope_name: self.scope_name.clone(),
            mask_enabled: self.mask_enabled,
            masks: self.mask_history.most_recent().unwrap_or_default().to_string(),
        }
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        for history in [
            &mut settings.search_history,
            &mut settings.replace_history,
            &mut settings.mask_history,
            &mut settings.directory_history,
        ] {
            history.normalize();
        }

        tracing::info!(path = %path.display(), "loaded search settings");
        Ok(settings)
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)?;

        tracing::info!(path = %path.display(), "saved search settings");
        Ok(())
    }

    /// Load from the default location, or return defaults.
    ///
    /// Unreadable or malformed files are logged and replaced by defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring search settings");
            Self::default()
        })
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_restore() {
        let mut defaults = SearchSessionDefaults::default();
        let form = SearchForm {
            pattern: "needle".into(),
            replacement: Some("thread".into()),
            regex: true,
            scope: ScopeChoice::Directory,
            directory: "/src".into(),
            mask_enabled: true,
            masks: "*.rs;*.toml".into(),
            ..Default::default()
        };
        defaults.record(&form);

        assert_eq!(defaults.search_history.most_recent(), Some("needle"));
        assert_eq!(defaults.replace_history.most_recent(), Some("thread"));

        let restored = defaults.restore();
        assert!(restored.pattern.is_empty());
        assert!(restored.regex);
        assert_eq!(restored.scope, ScopeChoice::Directory);
        assert_eq!(restored.directory, "/src");
        assert_eq!(restored.masks, "*.rs;*.toml");
    }

    #[test]
    fn test_disabled_masks_are_not_recorded() {
        let mut defaults = SearchSessionDefaults::default();
        defaults.record(&SearchForm {
            pattern: "x".into(),
            masks: "*.md".into(),
            ..Default::default()
        });
        assert!(defaults.mask_history.is_empty());
        assert!(defaults.directory_history.is_empty());
    }
}
