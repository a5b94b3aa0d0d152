//! The search form being edited and its derived control state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

use pathfind_search::{ScopeSelection, SearchOptions, SearchRequest};

use crate::defaults::SettingsError;

/// Scope radio choice of the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ScopeChoice {
    #[default]
    Project,
    Directory,
    Scope,
}

/// Criteria in progress, as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    pub pattern: String,
    /// Present when the form is a "replace in path" form.
    pub replacement: Option<String>,
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub regex: bool,
    pub scope: ScopeChoice,
    /// Directory text, used with [`ScopeChoice::Directory`].
    pub directory: String,
    /// Scope name, used with [`ScopeChoice::Scope`].
    pub scope_name: String,
    pub mask_enabled: bool,
    /// `;`-separated file name masks.
    pub masks: String,
}

impl SearchForm {
    /// Split `;`-separated mask text into masks.
    pub fn parse_masks(text: &str) -> Vec<String> {
        text.split(';')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_replace(&self) -> bool {
        self.replacement.is_some()
    }

    /// Build the request the core runs.
    ///
    /// Fails on an empty pattern. An empty directory searches the whole tree.
    pub fn to_request(&self) -> Result<SearchRequest, SettingsError> {
        if self.pattern.is_empty() {
            return Err(SettingsError::EmptyPattern);
        }

        let file_masks = if self.mask_enabled {
            Self::parse_masks(&self.masks)
        } else {
            Vec::new()
        };

        let scope = match self.scope {
            ScopeChoice::Project => ScopeSelection::WholeTree,
            ScopeChoice::Directory if self.directory.trim().is_empty() => {
                ScopeSelection::WholeTree
            }
            ScopeChoice::Directory => {
                ScopeSelection::Directory(PathBuf::from(self.directory.trim()))
            }
            ScopeChoice::Scope => ScopeSelection::Named(self.scope_name.clone()),
        };

        let options = SearchOptions {
            pattern: self.pattern.clone(),
            case_sensitive: self.case_sensitive,
            whole_words: self.whole_words,
            regex: self.regex,
            file_masks,
        };

        Ok(SearchRequest {
            options,
            scope,
            replacement: self.replacement.clone(),
        })
    }
}

/// Which inputs of the form are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub whole_words_enabled: bool,
    pub directory_enabled: bool,
    pub scope_enabled: bool,
    pub masks_enabled: bool,
}

impl ControlState {
    pub fn derive(form: &SearchForm) -> Self {
        Self {
            whole_words_enabled: !form.regex,
            directory_enabled: form.scope == ScopeChoice::Directory,
            scope_enabled: form.scope == ScopeChoice::Scope,
            masks_enabled: form.mask_enabled,
        }
    }
}
