//! Search options and their compiled form.

use derive_builder::Builder;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use pathfind_core::SearchError;

/// Raw search options as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct SearchOptions {
    /// Text or regular expression to look for.
    pub pattern: String,

    /// Match case exactly.
    #[serde(default)]
    pub case_sensitive: bool,

    /// Only match whole words. Ignored in regex mode.
    #[serde(default)]
    pub whole_words: bool,

    /// Treat the pattern as a regular expression.
    #[serde(default)]
    pub regex: bool,

    /// Wildcard masks for file names (`*.rs`, `Cargo.?oml`). Empty means all files.
    #[serde(default)]
    pub file_masks: Vec<String>,
}

impl SearchOptions {
    /// Create a new options builder.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    /// Case-insensitive literal search for `pattern`.
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Compile into match criteria.
    pub fn compile(&self) -> Result<MatchCriteria, SearchError> {
        MatchCriteria::compile(&self.pattern, self.case_sensitive, self.whole_words, self.regex)
    }
}

/// Validated, compiled description of what to match.
///
/// Literal patterns are compiled as escaped expressions so both modes share
/// one matcher and one case folding rule.
#[derive(Debug, Clone)]
pub struct MatchCriteria {
    pattern: String,
    case_sensitive: bool,
    whole_words: bool,
    regex: bool,
    matcher: Option<Regex>,
}

impl MatchCriteria {
    /// Validate and compile a pattern.
    ///
    /// An empty pattern compiles to criteria that never match.
    pub fn compile(
        pattern: &str,
        case_sensitive: bool,
        whole_words: bool,
        regex: bool,
    ) -> Result<Self, SearchError> {
        let matcher = if pattern.is_empty() {
            None
        } else {
            let source = if regex {
                pattern.to_string()
            } else {
                regex::escape(pattern)
            };
            let compiled = RegexBuilder::new(&source)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| SearchError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            Some(compiled)
        };

        Ok(Self {
            pattern: pattern.to_string(),
            case_sensitive,
            whole_words: whole_words && !regex,
            regex,
            matcher,
        })
    }

    /// The pattern as entered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whole-word filtering in effect (always false in regex mode).
    pub fn whole_words(&self) -> bool {
        self.whole_words
    }

    pub fn is_regex(&self) -> bool {
        self.regex
    }

    /// Whether these criteria can never match.
    pub fn is_empty(&self) -> bool {
        self.matcher.is_none()
    }

    pub(crate) fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }
}
