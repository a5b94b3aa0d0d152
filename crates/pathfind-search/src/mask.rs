//! File name masks.

use regex::{RegexSet, RegexSetBuilder};

use pathfind_core::SearchError;

/// Inclusion filter built from wildcard file name masks.
///
/// A file is included when its name matches any mask. An empty filter
/// includes every file. Names are always matched case-insensitively.
#[derive(Debug, Clone)]
pub struct FileFilter {
    masks: Vec<String>,
    set: Option<RegexSet>,
}

impl FileFilter {
    /// Compile masks. Blank masks are dropped.
    pub fn new<S: AsRef<str>>(masks: &[S]) -> Result<Self, SearchError> {
        let masks: Vec<String> = masks
            .iter()
            .map(|m| m.as_ref().trim())
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();

        if masks.is_empty() {
            return Ok(Self::all());
        }

        let patterns: Vec<String> = masks.iter().map(|m| wildcard_to_regex(m)).collect();
        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| SearchError::InvalidFileMask {
                mask: masks.join(";"),
                message: e.to_string(),
            })?;

        Ok(Self {
            masks,
            set: Some(set),
        })
    }

    /// A filter that includes every file.
    pub fn all() -> Self {
        Self {
            masks: Vec::new(),
            set: None,
        }
    }

    /// Check if a file with this name should be searched.
    pub fn includes(&self, name: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(name),
            None => true,
        }
    }

    pub fn masks(&self) -> &[String] {
        &self.masks
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Convert a shell wildcard into an anchored regular expression.
pub fn wildcard_to_regex(mask: &str) -> String {
    let mut out = String::with_capacity(mask.len() + 8);
    out.push('^');
    let mut buf = [0u8; 4];
    for c in mask.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}
