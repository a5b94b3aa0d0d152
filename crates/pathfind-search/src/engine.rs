//! Line-oriented matching of file content.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::criteria::MatchCriteria;
use crate::replace::Replacement;

/// A single occurrence of the pattern in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, in characters.
    pub column: usize,
    /// Byte range of the match within `line_text`.
    pub byte_range: Range<usize>,
    /// The matched text.
    pub matched: String,
    /// The whole line containing the match, without its terminator.
    pub line_text: String,
    /// Replacement text for this match, in replace mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl MatchLocation {
    /// Number of characters matched.
    pub fn len(&self) -> usize {
        self.matched.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Finds matches of compiled criteria in text.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'a> {
    criteria: &'a MatchCriteria,
    replacement: Option<&'a Replacement>,
}

impl<'a> MatchEngine<'a> {
    pub fn new(criteria: &'a MatchCriteria) -> Self {
        Self {
            criteria,
            replacement: None,
        }
    }

    /// Attach a replacement so each match carries a preview.
    pub fn with_replacement(mut self, replacement: Option<&'a Replacement>) -> Self {
        self.replacement = replacement;
        self
    }

    /// Find all matches in `content`, in line then column order.
    ///
    /// Matches within a line never overlap; empty matches are skipped.
    pub fn find_matches(&self, path: &Path, content: &str) -> Vec<MatchLocation> {
        let Some(re) = self.criteria.matcher() else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for (index, line) in universal_lines(content).enumerate() {
            let mut start = 0;
            // Characters before `counted_bytes`, carried from match to match.
            let mut counted_bytes = 0;
            let mut counted_chars = 0;
            while start <= line.len() {
                let Some(caps) = re.captures_at(line, start) else {
                    break;
                };
                let Some(m) = caps.get(0) else {
                    break;
                };

                if m.is_empty() {
                    start = next_char_boundary(line, m.end());
                    continue;
                }

                if self.criteria.whole_words() && !is_whole_word(line, m.range()) {
                    // Not a match; retry from the next character.
                    start = next_char_boundary(line, m.start());
                    continue;
                }

                counted_chars += line[counted_bytes..m.start()].chars().count();
                counted_bytes = m.start();

                found.push(MatchLocation {
                    path: path.to_path_buf(),
                    line: index + 1,
                    column: counted_chars,
                    byte_range: m.range(),
                    matched: m.as_str().to_string(),
                    line_text: line.to_string(),
                    replacement: self.replacement.map(|r| r.preview(&caps)),
                });
                start = m.end();
            }
        }
        found
    }
}

/// Byte offset just after the character at `at`, or past the end.
fn next_char_boundary(line: &str, at: usize) -> usize {
    match line[at..].chars().next() {
        Some(c) => at + c.len_utf8(),
        None => line.len() + 1,
    }
}

/// Word characters as the regex engine's Unicode `\b` sees them.
fn is_word_char(c: char) -> bool {
    regex_syntax::is_word_character(c)
}

/// Check that a match is bounded by non-word characters or the line edges.
fn is_whole_word(line: &str, range: Range<usize>) -> bool {
    let before = line[..range.start].chars().next_back();
    let after = line[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Split text on `\r\n`, `\r` and `\n`.
///
/// A trailing terminator does not produce an empty final line.
pub fn universal_lines(content: &str) -> UniversalLines<'_> {
    UniversalLines {
        rest: Some(content),
    }
}

/// Iterator returned by [`universal_lines`].
#[derive(Debug, Clone)]
pub struct UniversalLines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for UniversalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        if rest.is_empty() {
            self.rest = None;
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(i) => {
                let terminator = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[i + terminator..]);
                Some(&rest[..i])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}
