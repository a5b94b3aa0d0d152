//! Replacement previews.

use regex::Captures;

/// Replacement text for "replace in path".
///
/// Regex searches expand `$1` and `${name}` references against the match;
/// literal searches insert the text verbatim. Nothing is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    template: String,
    expand: bool,
}

impl Replacement {
    /// Create a replacement for criteria in the given mode.
    pub fn new(template: impl Into<String>, regex: bool) -> Self {
        Self {
            template: template.into(),
            expand: regex,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Text that replaces one match.
    pub fn preview(&self, caps: &Captures<'_>) -> String {
        if !self.expand {
            return self.template.clone();
        }
        let mut out = String::new();
        caps.expand(&self.template, &mut out);
        out
    }

    /// Label for the info node at the top of a replace result.
    pub fn info_label(&self) -> String {
        format!("Replace occurrences with '{}'", self.template)
    }
}

/// Apply replacement previews to a line.
///
/// `edits` are byte ranges into `line` paired with their replacement text,
/// ordered and non-overlapping.
pub fn apply_to_line<'a>(
    line: &str,
    edits: impl IntoIterator<Item = (std::ops::Range<usize>, &'a str)>,
) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (range, text) in edits {
        out.push_str(&line[last..range.start]);
        out.push_str(text);
        last = range.end;
    }
    out.push_str(&line[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_regex_expansion() {
        let re = Regex::new(r"(?P<key>\w+)=(\d+)").unwrap();
        let caps = re.captures("width=42").unwrap();

        let replacement = Replacement::new("${key}: $2", true);
        assert_eq!(replacement.preview(&caps), "width: 42");
    }

    #[test]
    fn test_literal_is_verbatim() {
        let re = Regex::new("foo").unwrap();
        let caps = re.captures("foo").unwrap();

        let replacement = Replacement::new("$1 bar", false);
        assert_eq!(replacement.preview(&caps), "$1 bar");
        assert_eq!(replacement.info_label(), "Replace occurrences with '$1 bar'");
    }

    #[test]
    fn test_apply_to_line() {
        let line = "foo bar foo";
        let out = apply_to_line(line, [(0..3, "baz"), (8..11, "qux")]);
        assert_eq!(out, "baz bar qux");
    }
}
