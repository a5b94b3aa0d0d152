//! Hierarchical search results.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::engine::MatchLocation;

/// Kind of result node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ResultKind {
    Directory,
    File,
    /// Informational row, such as the replacement text.
    Info,
}

/// A node in the result tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultNode {
    pub kind: ResultKind,
    /// Name for directories and files, text for info nodes.
    pub label: CompactString,
    /// Matches in this subtree.
    pub match_count: u64,
    /// Matches in this file, in line order. Empty for other kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchLocation>,
    /// Children in traversal order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    fn directory(name: impl Into<CompactString>) -> Self {
        Self {
            kind: ResultKind::Directory,
            label: name.into(),
            match_count: 0,
            matches: Vec::new(),
            children: Vec::new(),
        }
    }

    fn file(name: impl Into<CompactString>, matches: Vec<MatchLocation>) -> Self {
        Self {
            kind: ResultKind::File,
            label: name.into(),
            match_count: matches.len() as u64,
            matches,
            children: Vec::new(),
        }
    }

    fn info(text: impl Into<CompactString>) -> Self {
        Self {
            kind: ResultKind::Info,
            label: text.into(),
            match_count: 0,
            matches: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == ResultKind::File
    }

    /// First file leaf in depth-first order, skipping info nodes.
    pub fn first_file(&self) -> Option<&ResultNode> {
        if self.is_file() {
            return Some(self);
        }
        self.children.iter().find_map(ResultNode::first_file)
    }

    /// Visit file leaves in depth-first order.
    fn collect_files<'a>(&'a self, out: &mut Vec<&'a ResultNode>) {
        if self.is_file() {
            out.push(self);
        }
        for child in &self.children {
            child.collect_files(out);
        }
    }
}

/// The pruned mirror of the searched subtree.
///
/// The root is a headline node whose label carries the running match count.
/// Below it sit optional info nodes and then the scope's root directory.
/// Directories only appear once a file beneath them has matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultTree {
    root: ResultNode,
    pattern: String,
    scope_name: String,
    total_matches: u64,
}

impl ResultTree {
    /// Create an empty tree for a search of `pattern` in `scope_name`.
    pub fn new(pattern: impl Into<String>, scope_name: impl Into<String>) -> Self {
        let mut tree = Self {
            root: ResultNode::directory(""),
            pattern: pattern.into(),
            scope_name: scope_name.into(),
            total_matches: 0,
        };
        tree.refresh_headline();
        tree
    }

    /// Append an informational row below the headline.
    pub fn add_info(&mut self, text: impl Into<CompactString>) {
        self.root.children.push(ResultNode::info(text));
    }

    /// Add a matching file.
    ///
    /// `dirs` are the directory names from the scope root (inclusive) down to
    /// the file's parent. Files must be added in traversal order: an existing
    /// directory node is only reused while it is the last child of its parent.
    pub fn add_file<S: AsRef<str>>(
        &mut self,
        dirs: &[S],
        name: impl Into<CompactString>,
        matches: Vec<MatchLocation>,
    ) {
        if matches.is_empty() {
            return;
        }
        let count = matches.len() as u64;

        let mut current = &mut self.root;
        current.match_count += count;
        for dir in dirs {
            let dir = dir.as_ref();
            let reuse = current
                .children
                .last()
                .is_some_and(|c| c.kind == ResultKind::Directory && c.label.as_str() == dir);
            if !reuse {
                current.children.push(ResultNode::directory(dir));
            }
            let last = current.children.len() - 1;
            current = &mut current.children[last];
            current.match_count += count;
        }
        current.children.push(ResultNode::file(name, matches));

        self.total_matches += count;
        self.refresh_headline();
    }

    fn refresh_headline(&mut self) {
        self.root.label = format!(
            "{} occurrences of '{}' in {}",
            self.total_matches, self.pattern, self.scope_name
        )
        .into();
    }

    /// Headline node.
    pub fn root(&self) -> &ResultNode {
        &self.root
    }

    /// Headline text, e.g. `3 occurrences of 'foo' in root`.
    pub fn headline(&self) -> &str {
        &self.root.label
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    /// Matches found so far.
    pub fn total_matches(&self) -> u64 {
        self.total_matches
    }

    /// Check if no file matched.
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    /// The scope's root directory node, present once anything matched.
    pub fn scope_root(&self) -> Option<&ResultNode> {
        self.root
            .children
            .iter()
            .find(|c| c.kind == ResultKind::Directory)
    }

    /// Matching files in traversal order.
    pub fn files(&self) -> Vec<&ResultNode> {
        let mut out = Vec::new();
        self.root.collect_files(&mut out);
        out
    }

    /// First file leaf in depth-first order.
    pub fn first_file(&self) -> Option<&ResultNode> {
        self.root.first_file()
    }

    /// The match to focus by default: the first match of the first file.
    pub fn first_match(&self) -> Option<&MatchLocation> {
        self.first_file().and_then(|f| f.matches.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn location(file: &str, line: usize) -> MatchLocation {
        MatchLocation {
            path: PathBuf::from(file),
            line,
            column: 0,
            byte_range: 0..1,
            matched: "x".into(),
            line_text: "x".into(),
            replacement: None,
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree = ResultTree::new("foo", "root");
        assert!(tree.is_empty());
        assert_eq!(tree.headline(), "0 occurrences of 'foo' in root");
        assert!(tree.scope_root().is_none());
        assert!(tree.first_match().is_none());
    }

    #[test]
    fn test_directories_are_shared_and_counted() {
        let mut tree = ResultTree::new("x", "root");
        tree.add_file(&["root"], "a.txt", vec![location("/r/a.txt", 1)]);
        tree.add_file(&["root", "sub"], "b.txt", vec![location("/r/sub/b.txt", 1)]);
        tree.add_file(
            &["root", "sub"],
            "c.txt",
            vec![location("/r/sub/c.txt", 1), location("/r/sub/c.txt", 2)],
        );

        assert_eq!(tree.total_matches(), 4);
        assert_eq!(tree.headline(), "4 occurrences of 'x' in root");

        let root = tree.scope_root().unwrap();
        assert_eq!(root.match_count, 4);
        assert_eq!(root.children.len(), 2);
        let sub = &root.children[1];
        assert_eq!(sub.label.as_str(), "sub");
        assert_eq!(sub.match_count, 3);
        assert_eq!(sub.children.len(), 2);
    }

    #[test]
    fn test_empty_match_list_is_ignored() {
        let mut tree = ResultTree::new("x", "root");
        tree.add_file(&["root", "sub"], "a.txt", Vec::new());
        assert!(tree.scope_root().is_none());
    }

    #[test]
    fn test_first_match_skips_info() {
        let mut tree = ResultTree::new("x", "root");
        tree.add_info("Replace occurrences with 'y'");
        tree.add_file(&["root", "deep", "er"], "z.txt", vec![location("/r/deep/er/z.txt", 7)]);
        tree.add_file(&["root"], "a.txt", vec![location("/r/a.txt", 1)]);

        assert_eq!(tree.root().children[0].kind, ResultKind::Info);
        let first = tree.first_match().unwrap();
        assert_eq!(first.path, PathBuf::from("/r/deep/er/z.txt"));

        let names: Vec<_> = tree.files().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt"]);
    }
}
