// src/tree/expansion.rs
// =============================================================================
// Which directories are currently open in the tree browser.
//
// Both views (the indented list and the diagram) read the same
// ExpansionState. Cross-view navigation writes it through exactly one
// operation, expand_ancestors_of().
// =============================================================================

use std::collections::BTreeSet;

use super::node::ContentTree;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open.contains(path)
    }

    pub fn open(&mut self, path: &str) {
        self.open.insert(path.to_string());
    }

    pub fn close(&mut self, path: &str) {
        self.open.remove(path);
    }

    /// Flips one path; returns whether it is open afterwards.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.open.remove(path) {
            false
        } else {
            self.open.insert(path.to_string());
            true
        }
    }

    /// Opens every prefix of `path`, root to leaf, the leaf included.
    ///
    /// "src/a/b.ts" opens "src", "src/a" and "src/a/b.ts".
    pub fn expand_ancestors_of(&mut self, path: &str) {
        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            self.open.insert(prefix.clone());
        }
    }

    /// Opens every directory in the tree.
    pub fn expand_all(&mut self, tree: &ContentTree) {
        self.open
            .extend(tree.directory_paths().map(|path| path.to_string()));
    }

    pub fn collapse_all(&mut self) {
        self.open.clear();
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(|p| p.as_str())
    }
}
