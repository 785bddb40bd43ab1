// src/tree/node.rs
// =============================================================================
// The fetched repository as a nested tree.
//
// A ContentNode is either a File (maybe with content) or a Directory (with
// children). The enum makes "directories never carry content, files never
// carry children" impossible to break.
//
// A ContentTree is built fresh by every fetch and thrown away wholesale on
// the next one; nothing in here is shared between repositories.
// =============================================================================

use serde::Serialize;

use crate::github::RepositoryInfo;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    File {
        size: u64,
        /// None when the body was never fetched
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    #[serde(rename = "dir")]
    Directory { children: Vec<ContentNode> },
}

/// One file or directory entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    pub name: String,
    /// Slash-delimited path from the repository root
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl ContentNode {
    pub fn file(path: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: leaf_name(path).to_string(),
            path: path.to_string(),
            kind: NodeKind::File {
                size: content.len() as u64,
                content: Some(content),
            },
        }
    }

    pub fn directory(path: &str, children: Vec<ContentNode>) -> Self {
        Self {
            name: leaf_name(path).to_string(),
            path: path.to_string(),
            kind: NodeKind::Directory { children },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content, .. } => content.as_deref(),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Empty for files
    pub fn children(&self) -> &[ContentNode] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    /// Pre-order walk over this node and everything below it.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// The result of one fetch: repository metadata plus its top-level entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentTree {
    pub repository: RepositoryInfo,
    pub entries: Vec<ContentNode>,
}

impl ContentTree {
    pub fn new(repository: RepositoryInfo, entries: Vec<ContentNode>) -> Self {
        Self {
            repository,
            entries,
        }
    }

    /// Pre-order walk over every node, top-level entries in stored order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.entries.iter().rev().collect(),
        }
    }

    /// Every File node, in pre-order.
    pub fn files(&self) -> impl Iterator<Item = &ContentNode> {
        self.walk().filter(|node| node.is_file())
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Paths of every Directory node.
    pub fn directory_paths(&self) -> impl Iterator<Item = &str> {
        self.walk().filter(|node| node.is_dir()).map(|node| node.path.as_str())
    }

    /// Looks a node up by its full path, descending only into matching
    /// directories.
    pub fn find(&self, path: &str) -> Option<&ContentNode> {
        let path = path.trim_matches('/');
        let mut level = self.entries.as_slice();
        loop {
            let node = level
                .iter()
                .find(|node| node.path == path || is_ancestor(&node.path, path))?;
            if node.path == path {
                return Some(node);
            }
            level = node.children();
        }
    }
}

/// Iterator returned by `walk()`.
pub struct Walk<'a> {
    stack: Vec<&'a ContentNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ContentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children reversed so the first child comes out next
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}
