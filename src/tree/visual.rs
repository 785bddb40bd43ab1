// src/tree/visual.rs
// =============================================================================
// Presentation tree for the repository diagram.
//
// toVisualTree groups the top-level entries under a pseudo-root named
// after the repository. Each node carries a display label plus its path as
// an opaque attribute, which is what a click hands back to
// ExpansionState::expand_ancestors_of().
//
// The JSON shape ({name, attributes: {path}, children}) is what tree
// charting widgets expect; render() draws the same tree as indented text.
// =============================================================================

use std::fmt::Write;

use serde::Serialize;

use super::expansion::ExpansionState;
use super::node::{ContentNode, ContentTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualAttributes {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub name: String,
    pub attributes: VisualAttributes,
    /// None for files, Some (maybe empty) for directories and the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<VisualNode>>,
}

impl VisualNode {
    pub fn path(&self) -> &str {
        &self.attributes.path
    }

    pub fn is_branch(&self) -> bool {
        self.children.is_some()
    }

    fn from_content(node: &ContentNode) -> Self {
        let children = node
            .is_dir()
            .then(|| node.children().iter().map(VisualNode::from_content).collect());
        Self {
            name: node.name.clone(),
            attributes: VisualAttributes {
                path: node.path.clone(),
            },
            children,
        }
    }
}

/// Builds the diagram tree. The pseudo-root's path is "" (the repo root).
pub fn to_visual_tree(tree: &ContentTree, display_name: &str) -> VisualNode {
    VisualNode {
        name: display_name.to_string(),
        attributes: VisualAttributes {
            path: String::new(),
        },
        children: Some(tree.entries.iter().map(VisualNode::from_content).collect()),
    }
}

/// Draws the tree as indented text. The root is always open; any other
/// branch shows its children only when `state` has it open.
pub fn render(root: &VisualNode, state: &ExpansionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📦 {}", root.name);
    if let Some(children) = &root.children {
        render_children(children, state, "", &mut out);
    }
    out
}

fn render_children(children: &[VisualNode], state: &ExpansionState, prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };

        match &child.children {
            Some(grandchildren) => {
                let open = state.is_open(child.path());
                let marker = if open { "▼" } else { "▶" };
                let _ = writeln!(out, "{}{}{} 📁 {}", prefix, connector, marker, child.name);
                if open {
                    let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
                    render_children(grandchildren, state, &next, out);
                }
            }
            None => {
                let _ = writeln!(out, "{}{}📄 {}", prefix, connector, child.name);
            }
        }
    }
}
