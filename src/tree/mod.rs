// src/tree/mod.rs
// =============================================================================
// The content tree and everything the browser views need from it:
// - node: ContentNode / ContentTree and traversal helpers
// - expansion: the set of open directories
// - visual: the diagram tree and its text rendering
// =============================================================================

mod expansion;
mod node;
mod visual;

pub use expansion::ExpansionState;
pub use node::{ContentNode, ContentTree, NodeKind};
pub use visual::{render, to_visual_tree, VisualNode};
