// src/export.rs
// =============================================================================
// Flattens a ContentTree into one text document.
//
// Two formats, both depth-first pre-order in stored tree order:
//
//   Markdown                       Plain text
//   --------                       ----------
//   ### src                        --- src ---
//   ## src/main.rs                 === src/main.rs ===
//   ```                            fn main() {}
//   fn main() {}                   <blank line>
//   ```
//   <blank line>
//
// Files without content are skipped. Directories always get their header,
// even when they are empty (e.g. cut off at the depth ceiling).
// =============================================================================

use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;

use crate::error::Result;
use crate::tree::{ContentNode, ContentTree, NodeKind};

/// Which flattened representation to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Headings plus fenced code blocks (.md)
    #[value(name = "md")]
    Markdown,
    /// `=== path ===` delimited plain text (.txt)
    #[value(name = "txt")]
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn flatten(self, tree: &ContentTree) -> String {
        match self {
            ExportFormat::Markdown => flatten_to_markup(tree),
            ExportFormat::Text => flatten_to_delimited(tree),
        }
    }
}

pub fn flatten_to_markup(tree: &ContentTree) -> String {
    let mut out = String::new();
    for node in &tree.entries {
        write_markup(node, &mut out);
    }
    out
}

pub fn flatten_to_delimited(tree: &ContentTree) -> String {
    let mut out = String::new();
    for node in &tree.entries {
        write_delimited(node, &mut out);
    }
    out
}

fn write_markup(node: &ContentNode, out: &mut String) {
    match &node.kind {
        NodeKind::File {
            content: Some(content),
            ..
        } => {
            let _ = write!(out, "## {}\n```\n{}\n```\n\n", node.path, content);
        }
        NodeKind::File { content: None, .. } => {}
        NodeKind::Directory { children } => {
            let _ = writeln!(out, "### {}", node.path);
            for child in children {
                write_markup(child, out);
            }
        }
    }
}

fn write_delimited(node: &ContentNode, out: &mut String) {
    match &node.kind {
        NodeKind::File {
            content: Some(content),
            ..
        } => {
            let _ = write!(out, "=== {} ===\n{}\n\n", node.path, content);
        }
        NodeKind::File { content: None, .. } => {}
        NodeKind::Directory { children } => {
            let _ = writeln!(out, "--- {} ---", node.path);
            for child in children {
                write_delimited(child, out);
            }
        }
    }
}

/// Reads a plain-text export back into (path, content) pairs.
///
/// Directory headers are skipped. A file's content runs until the next
/// header line; the trailing blank line written by the exporter is removed.
pub fn parse_delimited(text: &str) -> Vec<(String, String)> {
    let mut files = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.split_inclusive('\n') {
        let header = line.trim_end_matches('\n');
        let file_path = strip_header(header, "=== ", " ===");
        let is_dir = strip_header(header, "--- ", " ---").is_some();

        if file_path.is_some() || is_dir {
            if let Some(done) = current.take() {
                files.push(finish(done));
            }
            current = file_path.map(|path| (path.to_string(), String::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
        }
    }

    if let Some(done) = current.take() {
        files.push(finish(done));
    }
    files
}

fn strip_header<'a>(line: &'a str, open: &str, close: &str) -> Option<&'a str> {
    line.strip_prefix(open)?.strip_suffix(close)
}

fn finish((path, body): (String, String)) -> (String, String) {
    let content = body.strip_suffix("\n\n").unwrap_or(&body).to_string();
    (path, content)
}

/// Writes the flattened tree to `<dir>/<repository name>.<md|txt>`.
pub async fn download(tree: &ContentTree, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let name = match tree.repository.name() {
        "" => "repository",
        name => name,
    };
    let path = dir.join(format!("{}.{}", name, format.extension()));
    let text = format.flatten(tree);

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, text.as_bytes()).await?;
    info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(path)
}
