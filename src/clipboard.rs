// src/clipboard.rs
// =============================================================================
// Hands text to the system clipboard.
//
// There is no portable clipboard API in std, so we pipe the text into the
// platform's clipboard command, trying each candidate in turn:
//   - macOS:   pbcopy
//   - Windows: clip
//   - others:  wl-copy, xclip, xsel
//
// A failure here is a ClipboardFailure and never touches the fetched tree:
// copy_or_write() hands the text to a fallback writer (stdout in the CLI)
// before reporting the error.
// =============================================================================

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Result, SnapshotError};
use crate::tree::ContentTree;

type Candidate = (&'static str, &'static [&'static str]);

const MACOS: &[Candidate] = &[("pbcopy", &[])];
const WINDOWS: &[Candidate] = &[("clip", &[])];
const UNIX: &[Candidate] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Somewhere text can be copied to.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> Result<()>;
}

/// The platform clipboard, reached through its command-line tools.
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn copy(&self, text: &str) -> Result<()> {
        copy_to_clipboard(text).await
    }
}

/// Copies `text`, or writes it to `fallback` when the clipboard fails.
///
/// The clipboard error is still returned so the caller can report it.
pub async fn copy_or_write<C, W>(clipboard: &C, text: &str, fallback: &mut W) -> Result<()>
where
    C: Clipboard + ?Sized,
    W: Write,
{
    match clipboard.copy(text).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("{}", e);
            fallback.write_all(text.as_bytes())?;
            fallback.flush()?;
            Err(e)
        }
    }
}

/// (program, args) pairs to try, in order.
fn candidates() -> &'static [Candidate] {
    if cfg!(target_os = "macos") {
        MACOS
    } else if cfg!(windows) {
        WINDOWS
    } else {
        UNIX
    }
}

/// Copies `text` using the first clipboard command that works.
pub async fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut last_error = String::from("no clipboard command available");

    for (program, args) in candidates() {
        match pipe_into(program, args, text).await {
            Ok(()) => {
                debug!("Copied {} bytes with {}", text.len(), program);
                return Ok(());
            }
            Err(e) => {
                debug!("{} failed: {}", program, e);
                last_error = format!("{}: {}", program, e);
            }
        }
    }

    Err(SnapshotError::Clipboard(last_error))
}

async fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
        // Dropping stdin closes the pipe so the command can finish
    }

    let status = child.wait().await?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("exited with {}", status),
        ))
    }
}

/// Content of one file in the snapshot, for "copy single file".
pub fn file_content<'a>(tree: &'a ContentTree, path: &str) -> Result<&'a str> {
    let node = tree
        .find(path)
        .ok_or_else(|| SnapshotError::InvalidInput(format!("'{}' is not in the snapshot", path)))?;
    node.content()
        .ok_or_else(|| SnapshotError::InvalidInput(format!("'{}' has no content to copy", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RepositoryInfo;
    use crate::tree::ContentNode;

    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn copy(&self, _text: &str) -> Result<()> {
            Err(SnapshotError::Clipboard("xclip: exited with 1".to_string()))
        }
    }

    struct RecordingClipboard(std::sync::Mutex<Vec<String>>);

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        async fn copy(&self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn tree() -> ContentTree {
        ContentTree::new(
            RepositoryInfo::default(),
            vec![ContentNode::directory(
                "src",
                vec![ContentNode::file("src/lib.rs", "pub fn x() {}")],
            )],
        )
    }

    #[test]
    fn test_file_content() {
        assert_eq!(file_content(&tree(), "src/lib.rs").unwrap(), "pub fn x() {}");
    }

    #[test]
    fn test_file_content_rejects_directories_and_unknown_paths() {
        assert!(matches!(
            file_content(&tree(), "src"),
            Err(SnapshotError::InvalidInput(_))
        ));
        assert!(matches!(
            file_content(&tree(), "nope.rs"),
            Err(SnapshotError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_copy_still_writes_the_text() {
        let mut out = Vec::new();

        let result = copy_or_write(&BrokenClipboard, "=== a.txt ===\nhi\n\n", &mut out).await;

        assert!(matches!(result, Err(SnapshotError::Clipboard(_))));
        assert_eq!(out, b"=== a.txt ===\nhi\n\n");
    }

    #[tokio::test]
    async fn test_successful_copy_writes_nothing() {
        let clipboard = RecordingClipboard(Default::default());
        let mut out = Vec::new();

        copy_or_write(&clipboard, "pub fn x() {}", &mut out)
            .await
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(*clipboard.0.lock().unwrap(), vec!["pub fn x() {}"]);
    }

    #[test]
    fn test_there_is_always_a_candidate() {
        assert!(!candidates().is_empty());
    }
}
