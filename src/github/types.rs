// src/github/types.rs
// =============================================================================
// Records returned by the GitHub REST API.
//
//   GET /repos/{owner}/{repo}                  -> RepositoryInfo
//   GET /repos/{owner}/{repo}/contents/{path}  -> Vec<RemoteEntry>
//
// We only model the fields we actually use; serde ignores the rest.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Repository metadata shown next to the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<RepositoryOwner>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub html_url: String,
}

impl RepositoryInfo {
    /// The short repository name ("widgets" for "acme/widgets").
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.full_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// The `type` field of a contents listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    File,
    Dir,
    Symlink,
    Submodule,
    /// Anything GitHub adds later
    #[serde(other)]
    Other,
}

/// One immediate child of a directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: RemoteKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl RemoteEntry {
    pub fn file(path: &str, size: u64) -> Self {
        Self::new(path, RemoteKind::File, size)
    }

    pub fn dir(path: &str) -> Self {
        Self::new(path, RemoteKind::Dir, 0)
    }

    fn new(path: &str, kind: RemoteKind, size: u64) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            name,
            path: path.to_string(),
            kind,
            size,
            sha: String::new(),
            html_url: None,
        }
    }
}

/// GitHub returns an object (not an array) when `contents/{path}` points at
/// a single file, so listings are decoded through this.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListingResponse {
    Many(Vec<RemoteEntry>),
    One(RemoteEntry),
}

impl ListingResponse {
    pub(crate) fn into_entries(self) -> Vec<RemoteEntry> {
        match self {
            ListingResponse::Many(entries) => entries,
            ListingResponse::One(entry) => vec![entry],
        }
    }
}
