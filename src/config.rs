// src/config.rs
// =============================================================================
// Settings for one fetch, built once from the command line and passed
// explicitly into the client and the fetcher. Nothing here is global.
// =============================================================================

use std::time::Duration;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// How deep the traversal descends below the repository root.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// How many files one fetch may admit in total.
pub const DEFAULT_MAX_FILES: usize = 1000;

/// How many sibling entries of one directory are processed at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Personal access token, sent as `Authorization: token <..>`.
    pub token: Option<String>,
    pub api_base: String,
    pub max_depth: usize,
    pub max_files: usize,
    pub concurrency: usize,
    /// Directories first, then case-insensitive by name.
    /// Off by default: the remote listing order is kept.
    pub sort_entries: bool,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_files: DEFAULT_MAX_FILES,
            concurrency: DEFAULT_CONCURRENCY,
            sort_entries: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl FetchConfig {
    pub fn with_token(mut self, token: Option<String>) -> Self {
        // An empty GITHUB_TOKEN is the same as none at all
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_limits(mut self, max_depth: usize, max_files: usize) -> Self {
        self.max_depth = max_depth;
        self.max_files = max_files;
        self
    }
}
