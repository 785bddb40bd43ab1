// src/github/repo_url.rs
// =============================================================================
// Turns a pasted repository URL into an owner/repo pair.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - https://github.com/owner/repo/tree/main/src   (extra segments ignored)
//   - github.com/owner/repo
//
// Anything else is an InvalidInput error, and nothing is sent to the API.
// =============================================================================

use std::fmt;

use url::Url;

use crate::error::{Result, SnapshotError};

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentifier {
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentifier {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses a GitHub URL to extract owner and repository name
    ///
    /// Example:
    ///   "https://github.com/rust-lang/rust" -> ("rust-lang", "rust")
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        // If a scheme is present, let the url crate validate the whole thing
        // and hand us back the host and path.
        let (host, path) = if input.contains("://") {
            let parsed = Url::parse(input)
                .map_err(|e| SnapshotError::InvalidInput(format!("{} ({})", input, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SnapshotError::InvalidInput(input.to_string()));
            }
            let host = parsed.host_str().unwrap_or_default().to_string();
            (host, parsed.path().to_string())
        } else {
            // Same as the url crate would do: the query and fragment are not path
            let input = input.split(['?', '#']).next().unwrap_or_default();
            match input.split_once('/') {
                Some((host, rest)) => (host.to_string(), format!("/{}", rest)),
                None => return Err(SnapshotError::InvalidInput(input.to_string())),
            }
        };

        let host = host.trim_start_matches("www.");
        if !host.eq_ignore_ascii_case("github.com") {
            return Err(SnapshotError::InvalidInput(format!(
                "{} (not a github.com URL)",
                input
            )));
        }

        // Split by '/' to get owner and repo, ignoring empty segments
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        let owner = parts.next();
        let repo = parts.next();

        match (owner, repo) {
            (Some(owner), Some(repo)) => {
                // Remove .git suffix if present
                let repo = repo.strip_suffix(".git").unwrap_or(repo);
                if repo.is_empty() {
                    return Err(SnapshotError::InvalidInput(input.to_string()));
                }
                Ok(Self::new(owner, repo))
            }
            _ => Err(SnapshotError::InvalidInput(format!(
                "{} (expected github.com/<owner>/<repo>)",
                input
            ))),
        }
    }

    /// "owner/repo"
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is strip_suffix?
//    - Returns Some(rest) if the string ends with the suffix, None otherwise
//    - unwrap_or(repo) keeps the original when there was no ".git"
//
// 2. Why filter(|s| !s.is_empty())?
//    - "github.com//acme/widgets/" splits into empty pieces around the slashes
//    - Skipping them makes stray slashes harmless
// -----------------------------------------------------------------------------
