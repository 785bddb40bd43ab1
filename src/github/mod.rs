// src/github/mod.rs
// =============================================================================
// This module handles talking to GitHub.
//
// Currently implements:
// - Parsing GitHub URLs to extract owner/repo
// - The ContentClient trait (list a directory, fetch a file body)
// - GitHubClient, the reqwest-backed implementation of it
// =============================================================================

mod client;
mod repo_url;
mod types;

#[cfg(test)]
pub mod mock;

pub use client::{ContentClient, GitHubClient};
pub use repo_url::RepositoryIdentifier;
pub use types::{RemoteEntry, RemoteKind, RepositoryInfo};
