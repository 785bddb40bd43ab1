// src/lib.rs
// =============================================================================
// repo-snapshot: a bounded, filtered snapshot of a GitHub repository.
//
// Data flows one way:
//   URL -> RepositoryIdentifier -> TreeFetcher (ContentClient + filter)
//       -> ContentTree -> { tree view, export, clipboard }
//
// The binary in main.rs is a thin CLI over this library.
// =============================================================================

pub mod clipboard; // system clipboard
pub mod config;    // FetchConfig and defaults
pub mod error;     // SnapshotError
pub mod export;    // Markdown / plain text flattening
pub mod fetcher;   // bounded recursive traversal
pub mod filter;    // exclusion rules
pub mod github;    // GitHub API client
pub mod tree;      // content tree, expansion state, diagram

pub use config::FetchConfig;
pub use error::{Result, SnapshotError};
pub use export::ExportFormat;
pub use fetcher::TreeFetcher;
pub use github::{ContentClient, GitHubClient, RepositoryIdentifier};
pub use tree::{ContentNode, ContentTree, ExpansionState};
