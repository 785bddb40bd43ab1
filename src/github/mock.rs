// src/github/mock.rs
// =============================================================================
// In-memory ContentClient for tests. No network needed.
//
// Build a fake repository by adding files (directories are created from
// their paths), then count how many remote calls the code under test made.
// =============================================================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::ContentClient;
use super::repo_url::RepositoryIdentifier;
use super::types::{RemoteEntry, RepositoryInfo};
use crate::error::{Result, SnapshotError};

#[derive(Default)]
pub struct MockClient {
    /// directory path -> children in listing order
    listings: Mutex<HashMap<String, Vec<RemoteEntry>>>,
    bodies: Mutex<BTreeMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    missing_repo: bool,
    list_calls: AtomicUsize,
    body_calls: AtomicUsize,
    info_calls: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers 404.
    pub fn missing() -> Self {
        Self {
            missing_repo: true,
            ..Self::default()
        }
    }

    /// Adds a file (and any missing parent directories) in listing order.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.ensure_parents(path);
        self.push_entry(RemoteEntry::file(path, content.len() as u64));
        self.bodies
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Adds an (initially empty) directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.ensure_parents(path);
        self.push_entry(RemoteEntry::dir(path));
        self.listings
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default();
        self
    }

    /// Adds a raw entry such as a submodule.
    pub fn with_entry(self, entry: RemoteEntry) -> Self {
        self.ensure_parents(&entry.path);
        self.push_entry(entry);
        self
    }

    /// Fetching this file's body fails with a generic remote error.
    pub fn failing_on(self, path: &str) -> Self {
        self.failing.lock().unwrap().insert(path.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn body_calls(&self) -> usize {
        self.body_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.body_calls() + self.info_calls.load(Ordering::SeqCst)
    }

    fn ensure_parents(&self, path: &str) {
        let mut prefix = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            let parent = prefix.clone();
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let mut listings = self.listings.lock().unwrap();
            if !listings.contains_key(&prefix) {
                listings.insert(prefix.clone(), Vec::new());
                listings
                    .entry(parent)
                    .or_default()
                    .push(RemoteEntry::dir(&prefix));
            }
        }
    }

    fn push_entry(&self, entry: RemoteEntry) {
        let parent = entry
            .path
            .rsplit_once('/')
            .map(|(parent, _)| parent.to_string())
            .unwrap_or_default();
        self.listings
            .lock()
            .unwrap()
            .entry(parent)
            .or_default()
            .push(entry);
    }
}

#[async_trait]
impl ContentClient for MockClient {
    async fn repository_info(&self, repo: &RepositoryIdentifier) -> Result<RepositoryInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing_repo {
            return Err(SnapshotError::NotFound(repo.full_name()));
        }
        Ok(RepositoryInfo {
            full_name: repo.full_name(),
            default_branch: "main".to_string(),
            ..Default::default()
        })
    }

    async fn list_entries(
        &self,
        repo: &RepositoryIdentifier,
        path: &str,
    ) -> Result<Vec<RemoteEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing_repo {
            return Err(SnapshotError::NotFound(repo.full_name()));
        }
        // Yield so sibling futures really interleave
        tokio::task::yield_now().await;
        self.listings
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound(path.to_string()))
    }

    async fn fetch_file_body(&self, _repo: &RepositoryIdentifier, path: &str) -> Result<String> {
        self.body_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing.lock().unwrap().contains(path) {
            return Err(SnapshotError::Remote(format!("{}: HTTP 500", path)));
        }
        self.bodies
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound(path.to_string()))
    }
}
