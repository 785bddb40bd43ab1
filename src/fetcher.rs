// src/fetcher.rs
// =============================================================================
// Builds a ContentTree from a repository, bounded in depth and file count.
//
// How it works, per directory:
// 1. List the directory through the ContentClient
// 2. Drop excluded entries (logged, never an error)
// 3. Walk the survivors in listing order and decide what each one becomes:
//      - the file budget is spent -> stop, later siblings are dropped
//        (a directory reached after that point is never listed at all)
//      - directory too deep       -> empty directory node, no descent
//      - directory                -> recurse one level deeper
//      - file                     -> take one slot from the budget, fetch body
// 4. Run those steps concurrently (bounded), collecting results in listing
//    order, not completion order
//
// The file budget is one atomic counter shared by the whole traversal, so
// concurrent branches can never admit more files than the ceiling.
//
// Any remote error aborts the whole fetch. Nothing partial is returned.
// =============================================================================

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::Result;
use crate::filter;
use crate::github::{ContentClient, RemoteEntry, RemoteKind, RepositoryIdentifier};
use crate::tree::{ContentNode, ContentTree, NodeKind};

/// Global admission budget for File nodes.
#[derive(Debug)]
struct FileBudget {
    limit: usize,
    admitted: AtomicUsize,
}

impl FileBudget {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            admitted: AtomicUsize::new(0),
        }
    }

    /// Check-and-increment in one atomic step.
    fn try_admit(&self) -> bool {
        self.admitted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .is_ok()
    }

    fn is_exhausted(&self) -> bool {
        self.admitted.load(Ordering::SeqCst) >= self.limit
    }

    fn admitted(&self) -> usize {
        self.admitted.load(Ordering::SeqCst)
    }
}

// What one surviving entry turns into
enum Step {
    /// Directory at the depth ceiling: emitted with no children
    Leaf(RemoteEntry),
    Descend(RemoteEntry),
    /// File that already holds a budget slot
    Fetch(RemoteEntry),
}

pub struct TreeFetcher<C> {
    client: C,
    config: FetchConfig,
}

impl<C: ContentClient> TreeFetcher<C> {
    pub fn new(client: C, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Parses `url` and fetches the tree. A bad URL fails before any
    /// remote call is made.
    pub async fn fetch_url(&self, url: &str) -> Result<ContentTree> {
        let repo = RepositoryIdentifier::parse(url)?;
        self.fetch_tree(&repo).await
    }

    /// Fetches repository metadata, then the bounded, filtered tree.
    pub async fn fetch_tree(&self, repo: &RepositoryIdentifier) -> Result<ContentTree> {
        info!(
            "Fetching {} (max depth {}, max files {})",
            repo, self.config.max_depth, self.config.max_files
        );
        let repository = self.client.repository_info(repo).await?;

        let budget = FileBudget::new(self.config.max_files);
        let entries = self.fetch_level(repo, "", 0, &budget).await?;

        if budget.is_exhausted() {
            warn!("Maximum file count ({}) reached", self.config.max_files);
        }
        info!("Fetched {} file(s) from {}", budget.admitted(), repo);

        Ok(ContentTree::new(repository, entries))
    }

    // Boxed because it is recursive
    fn fetch_level<'a>(
        &'a self,
        repo: &'a RepositoryIdentifier,
        path: &'a str,
        depth: usize,
        budget: &'a FileBudget,
    ) -> BoxFuture<'a, Result<Vec<ContentNode>>> {
        async move {
            if budget.is_exhausted() {
                debug!("File budget spent, not listing '{}'", path);
                return Ok(Vec::new());
            }

            let listing = self.client.list_entries(repo, path).await?;
            let mut entries = drop_excluded(listing);
            if self.config.sort_entries {
                entries.sort_by(compare_entries);
            }

            let steps = self.plan(entries, depth, budget);

            stream::iter(
                steps
                    .into_iter()
                    .map(|step| self.resolve(repo, step, depth, budget)),
            )
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await
        }
        .boxed()
    }

    /// Decides, in listing order, what each entry becomes.
    ///
    /// File slots are claimed here, before any sibling directory is
    /// descended into.
    fn plan(&self, entries: Vec<RemoteEntry>, depth: usize, budget: &FileBudget) -> Vec<Step> {
        let mut steps = Vec::with_capacity(entries.len());

        for entry in entries {
            if budget.is_exhausted() {
                debug!("File budget spent, dropping '{}' and later siblings", entry.path);
                break;
            }

            match entry.kind {
                RemoteKind::Dir if depth + 1 > self.config.max_depth => {
                    debug!(
                        "Maximum depth ({}) reached at {}",
                        self.config.max_depth, entry.path
                    );
                    steps.push(Step::Leaf(entry));
                }
                RemoteKind::Dir => steps.push(Step::Descend(entry)),
                RemoteKind::File => {
                    if !budget.try_admit() {
                        break;
                    }
                    steps.push(Step::Fetch(entry));
                }
                other => debug!("Skipping {:?} entry {}", other, entry.path),
            }
        }

        steps
    }

    async fn resolve(
        &self,
        repo: &RepositoryIdentifier,
        step: Step,
        depth: usize,
        budget: &FileBudget,
    ) -> Result<ContentNode> {
        match step {
            Step::Leaf(entry) => Ok(directory_node(entry, Vec::new())),
            Step::Descend(entry) => {
                let children = self.fetch_level(repo, &entry.path, depth + 1, budget).await?;
                Ok(directory_node(entry, children))
            }
            Step::Fetch(entry) => {
                let content = self.client.fetch_file_body(repo, &entry.path).await?;
                Ok(ContentNode {
                    name: entry.name,
                    path: entry.path,
                    kind: NodeKind::File {
                        size: entry.size,
                        content: Some(content),
                    },
                })
            }
        }
    }
}

fn directory_node(entry: RemoteEntry, children: Vec<ContentNode>) -> ContentNode {
    ContentNode {
        name: entry.name,
        path: entry.path,
        kind: NodeKind::Directory { children },
    }
}

fn drop_excluded(listing: Vec<RemoteEntry>) -> Vec<RemoteEntry> {
    listing
        .into_iter()
        .filter(|entry| match filter::matching_rule(&entry.name, &entry.path) {
            Some(rule) => {
                info!("Skipping excluded item: {} ({})", entry.path, rule.category);
                false
            }
            None => true,
        })
        .collect()
}

/// Directories first, then by name ignoring case.
fn compare_entries(a: &RemoteEntry, b: &RemoteEntry) -> CmpOrdering {
    let a_dir = a.kind == RemoteKind::Dir;
    let b_dir = b.kind == RemoteKind::Dir;
    b_dir
        .cmp(&a_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why BoxFuture for fetch_level?
//    - An async fn that calls itself would have an infinitely sized future type
//    - Boxing the future (.boxed()) gives it a fixed size: a pointer
//
// 2. What does .buffered(n) do?
//    - Runs up to n futures at once, like buffer_unordered
//    - But yields results in the order the futures were created
//    - So children keep their listing order no matter which request finishes first
//
// 3. Why fetch_update on the AtomicUsize?
//    - "read the counter, compare with the limit, add one" must happen as one step
//    - fetch_update retries the closure until nobody else changed the value in between
//
// 4. What does try_collect do?
//    - Collects a stream of Result<T> into Result<Vec<T>>
//    - Stops at the first Err, dropping the futures still in flight
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use crate::export::flatten_to_markup;
    use crate::github::mock::MockClient;

    fn fetcher(client: MockClient, max_depth: usize, max_files: usize) -> TreeFetcher<MockClient> {
        TreeFetcher::new(
            client,
            FetchConfig::default().with_limits(max_depth, max_files),
        )
    }

    fn acme() -> RepositoryIdentifier {
        RepositoryIdentifier::new("acme", "widgets")
    }

    #[tokio::test]
    async fn test_end_to_end_readme_only() {
        let client = MockClient::new()
            .with_file("README.md", "hello")
            .with_file("node_modules/x.js", "module.exports = 1");
        let fetcher = fetcher(client, 5, 1000);

        let tree = fetcher
            .fetch_url("https://github.com/acme/widgets")
            .await
            .unwrap();

        assert_eq!(tree.repository.full_name, "acme/widgets");
        assert_eq!(tree.entries, vec![ContentNode::file("README.md", "hello")]);
        assert!(tree.find("node_modules/x.js").is_none());
        assert!(tree.find("node_modules").is_none());
        assert_eq!(flatten_to_markup(&tree), "## README.md\n```\nhello\n```\n\n");
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_remote_call() {
        let fetcher = fetcher(MockClient::new().with_file("README.md", "hi"), 5, 1000);

        let result = fetcher.fetch_url("not a url").await;

        assert!(matches!(result, Err(SnapshotError::InvalidInput(_))));
        assert_eq!(fetcher.client().total_calls(), 0);
    }

    #[tokio::test]
    async fn test_excluded_entries_never_appear() {
        let client = MockClient::new()
            .with_file("src/main.rs", "fn main() {}")
            .with_file("src/logo.png", "binary")
            .with_file("dist/bundle.js", "x")
            .with_file(".env", "SECRET=1")
            .with_file("docs/build/out.html", "x")
            .with_file("package-lock.json", "{}");
        let fetcher = fetcher(client, 5, 1000);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let paths: Vec<&str> = tree.walk().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "src/main.rs", "docs"]);
        // Excluded directories are never listed
        assert_eq!(fetcher.client().list_calls(), 3);
    }

    #[tokio::test]
    async fn test_depth_ceiling_emits_empty_directories() {
        let client = MockClient::new()
            .with_file("top.txt", "0")
            .with_file("a/one.txt", "1")
            .with_file("a/b/two.txt", "2")
            .with_file("a/b/c/three.txt", "3")
            .with_file("a/b/c/d/four.txt", "4");
        let fetcher = fetcher(client, 2, 1000);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let ceiling_dir = tree.find("a/b/c").unwrap();
        assert!(ceiling_dir.is_dir());
        assert!(ceiling_dir.children().is_empty());
        assert!(tree.find("a/b/two.txt").is_some());
        assert!(tree.find("a/b/c/three.txt").is_none());
        assert!(tree.find("a/b/c/d/four.txt").is_none());
        assert_eq!(tree.file_count(), 3);
    }

    #[tokio::test]
    async fn test_depth_zero_lists_only_the_root() {
        let client = MockClient::new()
            .with_file("src/lib.rs", "")
            .with_file("README.md", "hi");
        let fetcher = fetcher(client, 0, 1000);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        assert_eq!(tree.entries[0], ContentNode::directory("src", vec![]));
        assert_eq!(fetcher.client().list_calls(), 1);
    }

    #[tokio::test]
    async fn test_file_ceiling_is_exact() {
        let mut client = MockClient::new();
        for dir in ["a", "b", "c"] {
            for i in 0..5 {
                client = client.with_file(&format!("{}/f{}.txt", dir, i), "x");
            }
        }
        let fetcher = fetcher(client, 5, 7);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let with_content = tree.files().filter(|n| n.content().is_some()).count();
        assert_eq!(with_content, 7);
        assert_eq!(fetcher.client().body_calls(), 7);
    }

    #[tokio::test]
    async fn test_file_ceiling_drops_later_siblings() {
        let client = MockClient::new()
            .with_file("1.txt", "1")
            .with_file("2.txt", "2")
            .with_file("later", "x");
        let client = client.with_dir("zdir");
        let fetcher = fetcher(client, 5, 2);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let paths: Vec<&str> = tree.walk().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["1.txt", "2.txt"]);
    }

    #[tokio::test]
    async fn test_spent_budget_skips_pending_directory_listings() {
        // "ghost" has no listing: asking for it would fail with NotFound
        let client = MockClient::new()
            .with_file("dir1/x.txt", "x")
            .with_entry(RemoteEntry::dir("ghost"));
        let mut config = FetchConfig::default().with_limits(5, 1);
        config.concurrency = 1;
        let fetcher = TreeFetcher::new(client, config);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        assert_eq!(fetcher.client().list_calls(), 2);
        assert_eq!(tree.file_count(), 1);
        assert!(tree.find("dir1/x.txt").is_some());
        assert!(tree.find("ghost").unwrap().children().is_empty());
    }

    #[tokio::test]
    async fn test_listing_order_is_preserved() {
        let client = MockClient::new()
            .with_file("b", "b")
            .with_file("a", "a")
            .with_file("c", "c");
        let fetcher = fetcher(client, 5, 1000);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let names: Vec<&str> = tree.entries.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_sorting_is_opt_in() {
        let client = MockClient::new()
            .with_file("b.txt", "b")
            .with_file("A.txt", "a")
            .with_file("src/x.rs", "x");
        let mut config = FetchConfig::default();
        config.sort_entries = true;
        let fetcher = TreeFetcher::new(client, config);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        let names: Vec<&str> = tree.entries.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["src", "A.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_one_failed_file_aborts_everything() {
        let client = MockClient::new()
            .with_file("ok.txt", "fine")
            .with_file("src/broken.rs", "x")
            .failing_on("src/broken.rs");
        let fetcher = fetcher(client, 5, 1000);

        let result = fetcher.fetch_tree(&acme()).await;

        assert!(matches!(result, Err(SnapshotError::Remote(_))));
    }

    #[tokio::test]
    async fn test_missing_repository_is_not_found() {
        let fetcher = fetcher(MockClient::missing(), 5, 1000);

        let result = fetcher.fetch_tree(&acme()).await;

        assert!(matches!(result, Err(SnapshotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submodules_are_skipped() {
        let mut submodule = RemoteEntry::dir("third_party");
        submodule.kind = RemoteKind::Submodule;
        let client = MockClient::new()
            .with_entry(submodule)
            .with_file("main.c", "int main;");
        let fetcher = fetcher(client, 5, 1000);

        let tree = fetcher.fetch_tree(&acme()).await.unwrap();

        assert_eq!(tree.entries, vec![ContentNode::file("main.c", "int main;")]);
    }

    #[test]
    fn test_budget_never_exceeds_limit() {
        let budget = FileBudget::new(2);
        assert!(budget.try_admit());
        assert!(budget.try_admit());
        assert!(!budget.try_admit());
        assert!(budget.is_exhausted());
        assert_eq!(budget.admitted(), 2);
    }
}
