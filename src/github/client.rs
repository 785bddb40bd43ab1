// src/github/client.rs
// =============================================================================
// The remote side of a snapshot: three read-only, authenticated calls.
//
//   - repository_info(): GET /repos/{owner}/{repo}
//   - list_entries():    GET /repos/{owner}/{repo}/contents/{path}
//   - fetch_file_body(): same endpoint, raw representation
//
// Every HTTP failure is classified into a SnapshotError variant here and
// handed back to the caller. There is no retry: retrying belongs to whoever
// drives the client.
// =============================================================================

use async_trait::async_trait;
use base64::Engine;
use log::{debug, trace, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use super::repo_url::RepositoryIdentifier;
use super::types::{ListingResponse, RemoteEntry, RepositoryInfo};
use crate::config::FetchConfig;
use crate::error::{Result, SnapshotError};

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

/// Anything that can list directories and hand back file bodies.
///
/// The fetcher only talks to this trait, so tests can swap in an
/// in-memory implementation.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Metadata for the repository itself.
    async fn repository_info(&self, repo: &RepositoryIdentifier) -> Result<RepositoryInfo>;

    /// Immediate children of `path` ("" is the repository root).
    async fn list_entries(&self, repo: &RepositoryIdentifier, path: &str)
        -> Result<Vec<RemoteEntry>>;

    /// The file's content. UTF-8 text comes back verbatim; anything else
    /// is base64 text and is never decoded further.
    async fn fetch_file_body(&self, repo: &RepositoryIdentifier, path: &str) -> Result<String>;
}

/// `ContentClient` backed by the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-snapshot/", env!("CARGO_PKG_VERSION"))),
        );

        match &config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|_| SnapshotError::InvalidInput("token contains invalid characters".to_string()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("No GitHub token configured, requests are anonymous and heavily rate limited"),
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, &config.api_base))
    }

    /// Use a pre-built reqwest client (default headers are up to the caller).
    pub fn with_client(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// `{api_base}/repos/{owner}/{repo}` followed by `extra` segments.
    ///
    /// Every segment is percent-encoded on its own, so names like `C#` or
    /// `a b?.md` stay part of the path instead of starting a fragment or query.
    fn endpoint<'s>(
        &self,
        repo: &'s RepositoryIdentifier,
        extra: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url> {
        let invalid_base =
            || SnapshotError::InvalidInput(format!("invalid API base URL: {}", self.api_base));

        let mut url = Url::parse(&self.api_base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str()])
            .extend(extra);
        Ok(url)
    }

    fn repo_url(&self, repo: &RepositoryIdentifier) -> Result<Url> {
        self.endpoint(repo, std::iter::empty())
    }

    fn contents_url<'s>(&self, repo: &'s RepositoryIdentifier, path: &'s str) -> Result<Url> {
        let segments = path.split('/').filter(|s| !s.is_empty());
        self.endpoint(repo, std::iter::once("contents").chain(segments))
    }

    async fn get(&self, url: Url, accept: &'static str) -> Result<Response> {
        trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await?;
        check_status(url.as_str(), response)
    }
}

#[async_trait]
impl ContentClient for GitHubClient {
    async fn repository_info(&self, repo: &RepositoryIdentifier) -> Result<RepositoryInfo> {
        let url = self.repo_url(repo)?;
        let response = self.get(url, ACCEPT_JSON).await?;
        response
            .json::<RepositoryInfo>()
            .await
            .map_err(|e| SnapshotError::Remote(format!("failed to parse repository info: {}", e)))
    }

    async fn list_entries(
        &self,
        repo: &RepositoryIdentifier,
        path: &str,
    ) -> Result<Vec<RemoteEntry>> {
        let url = self.contents_url(repo, path)?;
        let response = self.get(url, ACCEPT_JSON).await?;
        let listing = response
            .json::<ListingResponse>()
            .await
            .map_err(|e| SnapshotError::Remote(format!("failed to parse listing of '{}': {}", path, e)))?;
        let entries = listing.into_entries();
        debug!("Listed {} entries under '{}'", entries.len(), path);
        Ok(entries)
    }

    async fn fetch_file_body(&self, repo: &RepositoryIdentifier, path: &str) -> Result<String> {
        let url = self.contents_url(repo, path)?;
        let response = self.get(url, ACCEPT_RAW).await?;
        let bytes = response.bytes().await?;
        debug!("Fetched {} ({} bytes)", path, bytes.len());
        Ok(body_to_text(bytes.to_vec()))
    }
}

/// Maps a non-success HTTP status onto our error kinds.
///
/// HTTP status codes:
/// - 404: the repository or path doesn't exist
/// - 401/403/429: bad credentials or rate limit
/// - everything else: generic failure
fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(classify_status(url, status))
}

fn classify_status(url: &str, status: StatusCode) -> SnapshotError {
    match status {
        StatusCode::NOT_FOUND => SnapshotError::NotFound(url.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            SnapshotError::RateLimitedOrUnauthorized(format!("HTTP {}", status.as_u16()))
        }
        other => SnapshotError::Remote(format!("{}: HTTP {}", url, other.as_u16())),
    }
}

/// Text passes through untouched; binary becomes base64.
fn body_to_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => base64::engine::general_purpose::STANDARD.encode(e.into_bytes()),
    }
}
