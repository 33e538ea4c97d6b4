//! GitHub contents API client.
//!
//! This module provides the two repository operations the lookup pipeline
//! needs: listing the files at a repository's root and fetching a single
//! file's content. GitHub returns file content base64-encoded (wrapped with
//! newlines); [`GithubClient::file_content`] decodes it to text.
//!
//! ## Authentication
//!
//! If `GITHUB_TOKEN` is set in the environment it is passed through as a
//! bearer token. No other auth handling is done; unauthenticated requests
//! work within GitHub's anonymous rate limits.
//!
//! ## Testing
//!
//! Use [`GithubClient::with_base_url`] to override the base URL for testing
//! with a mock server.

use super::types::ChangelogError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Default base URL for the GitHub REST API.
const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// One entry from a repository contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    /// Filename, without any path prefix
    pub name: String,
    /// Entry kind as reported by the API: `"file"`, `"dir"`, `"symlink"`, ...
    #[serde(rename = "type")]
    pub kind: String,
}

/// Wire shape of a single-file contents response.
#[derive(Debug, Deserialize)]
struct FileContentResponse {
    /// Base64 payload, wrapped with newlines by the API
    content: String,
}

/// Client for repository file listings and content retrieval.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Creates a new client using the default GitHub API.
    ///
    /// The token is read from `GITHUB_TOKEN` once at construction; requests
    /// made by this client never re-read the environment.
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .user_agent(concat!("whatsup/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build client"),
            base_url: GITHUB_API_BASE_URL.to_string(),
            token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }

    /// Sets a custom base URL for the API.
    ///
    /// This is primarily useful for testing with a mock server.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the bearer token explicitly, overriding the environment.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    /// List the entries at the root of a repository.
    ///
    /// `repo` is an `owner/repo` identifier. The listing order is whatever
    /// the API returns; no sorting is applied.
    ///
    /// ## Errors
    ///
    /// `ChangelogError::Http` for network failures or any non-2xx status
    /// (including 404 for an unknown repository).
    pub async fn list_root(&self, repo: &str) -> Result<Vec<RepoEntry>, ChangelogError> {
        let url = format!("{}/repos/{}/contents/", self.base_url, repo);

        debug!(repo = %repo, "Listing repository root");

        let entries = self
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(entries)
    }

    /// Fetch one file's content and decode it to text.
    ///
    /// The API delivers content base64-encoded with embedded newlines; the
    /// payload is stripped of whitespace before decoding. Non-UTF-8 bytes in
    /// the decoded content are replaced rather than rejected.
    ///
    /// ## Errors
    ///
    /// - `ChangelogError::Http`: network failure or non-2xx status
    /// - `ChangelogError::ContentDecode`: payload is not valid base64
    pub async fn file_content(&self, repo: &str, path: &str) -> Result<String, ChangelogError> {
        let url = format!("{}/repos/{}/contents/{}", self.base_url, repo, path);

        debug!(repo = %repo, path = %path, "Fetching file content");

        let response: FileContentResponse = self
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let payload: String = response
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64.decode(payload)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}
