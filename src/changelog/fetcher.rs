//! The changelog lookup pipeline.
//!
//! [`ChangelogFetcher::load`] runs the full lookup for one gem: registry
//! metadata, repository identification, root listing, filename match, and
//! content fetch. The result is an immutable value; every stage runs exactly
//! once per load and repeated accessor calls never re-contact a service.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use whatsup::changelog::{ChangelogFetcher, GithubClient, RubygemsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RubygemsClient::new();
//! let github = GithubClient::new();
//!
//! let fetcher = ChangelogFetcher::load(&registry, &github, "rspec").await?;
//! if fetcher.has_changelog() {
//!     println!("{} has {}", fetcher.repo_name(), fetcher.filename().unwrap());
//! }
//! # Ok(())
//! # }
//! ```

use super::github::GithubClient;
use super::registry::RubygemsClient;
use super::types::{ChangelogError, GemMetadata};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Matches changelog-ish filenames: `changelog` or `changes`, optionally
/// followed by one character and an `md`/`txt` extension. Deliberately loose
/// and unanchored, so `CHANGELOG`, `Changes.txt`, and even
/// `changelog_old_format.json` all match. The boundary of the historical
/// pattern is undocumented, so it is kept verbatim rather than tightened.
static CHANGELOG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(changelog|changes).?(md|txt)?").unwrap());

/// Matches a GitHub repository URL and captures the `owner/repo` part.
/// The capture is greedy: `https://github.com/org/repo.git` captures
/// `org/repo.git`, and the `.git` suffix is stripped afterwards.
static GEM_REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https|http)://github\.com/(?<repo>\S+/\S+)").unwrap());

/// A completed changelog lookup for one gem.
///
/// Constructed by [`ChangelogFetcher::load`]; immutable once built. A missing
/// changelog is a valid terminal state (`content` absent), not an error.
#[derive(Debug, Clone)]
pub struct ChangelogFetcher {
    repo_name: String,
    filename: Option<String>,
    content: Option<String>,
}

impl ChangelogFetcher {
    /// Run the full lookup pipeline for `gem_name`.
    ///
    /// Each collaborating service is contacted at most once: one registry
    /// metadata fetch, one root listing, and one content fetch when a
    /// changelog filename resolved.
    ///
    /// ## Errors
    ///
    /// - `ChangelogError::GemNotFound`: the registry has no record for the gem
    /// - `ChangelogError::MissingRepoUrl`: neither metadata URL identifies a
    ///   GitHub repository
    /// - `ChangelogError::Http` / `ChangelogError::ContentDecode`: transport
    ///   or payload failures from the underlying clients, unmodified
    pub async fn load(
        registry: &RubygemsClient,
        github: &GithubClient,
        gem_name: &str,
    ) -> Result<Self, ChangelogError> {
        let metadata = registry.gem_info(gem_name).await?;
        let repo_name = repo_name_from_metadata(&metadata)?;

        debug!(gem = %metadata.name, repo = %repo_name, "Resolved repository");

        let filename = resolve_changelog_filename(github, &repo_name).await?;

        let content = match &filename {
            Some(name) => Some(github.file_content(&repo_name, name).await?),
            None => {
                debug!(repo = %repo_name, "No changelog file in repository root");
                None
            }
        };

        Ok(Self {
            repo_name,
            filename,
            content,
        })
    }

    /// The `owner/repo` identifier derived from the gem's metadata.
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// The matched changelog filename, if one was found.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The decoded changelog content, if one was found.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the gem's repository had a changelog file.
    pub fn has_changelog(&self) -> bool {
        self.content.is_some()
    }
}

/// Derive an `owner/repo` identifier from gem metadata.
///
/// Candidate URLs are tried in a fixed order: the source code URL first, the
/// homepage URL second. The first candidate matching [`GEM_REPO_RE`] wins; a
/// single trailing `.git` suffix is stripped from the capture.
fn repo_name_from_metadata(metadata: &GemMetadata) -> Result<String, ChangelogError> {
    let candidates = [
        metadata.source_code_uri.as_deref(),
        metadata.homepage_uri.as_deref(),
    ];

    for url in candidates.into_iter().flatten() {
        if let Some(captures) = GEM_REPO_RE.captures(url) {
            let repo = captures.name("repo").map(|m| m.as_str()).unwrap_or(url);
            return Ok(repo.strip_suffix(".git").unwrap_or(repo).to_string());
        }
    }

    Err(ChangelogError::MissingRepoUrl(metadata.name.clone()))
}

/// Pick the changelog filename from a repository's root listing.
///
/// Directories are excluded, then the first remaining filename matching
/// [`CHANGELOG_NAME_RE`] in listing order is taken. The listing order is
/// whatever the hosting API returned; no sort is applied.
async fn resolve_changelog_filename(
    github: &GithubClient,
    repo: &str,
) -> Result<Option<String>, ChangelogError> {
    let entries = github.list_root(repo).await?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == "file")
        .map(|entry| entry.name)
        .find(|name| CHANGELOG_NAME_RE.is_match(name)))
}
