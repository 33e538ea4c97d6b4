//! Changelog retrieval for published gems.
//!
//! This module locates and fetches the changelog file of a gem's source
//! repository. The lookup is a single linear pipeline:
//!
//! 1. Fetch the gem's published metadata from rubygems.org
//! 2. Derive an `owner/repo` identifier from the metadata's source code URL,
//!    falling back to the homepage URL
//! 3. List the repository root via the GitHub contents API and match
//!    filenames against a changelog naming pattern
//! 4. Fetch and base64-decode the matched file's content
//!
//! There is no retry, caching, or concurrency; each stage either produces a
//! value for the next stage or ends the lookup.
//!
//! ## Module Structure
//!
//! - [`types`]: wire records and the error taxonomy
//! - [`registry`]: rubygems.org metadata client
//! - [`github`]: GitHub contents API client
//! - [`fetcher`]: the pipeline itself
//!
//! ## Examples
//!
//! ```rust,no_run
//! use whatsup::changelog::{ChangelogFetcher, GithubClient, RubygemsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RubygemsClient::new();
//! let github = GithubClient::new();
//! let fetcher = ChangelogFetcher::load(&registry, &github, "nokogiri").await?;
//! println!("has changelog: {}", fetcher.has_changelog());
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
pub mod github;
pub mod registry;
pub mod types;

pub use fetcher::ChangelogFetcher;
pub use github::GithubClient;
pub use registry::RubygemsClient;
pub use types::{ChangelogError, GemMetadata};
