//! Whatsup - changelog discovery for the gems in your bundle.
//!
//! This library answers one question for each gem in a project's bundle:
//! "what changed?". It reads the resolved dependency snapshot that Bundler
//! writes (`Gemfile.lock`), looks each gem up on rubygems.org, derives the
//! gem's GitHub repository from its published metadata, and pulls the
//! repository's changelog file if one exists.
//!
//! ## Module Structure
//!
//! - [`changelog`]: registry metadata lookup, repository identification, and
//!   changelog file retrieval via the GitHub contents API
//! - [`gemfile`]: lockfile snapshot parsing and name→version mappings
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
//! let fetcher = ChangelogFetcher::load(&registry, &github, "sinatra").await?;
//! if let Some(content) = fetcher.content() {
//!     println!("{}", content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod changelog;
pub mod gemfile;

pub use changelog::fetcher::ChangelogFetcher;
pub use changelog::github::GithubClient;
pub use changelog::registry::RubygemsClient;
pub use changelog::types::ChangelogError;
pub use gemfile::Gemfile;
