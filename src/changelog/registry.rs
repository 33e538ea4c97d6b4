//! Rubygems.org metadata client.
//!
//! This module provides a thin client over the rubygems.org API v1 gem info
//! endpoint, which is the only registry call the lookup pipeline makes.
//!
//! ## API Endpoint
//!
//! `https://rubygems.org/api/v1/gems/{name}.json`
//!
//! ## Testing
//!
//! Use [`RubygemsClient::with_base_url`] to override the base URL for testing
//! with a mock server.

use super::types::{ChangelogError, GemMetadata};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Default base URL for the rubygems.org API.
const RUBYGEMS_BASE_URL: &str = "https://rubygems.org/api/v1";

/// Client for gem metadata lookups against rubygems.org.
#[derive(Debug, Clone)]
pub struct RubygemsClient {
    http: Client,
    base_url: String,
}

impl RubygemsClient {
    /// Creates a new client using the default rubygems.org API.
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .user_agent(concat!("whatsup/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build client"),
            base_url: RUBYGEMS_BASE_URL.to_string(),
        }
    }

    /// Sets a custom base URL for the API.
    ///
    /// This is primarily useful for testing with a mock server.
    ///
    /// ## Examples
    ///
    /// ```ignore
    /// let registry = RubygemsClient::new()
    ///     .with_base_url("http://localhost:8080/api/v1");
    /// ```
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch the published metadata record for a gem.
    ///
    /// The gem name is case-normalized to lowercase before the lookup, since
    /// the registry keys records by lowercase name.
    ///
    /// ## Errors
    ///
    /// - `ChangelogError::GemNotFound`: the registry has no record for `name`
    /// - `ChangelogError::Http`: network failure or any other non-2xx status
    pub async fn gem_info(&self, name: &str) -> Result<GemMetadata, ChangelogError> {
        let name = name.to_lowercase();
        let url = format!("{}/gems/{}.json", self.base_url, name);

        debug!(gem = %name, "Fetching gem metadata");

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ChangelogError::GemNotFound(name));
        }

        let metadata: GemMetadata = response.error_for_status()?.json().await?;
        Ok(metadata)
    }
}

impl Default for RubygemsClient {
    fn default() -> Self {
        Self::new()
    }
}
