//! Core types for changelog retrieval.
//!
//! This module defines the registry metadata record consumed by the lookup
//! pipeline and the error taxonomy shared across the [`changelog`](super)
//! module.

use serde::Deserialize;
use thiserror::Error;

/// Error types for changelog operations.
///
/// Transport-level failures (timeouts, non-2xx statuses from either service)
/// surface as [`ChangelogError::Http`] carrying the underlying client error
/// unmodified. "No changelog file found" is not an error; it is the absent
/// content on a loaded [`ChangelogFetcher`](super::ChangelogFetcher).
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry has no record for the requested gem
    #[error("gem {0} not found")]
    GemNotFound(String),

    /// Neither the source code URL nor the homepage URL identifies a repository
    #[error("no valid source or homepage url specified for gem {0}")]
    MissingRepoUrl(String),

    /// The file content payload was not valid base64
    #[error("failed to decode changelog content: {0}")]
    ContentDecode(#[from] base64::DecodeError),
}

/// Published metadata for a gem, as returned by the registry.
///
/// Only the fields the lookup pipeline consumes are deserialized; both URLs
/// are nullable in the registry's JSON and frequently absent in practice.
#[derive(Debug, Clone, Deserialize)]
pub struct GemMetadata {
    /// The gem's canonical (lowercase) name
    pub name: String,
    /// URL of the gem's source repository, if published
    pub source_code_uri: Option<String>,
    /// URL of the gem's homepage, if published
    pub homepage_uri: Option<String>,
}
