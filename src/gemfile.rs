//! Lockfile snapshot reading and name→version mappings.
//!
//! Bundler is the dependency resolver here; this module does not resolve
//! anything itself. It reads the resolved snapshot Bundler writes to
//! `Gemfile.lock` and reshapes it into two mappings: every resolved gem's
//! version, and the declared top-level dependencies' versions.
//!
//! Both mappings derive from a single parse of one snapshot, so they are
//! always consistent with each other.
//!
//! ## Examples
//!
//! ```
//! use whatsup::gemfile::Gemfile;
//!
//! let lockfile = "\
//! GEM
//!   remote: https://rubygems.org/
//!   specs:
//!     rake (13.0.6)
//!     rspec (3.12.0)
//!
//! DEPENDENCIES
//!   rspec
//! ";
//!
//! let gemfile = Gemfile::parse(lockfile);
//! assert_eq!(gemfile.specs_versions().get("rake").map(String::as_str), Some("13.0.6"));
//! assert_eq!(
//!     gemfile.dependencies_versions().get("rspec"),
//!     Some(&Some("3.12.0".to_string()))
//! );
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// A resolved spec line: exactly four spaces of indent, `name (version)`.
/// Deeper-indented lines are a spec's own requirements and do not match.
static SPEC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4}(\S+) \(([^)]+)\)$").unwrap());

/// Error types for lockfile reading.
///
/// Parsing itself never fails; a snapshot with missing or empty sections
/// simply yields empty mappings. Only the file read can error.
#[derive(Error, Debug)]
pub enum GemfileError {
    /// Reading the lockfile failed
    #[error("failed to read lockfile: {0}")]
    Io(#[from] std::io::Error),
}

/// One resolved gem from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemSpec {
    /// Gem name
    pub name: String,
    /// Resolved version string, exactly as written in the lockfile
    pub version: String,
}

/// Which part of the lockfile the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// A source section (`GEM`, `GIT`, `PATH`) carrying a `specs:` block
    Source,
    /// The `DEPENDENCIES` section
    Dependencies,
    /// Anything else (`PLATFORMS`, `BUNDLED WITH`, ...)
    Other,
}

/// A parsed dependency snapshot.
///
/// Immutable once built; re-parse the lockfile to observe manifest changes.
#[derive(Debug, Clone)]
pub struct Gemfile {
    specs: Vec<GemSpec>,
    dependencies: Vec<String>,
}

impl Gemfile {
    /// Read and parse a lockfile from disk.
    ///
    /// ## Errors
    ///
    /// `GemfileError::Io` if the file cannot be read. Malformed content is
    /// not an error; unrecognized lines are skipped.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GemfileError> {
        let content = fs::read_to_string(path.as_ref()).await?;
        debug!(path = %path.as_ref().display(), "Loaded lockfile");
        Ok(Self::parse(&content))
    }

    /// Parse a lockfile snapshot.
    ///
    /// Resolved specs are collected from the `specs:` blocks of every source
    /// section (`GEM`, `GIT`, `PATH`); declared names come from
    /// `DEPENDENCIES`, with version constraints and source-pin markers (`!`)
    /// stripped. Both lists are sorted by name.
    pub fn parse(content: &str) -> Self {
        let mut specs = Vec::new();
        let mut dependencies = Vec::new();
        let mut section = Section::Other;

        for line in content.lines() {
            if !line.starts_with(' ') {
                section = match line.trim_end() {
                    "GEM" | "GIT" | "PATH" => Section::Source,
                    "DEPENDENCIES" => Section::Dependencies,
                    _ => Section::Other,
                };
                continue;
            }

            match section {
                Section::Source => {
                    if let Some(captures) = SPEC_LINE_RE.captures(line) {
                        specs.push(GemSpec {
                            name: captures[1].to_string(),
                            version: captures[2].to_string(),
                        });
                    }
                }
                Section::Dependencies => {
                    // Declared entries sit at exactly two spaces of indent.
                    if let Some(entry) = line.strip_prefix("  ")
                        && !entry.starts_with(' ')
                        && let Some(name) = entry.split_whitespace().next()
                    {
                        dependencies.push(name.trim_end_matches('!').to_string());
                    }
                }
                Section::Other => {}
            }
        }

        specs.sort_by(|a, b| a.name.cmp(&b.name));
        dependencies.sort();

        Self {
            specs,
            dependencies,
        }
    }

    /// Every resolved gem in the snapshot, sorted by name.
    pub fn specs(&self) -> &[GemSpec] {
        &self.specs
    }

    /// Every declared top-level dependency name, sorted.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Map every resolved gem's name to its version string.
    pub fn specs_versions(&self) -> BTreeMap<String, String> {
        self.specs
            .iter()
            .map(|spec| (spec.name.clone(), spec.version.clone()))
            .collect()
    }

    /// Map every declared dependency name to its resolved version.
    ///
    /// A declared name with no corresponding resolved spec maps to `None`
    /// rather than being dropped or raising; Bundler guarantees declared
    /// dependencies are resolved, so `None` only appears for an internally
    /// inconsistent snapshot.
    pub fn dependencies_versions(&self) -> BTreeMap<String, Option<String>> {
        let resolved = self.specs_versions();

        self.dependencies
            .iter()
            .map(|name| (name.clone(), resolved.get(name).cloned()))
            .collect()
    }
}
