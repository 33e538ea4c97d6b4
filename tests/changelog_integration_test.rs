//! Integration tests for the changelog lookup pipeline.
//!
//! This test suite runs the full lookup end to end against mock registry and
//! hosting servers, and exercises the lockfile reader with a realistic
//! fixture. Call-count expectations on the mocks verify that each collaborator
//! is contacted exactly once per load.

use whatsup::changelog::{ChangelogError, ChangelogFetcher, GithubClient, RubygemsClient};
use whatsup::gemfile::Gemfile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a registry response for one gem on the given server.
async fn mount_gem_info(server: &MockServer, gem: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/gems/{}.json", gem)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_pipeline_finds_changelog() {
    let server = MockServer::start().await;

    mount_gem_info(
        &server,
        "sinatra",
        serde_json::json!({
            "name": "sinatra",
            "source_code_uri": "https://github.com/sinatra/sinatra.git",
            "homepage_uri": "http://sinatrarb.com/"
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repos/sinatra/sinatra/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "README.md", "type": "file"},
            {"name": "CHANGELOG.md", "type": "file"},
            {"name": "LICENSE", "type": "file"},
            {"name": "lib", "type": "dir"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // "# Changelog\n\n## 4.1.0\n" base64-encoded
    Mock::given(method("GET"))
        .and(path("/repos/sinatra/sinatra/contents/CHANGELOG.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": "IyBDaGFuZ2Vsb2cKCiMjIDQuMS4wCg=="
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let fetcher = ChangelogFetcher::load(&registry, &github, "sinatra")
        .await
        .unwrap();

    // The .git suffix is stripped from the derived identifier.
    assert_eq!(fetcher.repo_name(), "sinatra/sinatra");
    assert_eq!(fetcher.filename(), Some("CHANGELOG.md"));
    assert!(fetcher.has_changelog());
    assert_eq!(fetcher.content(), Some("# Changelog\n\n## 4.1.0\n"));

    // Repeated accessor calls return the cached values; the .expect(1)
    // mock expectations verify no service is contacted again on drop.
    assert_eq!(fetcher.repo_name(), "sinatra/sinatra");
    assert_eq!(fetcher.filename(), Some("CHANGELOG.md"));
}

#[tokio::test]
async fn test_full_pipeline_no_changelog_is_not_an_error() {
    let server = MockServer::start().await;

    mount_gem_info(
        &server,
        "bare",
        serde_json::json!({
            "name": "bare",
            "source_code_uri": "https://github.com/org/bare"
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repos/org/bare/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "README.md", "type": "file"},
            {"name": "LICENSE", "type": "file"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let fetcher = ChangelogFetcher::load(&registry, &github, "bare")
        .await
        .unwrap();

    assert!(!fetcher.has_changelog());
    assert_eq!(fetcher.filename(), None);
    assert_eq!(fetcher.content(), None);
}

#[tokio::test]
async fn test_full_pipeline_directory_named_changelog_is_skipped() {
    let server = MockServer::start().await;

    mount_gem_info(
        &server,
        "dirgem",
        serde_json::json!({
            "name": "dirgem",
            "source_code_uri": "https://github.com/org/dirgem"
        }),
    )
    .await;

    // A directory whose name matches the pattern must not be selected.
    Mock::given(method("GET"))
        .and(path("/repos/org/dirgem/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "changelog", "type": "dir"},
            {"name": "changes.txt", "type": "file"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/org/dirgem/contents/changes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": "Y2hhbmdlcwo="
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let fetcher = ChangelogFetcher::load(&registry, &github, "dirgem")
        .await
        .unwrap();

    assert_eq!(fetcher.filename(), Some("changes.txt"));
    assert_eq!(fetcher.content(), Some("changes\n"));
}

#[tokio::test]
async fn test_full_pipeline_homepage_fallback() {
    let server = MockServer::start().await;

    mount_gem_info(
        &server,
        "homegem",
        serde_json::json!({
            "name": "homegem",
            "source_code_uri": "https://example.com/docs",
            "homepage_uri": "https://github.com/org/homegem"
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repos/org/homegem/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let fetcher = ChangelogFetcher::load(&registry, &github, "homegem")
        .await
        .unwrap();

    assert_eq!(fetcher.repo_name(), "org/homegem");
    assert!(!fetcher.has_changelog());
}

#[tokio::test]
async fn test_full_pipeline_unknown_gem() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gems/ghost.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let result = ChangelogFetcher::load(&registry, &github, "ghost").await;

    assert!(matches!(
        result.unwrap_err(),
        ChangelogError::GemNotFound(name) if name == "ghost"
    ));
}

#[tokio::test]
async fn test_full_pipeline_no_usable_urls() {
    let server = MockServer::start().await;

    mount_gem_info(
        &server,
        "urlless",
        serde_json::json!({
            "name": "urlless",
            "source_code_uri": null,
            "homepage_uri": "https://example.com/"
        }),
    )
    .await;

    let registry = RubygemsClient::new().with_base_url(server.uri());
    let github = GithubClient::new().with_base_url(server.uri());

    let result = ChangelogFetcher::load(&registry, &github, "urlless").await;

    assert!(matches!(
        result.unwrap_err(),
        ChangelogError::MissingRepoUrl(name) if name == "urlless"
    ));
}

#[tokio::test]
async fn test_lockfile_fixture_drives_lookups() {
    let lockfile = include_str!("fixtures/Gemfile.lock");
    let gemfile = Gemfile::parse(lockfile);

    let declared = gemfile.dependencies_versions();
    assert_eq!(declared.len(), 3);
    assert_eq!(declared.get("rake"), Some(&Some("13.0.6".to_string())));
    assert_eq!(declared.get("rspec"), Some(&Some("3.12.0".to_string())));
    assert_eq!(declared.get("sinatra"), Some(&Some("4.1.1".to_string())));

    // Every declared dependency resolves in a consistent snapshot.
    assert!(declared.values().all(Option::is_some));

    // The resolved set is a superset of the declared set.
    let resolved = gemfile.specs_versions();
    assert!(declared.keys().all(|name| resolved.contains_key(name)));
    assert!(resolved.len() > declared.len());
}
