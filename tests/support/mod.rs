//! Shared fixtures for integration tests: canned GitHub API payloads and
//! wiremock mount helpers.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A canned pull request body with the given base/head shas.
#[must_use]
pub fn pull_request_json(base_sha: &str, head_sha: &str) -> Value {
    json!({
        "number": 42,
        "title": "Refresh baseline screenshots",
        "html_url": "https://github.com/octo/shots/pull/42",
        "base": { "sha": base_sha, "label": "octo:main" },
        "head": { "sha": head_sha, "label": "octo:feature" }
    })
}

/// A canned compare body listing the given filenames.
#[must_use]
pub fn compare_json(filenames: &[&str]) -> Value {
    let files: Vec<Value> = filenames
        .iter()
        .map(|name| json!({"filename": name, "status": "modified", "additions": 0, "deletions": 0}))
        .collect();
    json!({ "files": files })
}

/// Mounts the PR metadata endpoint for `octo/shots` PR 42.
pub async fn mount_pull_request(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/shots/pulls/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the compare endpoint for the given base/head shas.
pub async fn mount_compare(server: &MockServer, base_sha: &str, head_sha: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/octo/shots/compare/{base_sha}...{head_sha}"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
