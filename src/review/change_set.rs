//! Resolves the set of changed PNG files for a pull request.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::TtlCache;
use crate::github::error::GatewayError;
use crate::github::gateway::GitHubGateway;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{ComparedFile, PullRequestHead};

/// Freshness window for resolved change sets.
///
/// The cache key embeds the head sha, so a force-push is a guaranteed miss;
/// this window only bounds how long the compare result is reused for an
/// unchanged head.
pub const CHANGE_SET_TTL: Duration = Duration::from_secs(120);

/// One changed file in a pull request that is an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedImage {
    /// Repository-relative file path.
    pub path: String,
    /// Change status (added, modified, removed, renamed).
    pub status: String,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

impl From<ComparedFile> for ChangedImage {
    fn from(value: ComparedFile) -> Self {
        Self {
            path: value.path,
            status: value.status,
            additions: value.additions,
            deletions: value.deletions,
        }
    }
}

/// The resolved comparison for one pull request at one head commit.
///
/// Valid only for the exact head sha it was computed for; entries keyed on
/// an older head simply age out of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Pull request number.
    pub pr_number: u64,
    /// Base commit sha.
    pub base_ref: String,
    /// Head commit sha.
    pub head_ref: String,
    /// Base branch label.
    pub base_label: Option<String>,
    /// Head branch label.
    pub head_label: Option<String>,
    /// Pull request title.
    pub pr_title: Option<String>,
    /// Pull request HTML URL.
    pub pr_url: Option<String>,
    /// Changed PNG files in upstream compare order.
    pub images: Vec<ChangedImage>,
}

/// Resolves and caches the changed-image list for pull requests.
pub struct ChangeSetResolver {
    gateway: Arc<dyn GitHubGateway>,
    cache: Arc<TtlCache<ChangeSet>>,
}

impl ChangeSetResolver {
    /// Creates a resolver over the given gateway and cache instance.
    ///
    /// The cache is injected rather than process-global so tests get a fresh
    /// cache per resolver.
    #[must_use]
    pub fn new(gateway: Arc<dyn GitHubGateway>, cache: Arc<TtlCache<ChangeSet>>) -> Self {
        Self { gateway, cache }
    }

    /// Resolves the changed PNG files for the pull request.
    ///
    /// Fetches PR metadata first to learn the head sha, then serves from
    /// cache when a result for that exact head is still fresh. On a miss the
    /// compare API is called once and the filtered result is cached. An
    /// empty image list is a valid, successful result.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamStatus`] when the metadata or compare
    /// call does not succeed, or [`GatewayError::Network`] on transport
    /// failures.
    pub async fn resolve(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<ChangeSet, GatewayError> {
        let head = self.gateway.pull_request(locator).await?;
        let key = cache_key(locator, &head.head_sha);

        if let Some(cached) = self.cache.get(&key, CHANGE_SET_TTL) {
            debug!(key, "serving change set from cache");
            return Ok(cached);
        }

        let files = self
            .gateway
            .compare(locator, &head.base_sha, &head.head_sha)
            .await?;

        let change_set = build_change_set(&head, files);
        self.cache.insert(key, change_set.clone());
        Ok(change_set)
    }
}

fn cache_key(locator: &PullRequestLocator, head_sha: &str) -> String {
    format!(
        "{owner}/{repo}:{number}:{head_sha}",
        owner = locator.owner().as_str(),
        repo = locator.repository().as_str(),
        number = locator.number().get(),
    )
}

fn build_change_set(head: &PullRequestHead, files: Vec<ComparedFile>) -> ChangeSet {
    let images = files
        .into_iter()
        .filter(|file| is_png(&file.path))
        .map(ChangedImage::from)
        .collect();

    ChangeSet {
        pr_number: head.number,
        base_ref: head.base_sha.clone(),
        head_ref: head.head_sha.clone(),
        base_label: head.base_label.clone(),
        head_label: head.head_label.clone(),
        pr_title: head.title.clone(),
        pr_url: head.html_url.clone(),
        images,
    }
}

/// Case-insensitive suffix match; path storage stays case-sensitive.
fn is_png(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::{ChangeSetResolver, is_png};
    use crate::cache::TtlCache;
    use crate::github::MockGitHubGateway;
    use crate::github::error::GatewayError;
    use crate::github::locator::PullRequestLocator;
    use crate::github::models::{ComparedFile, PullRequestHead};

    fn locator() -> PullRequestLocator {
        let base = url::Url::parse("https://api.github.com").expect("base URL should parse");
        PullRequestLocator::from_parts(&base, "octo", "shots", 42).expect("locator should build")
    }

    fn head(head_sha: &str) -> PullRequestHead {
        PullRequestHead {
            number: 42,
            title: Some("Test PR".to_owned()),
            html_url: Some("http://gh/pr/42".to_owned()),
            base_sha: "aaa".to_owned(),
            head_sha: head_sha.to_owned(),
            base_label: Some("octo:main".to_owned()),
            head_label: Some("octo:feature".to_owned()),
        }
    }

    fn file(path: &str) -> ComparedFile {
        ComparedFile {
            path: path.to_owned(),
            status: "modified".to_owned(),
            additions: 0,
            deletions: 0,
        }
    }

    #[rstest]
    #[case::lowercase("a.png", true)]
    #[case::uppercase("A.PNG", true)]
    #[case::mixed("c.Png", true)]
    #[case::jpeg("d.jpg", false)]
    #[case::no_extension("png", false)]
    #[case::nested("tests/screenshots/baseline/test.png", true)]
    fn is_png_matches_suffix_case_insensitively(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_png(path), expected);
    }

    #[tokio::test]
    async fn resolve_filters_to_png_files_preserving_order() {
        let mut gateway = MockGitHubGateway::new();
        gateway
            .expect_pull_request()
            .returning(|_| Ok(head("bbb")));
        gateway.expect_compare().returning(|_, base, head_sha| {
            assert_eq!(base, "aaa");
            assert_eq!(head_sha, "bbb");
            Ok(vec![file("img/a.png"), file("src/x.py"), file("img/B.PNG")])
        });

        let resolver = ChangeSetResolver::new(Arc::new(gateway), Arc::new(TtlCache::new()));
        let change_set = resolver
            .resolve(&locator())
            .await
            .expect("resolve should succeed");

        assert_eq!(change_set.base_ref, "aaa");
        assert_eq!(change_set.head_ref, "bbb");
        let paths: Vec<&str> = change_set
            .images
            .iter()
            .map(|image| image.path.as_str())
            .collect();
        assert_eq!(paths, ["img/a.png", "img/B.PNG"]);
    }

    #[tokio::test]
    async fn resolve_serves_second_call_from_cache() {
        let mut gateway = MockGitHubGateway::new();
        gateway
            .expect_pull_request()
            .times(2)
            .returning(|_| Ok(head("bbb")));
        gateway
            .expect_compare()
            .times(1)
            .returning(|_, _, _| Ok(vec![file("img/a.png")]));

        let resolver = ChangeSetResolver::new(Arc::new(gateway), Arc::new(TtlCache::new()));
        let first = resolver
            .resolve(&locator())
            .await
            .expect("first resolve should succeed");
        let second = resolver
            .resolve(&locator())
            .await
            .expect("second resolve should succeed");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn force_push_changes_the_key_and_bypasses_the_cached_result() {
        let mut gateway = MockGitHubGateway::new();
        let mut shas = vec!["ccc", "bbb"];
        gateway
            .expect_pull_request()
            .times(2)
            .returning(move |_| Ok(head(shas.pop().expect("two calls expected"))));
        gateway
            .expect_compare()
            .times(2)
            .returning(|_, _, head_sha| {
                if head_sha == "bbb" {
                    Ok(vec![file("img/a.png")])
                } else {
                    Ok(vec![file("img/b.png")])
                }
            });

        let resolver = ChangeSetResolver::new(Arc::new(gateway), Arc::new(TtlCache::new()));
        let before = resolver
            .resolve(&locator())
            .await
            .expect("resolve before force-push should succeed");
        let after = resolver
            .resolve(&locator())
            .await
            .expect("resolve after force-push should succeed");

        assert_eq!(before.head_ref, "bbb");
        assert_eq!(after.head_ref, "ccc");
        assert_ne!(before.images, after.images, "stale result must not be served");
    }

    #[tokio::test]
    async fn resolve_surfaces_pull_request_status_and_skips_compare() {
        let mut gateway = MockGitHubGateway::new();
        gateway.expect_pull_request().returning(|_| {
            Err(GatewayError::UpstreamStatus {
                operation: "pull request",
                status: 404,
                message: "Not Found".to_owned(),
            })
        });
        gateway.expect_compare().never();

        let resolver = ChangeSetResolver::new(Arc::new(gateway), Arc::new(TtlCache::new()));
        let error = resolver
            .resolve(&locator())
            .await
            .expect_err("resolve should fail");

        assert_eq!(error.upstream_status(), Some(404));
    }

    #[tokio::test]
    async fn resolve_with_zero_images_is_a_successful_empty_result() {
        let mut gateway = MockGitHubGateway::new();
        gateway
            .expect_pull_request()
            .returning(|_| Ok(head("bbb")));
        gateway
            .expect_compare()
            .returning(|_, _, _| Ok(vec![file("src/x.py")]));

        let resolver = ChangeSetResolver::new(Arc::new(gateway), Arc::new(TtlCache::new()));
        let change_set = resolver
            .resolve(&locator())
            .await
            .expect("resolve should succeed");
        assert!(change_set.images.is_empty());
    }
}
