//! Relays per-file review comments between the frontend and GitHub.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::github::error::GatewayError;
use crate::github::gateway::{CommentDraft, GitHubGateway};
use crate::github::locator::PullRequestLocator;
use crate::github::models::ReviewComment;

/// Lists, tallies, and creates per-file review comments.
pub struct CommentRelay {
    gateway: Arc<dyn GitHubGateway>,
}

impl CommentRelay {
    /// Creates a relay over the given gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn GitHubGateway>) -> Self {
        Self { gateway }
    }

    /// Review comments whose path exactly equals `path`, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamStatus`] when the comment listing
    /// does not succeed.
    pub async fn list(
        &self,
        locator: &PullRequestLocator,
        path: &str,
    ) -> Result<Vec<ReviewComment>, GatewayError> {
        let comments = self.gateway.review_comments(locator).await?;
        Ok(comments
            .into_iter()
            .filter(|comment| comment.path.as_deref() == Some(path))
            .collect())
    }

    /// Comment counts grouped by file path, omitting empty paths.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamStatus`] when the comment listing
    /// does not succeed.
    pub async fn counts(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<BTreeMap<String, u64>, GatewayError> {
        let mut counts = BTreeMap::new();
        for comment in self.gateway.review_comments(locator).await? {
            if let Some(path) = comment.path.as_deref()
                && !path.is_empty()
            {
                *counts.entry(path.to_owned()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Creates a whole-file review comment anchored to the current head.
    ///
    /// The head sha is re-fetched rather than taken from the caller so a
    /// comment is never anchored to a stale commit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the trimmed path or body is
    /// empty (before any upstream call is made), or the gateway error from
    /// the metadata fetch or comment creation.
    pub async fn create(
        &self,
        locator: &PullRequestLocator,
        path: &str,
        body: &str,
    ) -> Result<ReviewComment, GatewayError> {
        let path = path.trim();
        let body = body.trim();
        if path.is_empty() || body.is_empty() {
            return Err(GatewayError::Validation {
                message: "both 'path' and 'body' are required".to_owned(),
            });
        }

        let head = self.gateway.pull_request(locator).await?;
        let draft = CommentDraft::for_file(path, body, head.head_sha);
        self.gateway.create_review_comment(locator, &draft).await
    }
}
