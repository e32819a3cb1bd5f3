//! Gateway for the GitHub REST API.
//!
//! This module provides a trait-based gateway for communicating with the
//! PR-hosting API. The trait-based design enables mocking in tests while the
//! reqwest-backed implementation handles real HTTP requests with a fixed
//! header set and bounded per-call timeouts.

mod client;
mod error_mapping;

pub use client::HttpGateway;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::github::error::GatewayError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{
    BlobEntry, ComparedFile, ContentEntry, PullRequestHead, ReviewComment,
};

/// A review comment to be created, anchored to a commit and scoped to a
/// whole file rather than a diff line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDraft {
    /// Comment body.
    pub body: String,
    /// Commit sha the comment anchors to; always the current head.
    pub commit_id: String,
    /// Repository-relative file path.
    pub path: String,
    /// Anchoring mode; fixed to `file` for whole-file comments.
    pub subject_type: &'static str,
}

impl CommentDraft {
    /// Builds a whole-file comment draft.
    #[must_use]
    pub fn for_file(path: &str, body: &str, commit_id: String) -> Self {
        Self {
            body: body.to_owned(),
            commit_id,
            path: path.to_owned(),
            subject_type: "file",
        }
    }
}

/// Black-box capability set of the PR-hosting API.
///
/// Authoritative calls (`pull_request`, `compare`, `file_content`, comment
/// list/create) surface non-success statuses as
/// [`GatewayError::UpstreamStatus`]. The two fallback-tier calls (`blob`,
/// `download`) instead soft-return `None` on a non-success status, since a
/// failure there only means the next tier should be tried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Fetch pull request metadata, including base and head commit shas.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestHead, GatewayError>;

    /// Compare two refs and return the changed-file list in upstream order.
    async fn compare(
        &self,
        locator: &PullRequestLocator,
        base: &str,
        head: &str,
    ) -> Result<Vec<ComparedFile>, GatewayError>;

    /// Fetch the contents-API entry for a file at a specific ref.
    async fn file_content(
        &self,
        locator: &PullRequestLocator,
        path: &str,
        git_ref: &str,
    ) -> Result<ContentEntry, GatewayError>;

    /// Fetch a git blob by content id; `None` when upstream does not return
    /// success.
    async fn blob(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Option<BlobEntry>, GatewayError>;

    /// Fetch raw bytes from a download URL, following redirects; `None` when
    /// upstream does not return success.
    async fn download(&self, url: &str) -> Result<Option<Bytes>, GatewayError>;

    /// Fetch up to 100 most recent review comments for the pull request.
    async fn review_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewComment>, GatewayError>;

    /// Create a review comment against a specific commit.
    async fn create_review_comment(
        &self,
        locator: &PullRequestLocator,
        draft: &CommentDraft,
    ) -> Result<ReviewComment, GatewayError>;
}
