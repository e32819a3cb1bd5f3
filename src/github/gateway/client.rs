//! Reqwest-backed implementation of the GitHub gateway.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header;
use tracing::debug;

use crate::github::error::GatewayError;
use crate::github::locator::{AccessToken, PullRequestLocator};
use crate::github::models::{
    ApiCompare, ApiPullRequest, ApiReviewComment, BlobEntry, ComparedFile, ContentEntry,
    PullRequestHead, ReviewComment,
};

use super::error_mapping::{map_decode_error, map_status_error, map_transport_error};
use super::{CommentDraft, GitHubGateway};

/// Timeout for metadata, compare, and comment-class calls.
const METADATA_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for content-fetch-class calls (inline content, blobs, downloads).
const CONTENT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("visual-review/", env!("CARGO_PKG_VERSION"));

/// GitHub gateway speaking the REST v3 API over reqwest.
///
/// Every API request carries the same token and versioned accept header.
/// Status codes are interpreted by the individual operations, not here.
pub struct HttpGateway {
    http: reqwest::Client,
    token: AccessToken,
}

impl HttpGateway {
    /// Creates a gateway for the given token.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Network`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(token: AccessToken) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| GatewayError::Network {
                message: format!("build client failed: {error}"),
            })?;
        Ok(Self { http, token })
    }

    fn api_get(&self, url: &str, timeout: Duration) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token.value()))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .timeout(timeout)
    }

    fn api_post(&self, url: &str, timeout: Duration) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token.value()))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .timeout(timeout)
    }
}

/// Sends a request and splits the outcome into status plus body text for
/// non-success responses, leaving success bodies to be deserialised by the
/// caller.
async fn send_expecting_success(
    request: reqwest::RequestBuilder,
    operation: &'static str,
) -> Result<reqwest::Response, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|error| map_transport_error(operation, &error))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_status_error(operation, status, &body))
}

#[async_trait]
impl GitHubGateway for HttpGateway {
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestHead, GatewayError> {
        let request = self.api_get(&locator.pull_request_url(), METADATA_TIMEOUT);
        let response = send_expecting_success(request, "pull request").await?;
        response
            .json::<ApiPullRequest>()
            .await
            .map(PullRequestHead::from)
            .map_err(|error| map_decode_error("pull request", &error))
    }

    async fn compare(
        &self,
        locator: &PullRequestLocator,
        base: &str,
        head: &str,
    ) -> Result<Vec<ComparedFile>, GatewayError> {
        let request = self.api_get(&locator.compare_url(base, head), METADATA_TIMEOUT);
        let response = send_expecting_success(request, "compare").await?;
        response
            .json::<ApiCompare>()
            .await
            .map(Vec::<ComparedFile>::from)
            .map_err(|error| map_decode_error("compare", &error))
    }

    async fn file_content(
        &self,
        locator: &PullRequestLocator,
        path: &str,
        git_ref: &str,
    ) -> Result<ContentEntry, GatewayError> {
        let request = self
            .api_get(&locator.contents_url(path), CONTENT_TIMEOUT)
            .query(&[("ref", git_ref)]);
        let response = send_expecting_success(request, "file content").await?;
        response
            .json::<ContentEntry>()
            .await
            .map_err(|error| map_decode_error("file content", &error))
    }

    async fn blob(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Option<BlobEntry>, GatewayError> {
        let response = self
            .api_get(&locator.blob_url(sha), CONTENT_TIMEOUT)
            .send()
            .await
            .map_err(|error| map_transport_error("blob", &error))?;

        let status = response.status();
        if !status.is_success() {
            debug!(sha, status = status.as_u16(), "blob fetch did not succeed");
            return Ok(None);
        }

        response
            .json::<BlobEntry>()
            .await
            .map(Some)
            .map_err(|error| map_decode_error("blob", &error))
    }

    async fn download(&self, url: &str) -> Result<Option<Bytes>, GatewayError> {
        // Download URLs are often pre-signed; forwarding the API auth
        // headers to them breaks the signature, so this is a bare GET.
        let response = self
            .http
            .get(url)
            .timeout(CONTENT_TIMEOUT)
            .send()
            .await
            .map_err(|error| map_transport_error("download", &error))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "download fetch did not succeed");
            return Ok(None);
        }

        response
            .bytes()
            .await
            .map(Some)
            .map_err(|error| map_transport_error("download", &error))
    }

    async fn review_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewComment>, GatewayError> {
        let request = self
            .api_get(&locator.review_comments_url(), METADATA_TIMEOUT)
            .query(&[("per_page", "100")]);
        let response = send_expecting_success(request, "review comments").await?;
        response
            .json::<Vec<ApiReviewComment>>()
            .await
            .map(|comments| comments.into_iter().map(ReviewComment::from).collect())
            .map_err(|error| map_decode_error("review comments", &error))
    }

    async fn create_review_comment(
        &self,
        locator: &PullRequestLocator,
        draft: &CommentDraft,
    ) -> Result<ReviewComment, GatewayError> {
        let request = self
            .api_post(&locator.review_comments_url(), METADATA_TIMEOUT)
            .json(draft);
        let response = send_expecting_success(request, "create review comment").await?;
        response
            .json::<ApiReviewComment>()
            .await
            .map(ReviewComment::from)
            .map_err(|error| map_decode_error("create review comment", &error))
    }
}
