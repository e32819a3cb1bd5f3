//! Data models for GitHub API payloads crossing the gateway boundary.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types. Required versus optional fields are
//! resolved here, once, so the rest of the crate works with fully typed
//! values (missing compare `status` defaults to "modified", missing
//! line counts to zero).

use serde::{Deserialize, Serialize};

/// Base and head commit identities for a pull request, plus the display
/// metadata the review frontend shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHead {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Base commit sha.
    pub base_sha: String,
    /// Head commit sha. Changes on every push, including force-pushes.
    pub head_sha: String,
    /// Base branch label (e.g. `octo:main`).
    pub base_label: Option<String>,
    /// Head branch label.
    pub head_label: Option<String>,
}

/// One file reported by the compare API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedFile {
    /// Repository-relative file path.
    pub path: String,
    /// Change status (added, modified, removed, renamed).
    pub status: String,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

/// Contents-API entry for a file at a specific ref.
///
/// All fields are optional on the wire: above GitHub's inline-content size
/// ceiling the `content`/`encoding` pair is silently omitted, which is what
/// forces the blob and download-URL retrieval tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    /// Content encoding marker; `base64` when inline content is present.
    pub encoding: Option<String>,
    /// Base64-encoded file content, when below the size ceiling.
    pub content: Option<String>,
    /// Content-addressed blob id for this file.
    pub sha: Option<String>,
    /// Direct download URL served via redirects.
    pub download_url: Option<String>,
    /// File size in bytes, when reported.
    pub size: Option<u64>,
}

/// Git blob fetched by content id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlobEntry {
    /// Content encoding marker; `base64` when inline content is present.
    pub encoding: Option<String>,
    /// Base64-encoded blob content.
    pub content: Option<String>,
}

/// Pull request review comment relayed to the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    /// Comment identifier, assigned upstream.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub user: Option<String>,
    /// File path the comment is attached to.
    pub path: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) base: ApiBranchTip,
    pub(super) head: ApiBranchTip,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranchTip {
    pub(super) sha: String,
    pub(super) label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiCompare {
    #[serde(default)]
    pub(super) files: Vec<ApiComparedFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComparedFile {
    pub(super) filename: String,
    pub(super) status: Option<String>,
    pub(super) additions: Option<u64>,
    pub(super) deletions: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReviewComment {
    pub(super) id: u64,
    pub(super) body: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) path: Option<String>,
    pub(super) created_at: Option<String>,
    pub(super) updated_at: Option<String>,
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

impl From<ApiPullRequest> for PullRequestHead {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            html_url: value.html_url,
            base_sha: value.base.sha,
            head_sha: value.head.sha,
            base_label: value.base.label,
            head_label: value.head.label,
        }
    }
}

impl From<ApiComparedFile> for ComparedFile {
    fn from(value: ApiComparedFile) -> Self {
        Self {
            path: value.filename,
            status: value.status.unwrap_or_else(|| "modified".to_owned()),
            additions: value.additions.unwrap_or(0),
            deletions: value.deletions.unwrap_or(0),
        }
    }
}

impl From<ApiCompare> for Vec<ComparedFile> {
    fn from(value: ApiCompare) -> Self {
        value.files.into_iter().map(ComparedFile::from).collect()
    }
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(value: ApiReviewComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            user: value.user.and_then(|user| user.login),
            path: value.path,
            created_at: value.created_at,
            updated_at: value.updated_at,
            html_url: value.html_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{
        ApiCompare, ApiPullRequest, ApiReviewComment, ComparedFile, ContentEntry,
        PullRequestHead, ReviewComment,
    };

    #[test]
    fn api_pull_request_converts_into_head_with_both_shas() {
        let value = json!({
            "number": 42,
            "title": "Refresh baseline screenshots",
            "html_url": "https://github.com/octo/shots/pull/42",
            "base": { "sha": "aaa", "label": "octo:main" },
            "head": { "sha": "bbb", "label": "octo:feature" }
        });

        let api: ApiPullRequest =
            serde_json::from_value(value).expect("ApiPullRequest should deserialise");
        let head: PullRequestHead = api.into();

        assert_eq!(head.number, 42);
        assert_eq!(head.base_sha, "aaa");
        assert_eq!(head.head_sha, "bbb");
        assert_eq!(head.base_label.as_deref(), Some("octo:main"));
        assert_eq!(head.head_label.as_deref(), Some("octo:feature"));
    }

    #[rstest]
    #[case::status_present(json!({"filename": "a.png", "status": "added", "additions": 3, "deletions": 1}), "added", 3, 1)]
    #[case::status_absent(json!({"filename": "a.png"}), "modified", 0, 0)]
    fn compared_file_defaults_missing_fields(
        #[case] value: serde_json::Value,
        #[case] status: &str,
        #[case] additions: u64,
        #[case] deletions: u64,
    ) {
        let files: Vec<ComparedFile> = serde_json::from_value::<ApiCompare>(json!({
            "files": [value]
        }))
        .expect("ApiCompare should deserialise")
        .into();

        let file = files.first().expect("one file expected");
        assert_eq!(file.path, "a.png");
        assert_eq!(file.status, status);
        assert_eq!(file.additions, additions);
        assert_eq!(file.deletions, deletions);
    }

    #[test]
    fn api_compare_defaults_to_empty_file_list() {
        let files: Vec<ComparedFile> = serde_json::from_value::<ApiCompare>(json!({}))
            .expect("ApiCompare should deserialise without files")
            .into();
        assert!(files.is_empty());
    }

    #[test]
    fn content_entry_deserialises_with_every_field_absent() {
        let entry: ContentEntry =
            serde_json::from_value(json!({})).expect("ContentEntry should deserialise");
        assert_eq!(entry, ContentEntry::default());
    }

    #[test]
    fn api_review_comment_flattens_user_login() {
        let value = json!({
            "id": 456,
            "body": "The shadow looks off.",
            "user": { "login": "reviewer" },
            "path": "img/a.png",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z",
            "html_url": "https://github.com/octo/shots/pull/42#discussion_r456"
        });

        let api: ApiReviewComment =
            serde_json::from_value(value).expect("ApiReviewComment should deserialise");
        let comment: ReviewComment = api.into();

        assert_eq!(comment.id, 456);
        assert_eq!(comment.user.as_deref(), Some("reviewer"));
        assert_eq!(comment.path.as_deref(), Some("img/a.png"));
    }

    #[test]
    fn api_review_comment_tolerates_missing_optional_fields() {
        let comment: ReviewComment = serde_json::from_value::<ApiReviewComment>(json!({
            "id": 789
        }))
        .expect("should deserialise with missing fields")
        .into();

        assert_eq!(comment.id, 789);
        assert!(comment.body.is_none());
        assert!(comment.user.is_none());
        assert!(comment.path.is_none());
    }
}
