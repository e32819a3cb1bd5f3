//! Request handlers for the review API.
//!
//! JSON endpoints answer HTTP 200 with an `error` field on failure so the
//! frontend's JSON-parsing path stays uniform; the binary image endpoint
//! mirrors real upstream status codes instead, since raw bytes leave no
//! room for an error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use crate::github::error::GatewayError;
use crate::review::IMAGE_CONTENT_TYPE;

use super::AppState;

const NO_TOKEN_MESSAGE: &str = "No GitHub token configured";

/// Image bytes are safe to cache: the ref is a commit id, so content at a
/// given ref is immutable.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Debug, Deserialize)]
pub(super) struct ImageQuery {
    path: String,
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommentQuery {
    path: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CommentPayload {
    #[serde(default)]
    path: String,
    #[serde(default)]
    body: String,
}

/// GET /health
pub(super) async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// GET /
pub(super) async fn landing() -> Json<Value> {
    Json(json!({
        "app": "Visual Review",
        "usage": "Navigate to /{owner}/{repo}/pr/{number} to review a PR's visual changes.",
    }))
}

/// GET /{owner}/{repo}/pr/{number}, the SPA shell; identical for every
/// pull request.
pub(super) async fn review_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// GET /api/{owner}/{repo}/pr/{number}/images
pub(super) async fn pr_images(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
) -> Response {
    let Some(services) = state.services() else {
        return images_error(NO_TOKEN_MESSAGE);
    };
    let locator = match services.locator(&owner, &repo, number) {
        Ok(locator) => locator,
        Err(error) => return images_error(&error.to_string()),
    };

    match services.resolver.resolve(&locator).await {
        Ok(change_set) => no_store(Json(change_set)),
        Err(error) => images_error(&error.to_string()),
    }
}

/// GET /api/{owner}/{repo}/pr/{number}/image?path=&ref=
pub(super) async fn pr_image(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
    Query(query): Query<ImageQuery>,
) -> Response {
    let Some(services) = state.services() else {
        error!("image proxy called with no GitHub token configured");
        return (StatusCode::INTERNAL_SERVER_ERROR, NO_TOKEN_MESSAGE).into_response();
    };
    let locator = match services.locator(&owner, &repo, number) {
        Ok(locator) => locator,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };

    match services
        .images
        .fetch(&locator, &query.path, &query.git_ref)
        .await
    {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, IMAGE_CONTENT_TYPE),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => image_error_response(&error),
    }
}

/// GET /api/{owner}/{repo}/pr/{number}/comments?path=
pub(super) async fn pr_comments(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
    Query(query): Query<CommentQuery>,
) -> Response {
    let Some(services) = state.services() else {
        return comments_error(NO_TOKEN_MESSAGE);
    };
    let locator = match services.locator(&owner, &repo, number) {
        Ok(locator) => locator,
        Err(error) => return comments_error(&error.to_string()),
    };

    match services.comments.list(&locator, &query.path).await {
        Ok(comments) => Json(json!({"comments": comments})).into_response(),
        Err(error) => comments_error(&error.to_string()),
    }
}

/// GET /api/{owner}/{repo}/pr/{number}/comment-counts
pub(super) async fn pr_comment_counts(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
) -> Response {
    let empty = || Json(json!({"counts": {}})).into_response();

    let Some(services) = state.services() else {
        return empty();
    };
    let Ok(locator) = services.locator(&owner, &repo, number) else {
        return empty();
    };

    match services.comments.counts(&locator).await {
        Ok(counts) => Json(json!({"counts": counts})).into_response(),
        Err(_) => empty(),
    }
}

/// POST /api/{owner}/{repo}/pr/{number}/comments with `{path, body}`
pub(super) async fn post_pr_comment(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Response {
    let Some(services) = state.services() else {
        return error_envelope(NO_TOKEN_MESSAGE);
    };
    let Ok(Json(payload)) = payload else {
        return error_envelope("Invalid JSON body");
    };
    let locator = match services.locator(&owner, &repo, number) {
        Ok(locator) => locator,
        Err(error) => return error_envelope(&error.to_string()),
    };

    match services
        .comments
        .create(&locator, &payload.path, &payload.body)
        .await
    {
        Ok(comment) => Json(json!({"ok": true, "comment": comment})).into_response(),
        Err(error) => error_envelope(&error.to_string()),
    }
}

/// The change-set response is never transport-cacheable; freshness lives in
/// the server-side TTL cache.
fn no_store(body: impl IntoResponse) -> Response {
    ([(header::CACHE_CONTROL, "no-store")], body).into_response()
}

fn images_error(message: &str) -> Response {
    no_store(Json(json!({"error": message, "images": []})))
}

fn comments_error(message: &str) -> Response {
    Json(json!({"error": message, "comments": []})).into_response()
}

fn error_envelope(message: &str) -> Response {
    Json(json!({"error": message})).into_response()
}

fn image_error_response(error: &GatewayError) -> Response {
    match error {
        GatewayError::NotRetrievable => {
            (StatusCode::NOT_FOUND, "Could not retrieve image").into_response()
        }
        GatewayError::UpstreamStatus { status, .. } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, format!("GitHub API error: HTTP {status}")).into_response()
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
    }
}
