//! HTTP surface: state composition and routing.
//!
//! The composition root lives here: the gateway, cache, and the three
//! review services are constructed once and shared by every request. When
//! no token is configured the state carries no services and every handler
//! soft-fails without issuing upstream calls.

mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::warn;
use url::Url;

use crate::cache::TtlCache;
use crate::config::VisualReviewConfig;
use crate::github::error::GatewayError;
use crate::github::gateway::{GitHubGateway, HttpGateway};
use crate::github::locator::PullRequestLocator;
use crate::review::{ChangeSetResolver, CommentRelay, ImageRetrieval};

/// The services behind the API endpoints, sharing one gateway.
pub struct ReviewServices {
    api_base: Url,
    /// Change-set resolution with its injected cache.
    pub resolver: ChangeSetResolver,
    /// Image retrieval pipeline.
    pub images: ImageRetrieval,
    /// Review comment relay.
    pub comments: CommentRelay,
}

impl ReviewServices {
    /// Wires the three review services over a shared gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn GitHubGateway>, api_base: Url) -> Self {
        let cache = Arc::new(TtlCache::new());
        Self {
            api_base,
            resolver: ChangeSetResolver::new(Arc::clone(&gateway), cache),
            images: ImageRetrieval::new(Arc::clone(&gateway)),
            comments: CommentRelay::new(gateway),
        }
    }

    /// Builds a locator for the request's path parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidCoordinates`] for empty segments or a
    /// zero pull request number.
    pub fn locator(
        &self,
        owner: &str,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestLocator, GatewayError> {
        PullRequestLocator::from_parts(&self.api_base, owner, repository, number)
    }
}

/// Shared request state; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    services: Option<Arc<ReviewServices>>,
}

impl AppState {
    /// Builds the state from configuration.
    ///
    /// A missing token yields a state with no services (soft-fail mode)
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] for a malformed API base or
    /// [`GatewayError::Network`] when the HTTP client cannot be built.
    pub fn from_config(config: &VisualReviewConfig) -> Result<Self, GatewayError> {
        let Some(token) = config.resolve_token() else {
            warn!("no GitHub token configured; all endpoints will soft-fail");
            return Ok(Self { services: None });
        };

        let api_base = config.api_base_url()?;
        let gateway: Arc<dyn GitHubGateway> = Arc::new(HttpGateway::new(token)?);
        Ok(Self {
            services: Some(Arc::new(ReviewServices::new(gateway, api_base))),
        })
    }

    /// State with explicit services; used by tests to inject mocks.
    #[must_use]
    pub fn with_services(services: Option<ReviewServices>) -> Self {
        Self {
            services: services.map(Arc::new),
        }
    }

    pub(crate) fn services(&self) -> Option<&ReviewServices> {
        self.services.as_deref()
    }
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::landing))
        .route("/{owner}/{repo}/pr/{number}", get(handlers::review_page))
        .route(
            "/api/{owner}/{repo}/pr/{number}/images",
            get(handlers::pr_images),
        )
        .route(
            "/api/{owner}/{repo}/pr/{number}/image",
            get(handlers::pr_image),
        )
        .route(
            "/api/{owner}/{repo}/pr/{number}/comments",
            get(handlers::pr_comments).post(handlers::post_pr_comment),
        )
        .route(
            "/api/{owner}/{repo}/pr/{number}/comment-counts",
            get(handlers::pr_comment_counts),
        )
        .with_state(state)
}
