//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach: built-in
//! defaults, then a `.visual-review.toml` configuration file, then
//! environment variables (`VISUAL_REVIEW_*`, with `GITHUB_TOKEN` as a
//! legacy fallback for the token), then command-line arguments.
//!
//! A missing token is deliberately not a startup error: the server comes up
//! and every endpoint degrades to a soft "not configured" response.

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::error::GatewayError;
use crate::github::locator::AccessToken;

/// Default upstream API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `VISUAL_REVIEW_TOKEN`, `GITHUB_TOKEN` (legacy), or `--token`:
///   GitHub API token
/// - `VISUAL_REVIEW_BIND_ADDR` or `--bind-addr`: listen address
/// - `VISUAL_REVIEW_API_BASE` or `--api-base`: upstream API base URL
///   (overridden in tests to point at a mock server)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "VISUAL_REVIEW",
    discovery(
        dotfile_name = ".visual-review.toml",
        config_file_name = "visual-review.toml",
        app_name = "visual-review"
    )
)]
pub struct VisualReviewConfig {
    /// GitHub token used for every upstream call.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Address the HTTP server binds to.
    #[ortho_config(cli_short = 'b')]
    pub bind_addr: Option<String>,

    /// Upstream API base URL.
    #[ortho_config()]
    pub api_base: Option<String>,
}

impl VisualReviewConfig {
    /// Resolves the GitHub token from configuration or the legacy
    /// `GITHUB_TOKEN` environment variable; `None` when neither yields a
    /// non-blank value.
    #[must_use]
    pub fn resolve_token(&self) -> Option<AccessToken> {
        self.token
            .as_deref()
            .and_then(|token| AccessToken::new(token).ok())
            .or_else(|| {
                env::var("GITHUB_TOKEN")
                    .ok()
                    .and_then(|token| AccessToken::new(token).ok())
            })
    }

    /// The address to bind, defaulting to [`DEFAULT_BIND_ADDR`].
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// The upstream API base URL, defaulting to [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] when the configured value does
    /// not parse.
    pub fn api_base_url(&self) -> Result<Url, GatewayError> {
        let raw = self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        Url::parse(raw).map_err(|error| GatewayError::InvalidUrl(error.to_string()))
    }
}
