//! Visual Review, a standalone GitHub PR image diff gateway.
//!
//! The crate resolves a pull request's base/head commits, lists changed PNG
//! files via the compare API, proxies raw image bytes through a three-tier
//! retrieval fallback chain (inline base64, blob by content id, download
//! URL), and relays per-file review comments. The expensive "list changed
//! files" computation is cached keyed on the head commit sha, so repeated
//! requests and force-pushes are both handled correctly.

pub mod cache;
pub mod config;
pub mod github;
pub mod review;
pub mod server;

pub use cache::TtlCache;
pub use config::VisualReviewConfig;
pub use github::{
    AccessToken, GatewayError, GitHubGateway, HttpGateway, PullRequestLocator, ReviewComment,
};
pub use review::{ChangeSet, ChangeSetResolver, ChangedImage, CommentRelay, ImageRetrieval};
pub use server::{AppState, ReviewServices, router};
