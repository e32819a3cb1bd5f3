//! GitHub upstream boundary: locators, typed payloads, and the gateway.
//!
//! This module wraps the GitHub REST API behind a mockable trait, maps wire
//! payloads into fully typed domain values at the boundary, and converts
//! every failure mode into a [`GatewayError`] variant so callers can surface
//! precise failures without inspecting raw responses.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::GatewayError;
pub use gateway::{CommentDraft, GitHubGateway, HttpGateway};
pub use locator::{
    AccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::{BlobEntry, ComparedFile, ContentEntry, PullRequestHead, ReviewComment};

#[cfg(test)]
pub use gateway::MockGitHubGateway;
