//! Identity wrappers and URL construction for pull request requests.

use url::Url;

use super::error::GatewayError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GatewayError> {
        if value.is_empty() {
            return Err(GatewayError::InvalidCoordinates {
                message: "repository owner must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, GatewayError> {
        if value.is_empty() {
            return Err(GatewayError::InvalidCoordinates {
                message: "repository name must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) fn new(value: u64) -> Result<Self, GatewayError> {
        if value == 0 {
            return Err(GatewayError::InvalidCoordinates {
                message: "pull request number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GatewayError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GatewayError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// One pull request pinned to a repository and an API base URL.
///
/// The API base defaults to `https://api.github.com` but can be overridden
/// through configuration so tests can point the gateway at a local mock
/// server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Builds a locator from raw path parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidCoordinates`] when owner or repository
    /// is empty or the pull request number is zero.
    pub fn from_parts(
        api_base: &Url,
        owner: &str,
        repository: &str,
        number: u64,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            api_base: api_base.clone(),
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    fn endpoint(&self, tail: &str) -> String {
        format!(
            "{base}/repos/{owner}/{repo}/{tail}",
            base = self.api_base.as_str().trim_end_matches('/'),
            owner = self.owner.as_str(),
            repo = self.repository.as_str(),
        )
    }

    pub(crate) fn pull_request_url(&self) -> String {
        self.endpoint(&format!("pulls/{}", self.number.get()))
    }

    pub(crate) fn compare_url(&self, base: &str, head: &str) -> String {
        self.endpoint(&format!("compare/{base}...{head}"))
    }

    pub(crate) fn contents_url(&self, path: &str) -> String {
        self.endpoint(&format!("contents/{path}"))
    }

    pub(crate) fn blob_url(&self, sha: &str) -> String {
        self.endpoint(&format!("git/blobs/{sha}"))
    }

    pub(crate) fn review_comments_url(&self) -> String {
        self.endpoint(&format!("pulls/{}/comments", self.number.get()))
    }
}
