use http::header::ACCEPT;
use octocrab::Octocrab;

use super::errors::GitHubError;
use super::projects::ProjectBoard;
use super::pulls::PullRequestPublisher;

// Classic project boards are still behind the inertia preview media type.
const ACCEPT_MEDIA_TYPES: &str =
    "application/vnd.github.v3+json, application/vnd.github.inertia-preview+json";

/// Authenticated client for the repository this run operates on.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(token: &str, repository: &str) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .add_header(ACCEPT, ACCEPT_MEDIA_TYPES.to_string())
            .build()?;
        Self::with_octocrab(octocrab, repository)
    }

    /// Client against an alternate API endpoint. Used by tests to point
    /// octocrab at a mock server.
    pub fn with_base_uri(
        token: &str,
        repository: &str,
        base_uri: &str,
    ) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)?
            .add_header(ACCEPT, ACCEPT_MEDIA_TYPES.to_string())
            .build()?;
        Self::with_octocrab(octocrab, repository)
    }

    fn with_octocrab(octocrab: Octocrab, repository: &str) -> Result<Self, GitHubError> {
        let (owner, repo) = repository
            .split_once('/')
            .ok_or_else(|| GitHubError::InvalidRepository(repository.to_string()))?;
        Ok(Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn pulls(&self) -> PullRequestPublisher {
        PullRequestPublisher::new(self.octocrab.clone(), self.owner.clone(), self.repo.clone())
    }

    pub fn projects(&self) -> ProjectBoard {
        ProjectBoard::new(self.octocrab.clone(), self.owner.clone(), self.repo.clone())
    }
}
