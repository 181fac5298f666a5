use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),
    #[error("GITHUB_REPOSITORY must be in 'owner/repo' form, got '{0}'")]
    InvalidRepository(String),
    #[error("{0}")]
    UnexpectedResponse(String),
}

/// True when the error is the hosting API's duplicate-association conflict
/// (HTTP 422): pull request already exists for the head/base pair, reviewer
/// already requested, card already on the project board, and the like.
pub fn is_duplicate_association(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 422)
}

impl GitHubError {
    /// Downgradeable duplicate-association failures, see
    /// [`is_duplicate_association`].
    pub fn is_duplicate_association(&self) -> bool {
        matches!(self, GitHubError::Api(err) if is_duplicate_association(err))
    }
}
