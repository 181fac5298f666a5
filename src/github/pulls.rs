use octocrab::models::pulls::PullRequest;
use octocrab::Octocrab;
use serde_json::json;
use tracing::debug;

use super::errors::{is_duplicate_association, GitHubError};

/// Handler for pull request creation and metadata attachment.
#[derive(Debug, Clone)]
pub struct PullRequestPublisher {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

/// Outcome of the create-or-reuse step, keeping the branching logic out of
/// the API client's error-response shape.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(PullRequest),
    /// A pull request already existed for this head/base pair and is reused.
    AlreadyExists(PullRequest),
}

impl PullRequestPublisher {
    pub fn new(octocrab: Octocrab, owner: String, repo: String) -> Self {
        Self {
            octocrab,
            owner,
            repo,
        }
    }

    /// Create a pull request, or reuse the existing open one when the API
    /// reports a duplicate for the same head/base pair.
    pub async fn create_or_reuse(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<CreateOutcome, GitHubError> {
        let result = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await;

        match result {
            Ok(pr) => Ok(CreateOutcome::Created(pr)),
            Err(err) if is_duplicate_association(&err) => {
                debug!(head, base, "pull request already exists, looking it up");
                let existing = self.find_open(head, base).await?;
                Ok(CreateOutcome::AlreadyExists(existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_open(&self, head: &str, base: &str) -> Result<PullRequest, GitHubError> {
        let head_filter = format!("{}:{}", self.owner, head);
        let page = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .list()
            .state(octocrab::params::State::Open)
            .head(head_filter)
            .base(base.to_string())
            .send()
            .await?;
        page.items.into_iter().next().ok_or_else(|| {
            GitHubError::UnexpectedResponse(format!(
                "no open pull request found for '{head}' into '{base}' after a duplicate conflict"
            ))
        })
    }

    pub async fn apply_labels(&self, number: u64, labels: &[String]) -> Result<(), GitHubError> {
        self.octocrab
            .issues(&self.owner, &self.repo)
            .update(number)
            .labels(&labels.to_vec())
            .send()
            .await?;
        Ok(())
    }

    pub async fn apply_assignees(
        &self,
        number: u64,
        assignees: &[String],
    ) -> Result<(), GitHubError> {
        self.octocrab
            .issues(&self.owner, &self.repo)
            .update(number)
            .assignees(&assignees.to_vec())
            .send()
            .await?;
        Ok(())
    }

    pub async fn apply_milestone(&self, number: u64, milestone: u64) -> Result<(), GitHubError> {
        self.octocrab
            .issues(&self.owner, &self.repo)
            .update(number)
            .milestone(milestone)
            .send()
            .await?;
        Ok(())
    }

    /// Request reviewers and/or team reviewers. octocrab has no typed builder
    /// for this endpoint, so it goes through the generic route.
    pub async fn request_reviewers(
        &self,
        number: u64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> Result<(), GitHubError> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            self.owner, self.repo, number
        );
        let payload = json!({
            "reviewers": reviewers,
            "team_reviewers": team_reviewers,
        });
        let _: serde_json::Value = self.octocrab.post(route, Some(&payload)).await?;
        Ok(())
    }
}
