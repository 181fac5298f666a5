//! Classic project-board cards for published pull requests.

use octocrab::models::pulls::PullRequest;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::errors::GitHubError;

#[derive(Debug, Clone)]
pub struct ProjectBoard {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

/// Result of attempting to place a pull request on a project board. Missing
/// projects and columns are reported back rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Added { project: String, column: String },
    ProjectNotFound,
    ColumnNotFound,
}

#[derive(Debug, Deserialize)]
struct Project {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectColumn {
    id: u64,
    name: String,
}

impl ProjectBoard {
    pub fn new(octocrab: Octocrab, owner: String, repo: String) -> Self {
        Self {
            octocrab,
            owner,
            repo,
        }
    }

    /// Locate the named project and column, then create a card for the pull
    /// request under that column.
    pub async fn add_pull_request_card(
        &self,
        project_name: &str,
        column_name: &str,
        pull_request: &PullRequest,
    ) -> Result<CardOutcome, GitHubError> {
        // Without the state filter the API only lists open projects.
        let projects: Vec<Project> = self
            .octocrab
            .get(
                format!("/repos/{}/{}/projects?state=all", self.owner, self.repo),
                None::<&()>,
            )
            .await?;
        let Some(project) = projects.into_iter().find(|p| p.name == project_name) else {
            return Ok(CardOutcome::ProjectNotFound);
        };

        let columns: Vec<ProjectColumn> = self
            .octocrab
            .get(format!("/projects/{}/columns", project.id), None::<&()>)
            .await?;
        let Some(column) = columns.into_iter().find(|c| c.name == column_name) else {
            return Ok(CardOutcome::ColumnNotFound);
        };

        debug!(
            project = %project.name,
            column = %column.name,
            pull_request = pull_request.number,
            "creating project card"
        );
        let payload = json!({
            "content_id": pull_request.id.0,
            "content_type": "PullRequest",
        });
        let _: serde_json::Value = self
            .octocrab
            .post(format!("/projects/columns/{}/cards", column.id), Some(&payload))
            .await?;

        Ok(CardOutcome::Added {
            project: project.name,
            column: column.name,
        })
    }
}
