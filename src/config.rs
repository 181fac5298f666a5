use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::branch::{BranchSuffix, DEFAULT_BRANCH_PREFIX};

const DEFAULT_COMMIT_MESSAGE: &str = "Auto-committed changes by create-pull-request action";
const DEFAULT_PULL_REQUEST_TITLE: &str = "Auto-generated by create-pull-request action";
const DEFAULT_PULL_REQUEST_BODY: &str = "Auto-generated pull request by \
    [create-pull-request](https://github.com/peter-evans/create-pull-request) GitHub Action";

/// Run configuration, read once from the GitHub Actions environment and
/// immutable afterwards. Validation happens here so the workflow itself never
/// has to re-check option values.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    /// `owner/repo` identity of the current repository.
    pub github_repository: String,
    pub github_ref: String,
    pub event_name: String,
    pub event_path: PathBuf,
    /// Fallback identity when the event payload carries no author info.
    pub actor: String,
    /// Head branch name for pull-request-triggered runs.
    pub head_ref: Option<String>,
    pub commit_message: String,
    pub pull_request_title: String,
    pub pull_request_body: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub branch_prefix: String,
    pub base_override: Option<String>,
    pub branch_suffix: BranchSuffix,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub milestone: Option<u64>,
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
    pub project_name: Option<String>,
    pub project_column_name: Option<String>,
    /// Dump the raw trigger payload to stdout.
    pub debug_event: bool,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an explicit variable lookup. Fails fast on
    /// missing required variables and unrecognized option values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("required environment variable {name} is not set"))
        };
        let optional = |name: &str| -> Option<String> { lookup(name).filter(|v| !v.is_empty()) };
        let list = |name: &str| -> Vec<String> {
            optional(name).map(|v| split_list(&v)).unwrap_or_default()
        };

        let github_repository = required("GITHUB_REPOSITORY")?;
        if github_repository.split('/').count() != 2 {
            anyhow::bail!("GITHUB_REPOSITORY must be in 'owner/repo' form, got '{github_repository}'");
        }

        let branch_suffix = optional("BRANCH_SUFFIX")
            .unwrap_or_else(|| "short-commit-hash".to_string())
            .parse::<BranchSuffix>()?;

        let milestone = optional("PULL_REQUEST_MILESTONE")
            .map(|v| {
                v.parse::<u64>()
                    .with_context(|| format!("PULL_REQUEST_MILESTONE must be a milestone number, got '{v}'"))
            })
            .transpose()?;

        Ok(Config {
            github_token: required("GITHUB_TOKEN")?,
            github_repository,
            github_ref: required("GITHUB_REF")?,
            event_name: required("GITHUB_EVENT_NAME")?,
            event_path: PathBuf::from(required("GITHUB_EVENT_PATH")?),
            actor: required("GITHUB_ACTOR")?,
            head_ref: optional("GITHUB_HEAD_REF"),
            commit_message: optional("COMMIT_MESSAGE")
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            pull_request_title: optional("PULL_REQUEST_TITLE")
                .unwrap_or_else(|| DEFAULT_PULL_REQUEST_TITLE.to_string()),
            pull_request_body: optional("PULL_REQUEST_BODY")
                .unwrap_or_else(|| DEFAULT_PULL_REQUEST_BODY.to_string()),
            author_name: optional("COMMIT_AUTHOR_NAME"),
            author_email: optional("COMMIT_AUTHOR_EMAIL"),
            committer_name: optional("COMMITTER_NAME"),
            committer_email: optional("COMMITTER_EMAIL"),
            branch_prefix: optional("PULL_REQUEST_BRANCH")
                .unwrap_or_else(|| DEFAULT_BRANCH_PREFIX.to_string()),
            base_override: optional("PULL_REQUEST_BASE"),
            branch_suffix,
            labels: list("PULL_REQUEST_LABELS"),
            assignees: list("PULL_REQUEST_ASSIGNEES"),
            milestone,
            reviewers: list("PULL_REQUEST_REVIEWERS"),
            team_reviewers: list("PULL_REQUEST_TEAM_REVIEWERS"),
            project_name: optional("PROJECT_NAME"),
            project_column_name: optional("PROJECT_COLUMN_NAME"),
            debug_event: optional("DEBUG_EVENT").is_some(),
        })
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Split a comma separated string into trimmed entries, dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
