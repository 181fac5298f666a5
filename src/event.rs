//! Trigger event payload and commit identity.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::config::Config;

/// The slice of the GitHub Actions event payload this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerEvent {
    #[serde(default)]
    pub head_commit: Option<HeadCommit>,
    #[serde(default)]
    pub pull_request: Option<PullRequestInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestInfo {
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    #[serde(default)]
    pub repo: Option<HeadRepo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRepo {
    pub full_name: String,
}

impl TriggerEvent {
    /// Load the event payload from `GITHUB_EVENT_PATH`. With `debug` set, the
    /// raw payload is dumped to stdout before parsing.
    pub fn load(path: &Path, event_name: &str, debug: bool) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event payload from {}", path.display()))?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("event payload is not valid JSON")?;
        if debug {
            println!("{event_name}");
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        serde_json::from_value(value).context("event payload has an unexpected shape")
    }

    /// `owner/repo` of the pull request's head repository, when the trigger
    /// carries one.
    pub fn head_repo_full_name(&self) -> Option<&str> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.head.repo.as_ref())
            .map(|repo| repo.full_name.as_str())
    }

    fn head_commit_author(&self) -> Option<&CommitAuthor> {
        self.head_commit.as_ref().and_then(|hc| hc.author.as_ref())
    }
}

/// Author and committer identity for the publish commit. Computed once from
/// the trigger event and configuration overrides, then threaded explicitly
/// into the commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
}

impl Identity {
    pub fn resolve(config: &Config, event: &TriggerEvent) -> Self {
        let noreply = format!("{}@users.noreply.github.com", config.actor);

        // Push events carry the head commit author; everything else falls
        // back to the actor that triggered the workflow.
        let (default_name, default_email) = match event.head_commit_author() {
            Some(author) if config.event_name == "push" => (
                author.name.clone().unwrap_or_else(|| config.actor.clone()),
                author.email.clone().unwrap_or_else(|| noreply.clone()),
            ),
            _ => (config.actor.clone(), noreply),
        };

        let author_name = config.author_name.clone().unwrap_or(default_name);
        let author_email = config.author_email.clone().unwrap_or(default_email);
        let committer_name = config.committer_name.clone().unwrap_or_else(|| author_name.clone());
        let committer_email = config
            .committer_email
            .clone()
            .unwrap_or_else(|| author_email.clone());

        Identity {
            author_name,
            author_email,
            committer_name,
            committer_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_for(event_name: &str, overrides: &[(&str, &str)]) -> Config {
        let mut vars = HashMap::from([
            ("GITHUB_TOKEN", "test-token".to_string()),
            ("GITHUB_REPOSITORY", "octocat/widgets".to_string()),
            ("GITHUB_REF", "refs/heads/main".to_string()),
            ("GITHUB_EVENT_NAME", event_name.to_string()),
            ("GITHUB_EVENT_PATH", "/tmp/event.json".to_string()),
            ("GITHUB_ACTOR", "octocat".to_string()),
        ]);
        for (name, value) in overrides {
            vars.insert(*name, value.to_string());
        }
        Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    fn push_event() -> TriggerEvent {
        serde_json::from_value(serde_json::json!({
            "head_commit": {
                "author": { "name": "Mona Lisa", "email": "mona@example.com" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn push_event_takes_identity_from_head_commit() {
        let identity = Identity::resolve(&config_for("push", &[]), &push_event());
        assert_eq!(identity.author_name, "Mona Lisa");
        assert_eq!(identity.author_email, "mona@example.com");
        assert_eq!(identity.committer_name, "Mona Lisa");
        assert_eq!(identity.committer_email, "mona@example.com");
    }

    #[test]
    fn non_push_event_falls_back_to_actor() {
        let identity = Identity::resolve(&config_for("schedule", &[]), &TriggerEvent::default());
        assert_eq!(identity.author_name, "octocat");
        assert_eq!(identity.author_email, "octocat@users.noreply.github.com");
    }

    #[test]
    fn explicit_overrides_win_over_event_identity() {
        let config = config_for(
            "push",
            &[
                ("COMMIT_AUTHOR_NAME", "Release Bot"),
                ("COMMIT_AUTHOR_EMAIL", "bot@example.com"),
                ("COMMITTER_NAME", "CI"),
                ("COMMITTER_EMAIL", "ci@example.com"),
            ],
        );
        let identity = Identity::resolve(&config, &push_event());
        assert_eq!(identity.author_name, "Release Bot");
        assert_eq!(identity.author_email, "bot@example.com");
        assert_eq!(identity.committer_name, "CI");
        assert_eq!(identity.committer_email, "ci@example.com");
    }

    #[test]
    fn committer_defaults_to_author_override() {
        let config = config_for("push", &[("COMMIT_AUTHOR_NAME", "Release Bot")]);
        let identity = Identity::resolve(&config, &push_event());
        assert_eq!(identity.committer_name, "Release Bot");
    }

    #[test]
    fn cross_fork_head_repo_is_exposed() {
        let event: TriggerEvent = serde_json::from_value(serde_json::json!({
            "pull_request": {
                "head": { "repo": { "full_name": "fork-owner/widgets" } }
            }
        }))
        .unwrap();
        assert_eq!(event.head_repo_full_name(), Some("fork-owner/widgets"));
        assert_eq!(TriggerEvent::default().head_repo_full_name(), None);
    }
}
