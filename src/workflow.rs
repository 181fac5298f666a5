//! The workflow controller.
//!
//! One linear pass per invocation: resolve the base branch from the trigger,
//! compute or reuse the head branch, reconcile the working tree against it,
//! and publish a pull request when changes remain. Every early exit here is
//! an expected terminal state, not an error.

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::branch::{self, BranchSuffix};
use crate::config::Config;
use crate::event::{Identity, TriggerEvent};
use crate::git::Workspace;
use crate::github::{CardOutcome, CreateOutcome, GitHubClient};
use crate::outputs;

/// Terminal state of a run. Every variant maps to exit code 0; failures
/// surface as errors and exit 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Published {
        pr_number: u64,
        created: bool,
    },
    /// Working tree matched the target branch, nothing to publish.
    NoChanges,
    /// Trigger came from a fork, which lacks write credentials under
    /// hosted CI.
    CrossForkPullRequest {
        head_repo: String,
    },
    UnsupportedRef {
        github_ref: String,
    },
    /// The base itself was created by a prior run of this automation.
    BaseCreatedByAutomation {
        base: String,
    },
    /// A branch for this exact commit has already been published.
    BranchExistsForCommit {
        branch: String,
    },
    DryRun {
        branch: String,
        base: String,
    },
}

/// How the base branch is obtained from the trigger context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseDecision {
    /// Base differs from the current checkout and needs a stash-preserving
    /// switch (explicit override, or a pull request's head branch replacing
    /// the synthetic merge commit).
    Checkout(String),
    /// A branch push: the base is already checked out.
    Current(String),
    CrossFork { head_repo: String },
    Unsupported,
}

/// Resolve the pull request base from the trigger context: explicit
/// override first, then pull-request refs, then branch pushes.
pub fn decide_base(config: &Config, event: &TriggerEvent) -> Result<BaseDecision> {
    if let Some(base) = &config.base_override {
        return Ok(BaseDecision::Checkout(base.clone()));
    }

    if config.github_ref.starts_with("refs/pull/") {
        let head_repo = event.head_repo_full_name().unwrap_or_default().to_string();
        if head_repo != config.github_repository {
            return Ok(BaseDecision::CrossFork { head_repo });
        }
        let base = config
            .head_ref
            .clone()
            .context("GITHUB_HEAD_REF is not set for a pull request trigger")?;
        return Ok(BaseDecision::Checkout(base));
    }

    if let Some(name) = config.github_ref.strip_prefix("refs/heads/") {
        return Ok(BaseDecision::Current(name.to_string()));
    }

    Ok(BaseDecision::Unsupported)
}

/// Run the workflow against an open working tree and an authenticated API
/// client. At most one push and one create-or-reuse pull request call happen
/// per invocation.
pub async fn run(
    config: &Config,
    event: &TriggerEvent,
    workspace: &mut dyn Workspace,
    client: &GitHubClient,
    dry_run: bool,
) -> Result<Outcome> {
    let identity = Identity::resolve(config, event);
    println!(
        "Configuring git author as '{} <{}>'",
        identity.author_name, identity.author_email
    );
    println!(
        "Configuring git committer as '{} <{}>'",
        identity.committer_name, identity.committer_email
    );

    let base = match decide_base(config, event)? {
        BaseDecision::Checkout(base) => {
            if config.base_override.is_some() {
                println!("Overriding the base with branch '{base}'");
            } else {
                println!(
                    "Removing the merge commit by switching to the pull request head branch '{base}'"
                );
            }
            workspace.checkout_with_stash(&base)?;
            base
        }
        BaseDecision::Current(base) => {
            println!("Currently checked out base assumed to be branch '{base}'");
            base
        }
        BaseDecision::CrossFork { head_repo } => {
            outputs::warning(
                "Pull request was raised from a fork of the repository. \
                 Limitations on forked repositories have been imposed by GitHub Actions. \
                 Unable to continue. Exiting.",
            );
            return Ok(Outcome::CrossForkPullRequest { head_repo });
        }
        BaseDecision::Unsupported => {
            outputs::warning(&format!(
                "Currently checked out ref '{}' is not a valid base for a pull request. \
                 Unable to continue. Exiting.",
                config.github_ref
            ));
            return Ok(Outcome::UnsupportedRef {
                github_ref: config.github_ref.clone(),
            });
        }
    };

    // A PAT can re-trigger workflows on the automation's own branches; bail
    // out before that turns into an endless chain of pull requests.
    if branch::created_by_automation(&base, &config.branch_prefix) {
        println!("Branch '{base}' was created by this action. Skipping.");
        return Ok(Outcome::BaseCreatedByAutomation { base });
    }

    let short_sha = workspace.head_short_sha()?;
    let head_branch =
        branch::resolve_branch_name(&config.branch_prefix, config.branch_suffix, &short_sha);
    println!("Pull request branch to create/update set to '{head_branch}'");

    let remote_exists = workspace.remote_branch_exists(&head_branch)?;
    if remote_exists {
        println!(
            "Pull request branch '{head_branch}' already exists as remote branch 'origin/{head_branch}'"
        );
        match config.branch_suffix {
            BranchSuffix::ShortCommitHash => {
                // Deterministic name: the branch for this commit is already
                // published, so the run is an idempotent no-op.
                println!(
                    "Pull request branch '{head_branch}' already exists for this commit. Skipping."
                );
                return Ok(Outcome::BranchExistsForCommit {
                    branch: head_branch,
                });
            }
            BranchSuffix::Timestamp | BranchSuffix::Random => {
                bail!(
                    "pull request branch '{head_branch}' collided with a branch of the same name, \
                     please re-run"
                );
            }
            BranchSuffix::None => {}
        }
    }

    if remote_exists {
        println!("Checking out branch '{head_branch}'");
        workspace.checkout_with_stash(&head_branch)?;
        println!(
            "Checking for local working copy changes indicating a diff with existing \
             pull request branch 'origin/{head_branch}'"
        );
    } else {
        println!("Creating new branch '{head_branch}'");
        workspace.create_branch_from_head(&head_branch)?;
        println!(
            "Checking for local working copy changes indicating a diff with base 'origin/{base}'"
        );
    }

    let changes = workspace.changes()?;
    debug!(dirty = changes.dirty, untracked = changes.untracked_files, "change detection");
    if !changes.has_changes() {
        println!("No modified or untracked files detected. Skipping.");
        return Ok(Outcome::NoChanges);
    }
    println!("Modified or untracked files detected.");

    if dry_run {
        println!(
            "Dry run: would commit and push '{head_branch}', then open a pull request into '{base}'."
        );
        return Ok(Outcome::DryRun {
            branch: head_branch,
            base,
        });
    }

    publish(config, &identity, workspace, client, &head_branch, &base).await
}

/// Commit, force-push, create-or-reuse the pull request and attach metadata.
async fn publish(
    config: &Config,
    identity: &Identity,
    workspace: &mut dyn Workspace,
    client: &GitHubClient,
    head_branch: &str,
    base: &str,
) -> Result<Outcome> {
    workspace.commit_all(identity, &config.commit_message)?;
    println!("Pushing changes to 'origin/{head_branch}'");
    workspace.push_force(head_branch)?;

    let publisher = client.pulls();
    let (pr, created) = match publisher
        .create_or_reuse(
            &config.pull_request_title,
            &config.pull_request_body,
            head_branch,
            base,
        )
        .await?
    {
        CreateOutcome::Created(pr) => {
            println!("Created pull request #{} ({head_branch} => {base})", pr.number);
            (pr, true)
        }
        CreateOutcome::AlreadyExists(pr) => {
            println!("Updated pull request #{} ({head_branch} => {base})", pr.number);
            (pr, false)
        }
    };

    outputs::set_env("PULL_REQUEST_NUMBER", pr.number);
    outputs::set_output("pr_number", pr.number);

    if !config.labels.is_empty() {
        println!("Applying labels '{}'", config.labels.join(", "));
        publisher.apply_labels(pr.number, &config.labels).await?;
    }
    if !config.assignees.is_empty() {
        println!("Applying assignees '{}'", config.assignees.join(", "));
        publisher.apply_assignees(pr.number, &config.assignees).await?;
    }
    if let Some(milestone) = config.milestone {
        println!("Applying milestone '{milestone}'");
        publisher.apply_milestone(pr.number, milestone).await?;
    }

    if !config.reviewers.is_empty() {
        println!("Requesting reviewers '{}'", config.reviewers.join(", "));
        match publisher
            .request_reviewers(pr.number, &config.reviewers, &[])
            .await
        {
            Ok(()) => {}
            // Typically "Review cannot be requested from pull request author."
            Err(err) if err.is_duplicate_association() => {
                outputs::warning(&format!("Requesting reviewers failed - {err}"));
            }
            Err(err) => return Err(err.into()),
        }
    }
    if !config.team_reviewers.is_empty() {
        println!(
            "Requesting team reviewers '{}'",
            config.team_reviewers.join(", ")
        );
        match publisher
            .request_reviewers(pr.number, &[], &config.team_reviewers)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_duplicate_association() => {
                outputs::warning(&format!("Requesting team reviewers failed - {err}"));
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let (Some(project), Some(column)) = (&config.project_name, &config.project_column_name) {
        match client
            .projects()
            .add_pull_request_card(project, column, &pr)
            .await
        {
            Ok(CardOutcome::Added { project, column }) => {
                println!(
                    "Added pull request #{} to project '{project}' under column '{column}'",
                    pr.number
                );
            }
            Ok(CardOutcome::ProjectNotFound) => {
                outputs::warning("Project not found. Unable to create project card.");
            }
            Ok(CardOutcome::ColumnNotFound) => {
                outputs::warning("Project column not found. Unable to create project card.");
            }
            // Typically "Project already has the associated issue."
            Err(err) if err.is_duplicate_association() => {
                outputs::warning(&format!("Create project card failed - {err}"));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Outcome::Published {
        pr_number: pr.number,
        created,
    })
}
