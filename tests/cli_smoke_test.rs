//! End-to-end smoke tests for the binary's expected terminal states.
//!
//! These cover the paths that exit before any hosting-API call is made, so no
//! network access is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn init_repo_with_commit(dir: &TempDir) {
    let repo = git2::Repository::init(dir.path()).unwrap();
    let signature = git2::Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )
    .unwrap();
}

fn write_event(dir: &TempDir, payload: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("event.json");
    fs::write(&path, payload.to_string()).unwrap();
    path
}

fn base_command(dir: &TempDir, event_path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("create-pull-request").unwrap();
    cmd.current_dir(dir.path())
        .env_clear()
        .env("GITHUB_TOKEN", "test-token")
        .env("GITHUB_REPOSITORY", "octocat/widgets")
        .env("GITHUB_REF", "refs/heads/main")
        .env("GITHUB_EVENT_NAME", "push")
        .env("GITHUB_EVENT_PATH", event_path)
        .env("GITHUB_ACTOR", "octocat");
    cmd
}

#[test]
fn missing_token_fails_with_configuration_error() {
    let dir = TempDir::new().unwrap();
    let event_path = write_event(&dir, &serde_json::json!({}));
    let mut cmd = base_command(&dir, &event_path);
    cmd.env_remove("GITHUB_TOKEN");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn unrecognized_branch_suffix_fails() {
    let dir = TempDir::new().unwrap();
    let event_path = write_event(&dir, &serde_json::json!({}));
    let mut cmd = base_command(&dir, &event_path);
    cmd.env("BRANCH_SUFFIX", "weekly");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("weekly"));
}

#[test]
fn malformed_env_file_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    let event_path = write_event(&dir, &serde_json::json!({}));
    fs::write(dir.path().join(".env"), "this is not a valid line").unwrap();
    let mut cmd = base_command(&dir, &event_path);
    cmd.assert().failure().code(1);
}

#[test]
fn unsupported_ref_exits_cleanly_with_a_warning() {
    let dir = TempDir::new().unwrap();
    init_repo_with_commit(&dir);
    let event_path = write_event(&dir, &serde_json::json!({}));
    let mut cmd = base_command(&dir, &event_path);
    cmd.env("GITHUB_REF", "refs/tags/v1.0.0");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::warning::"))
        .stdout(predicate::str::contains("refs/tags/v1.0.0"));
}

#[test]
fn cross_fork_pull_request_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    init_repo_with_commit(&dir);
    let event_path = write_event(
        &dir,
        &serde_json::json!({
            "pull_request": {
                "head": { "repo": { "full_name": "fork-owner/widgets" } }
            }
        }),
    );
    let mut cmd = base_command(&dir, &event_path);
    cmd.env("GITHUB_REF", "refs/pull/7/merge")
        .env("GITHUB_EVENT_NAME", "pull_request");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fork of the repository"));
}

#[test]
fn base_created_by_prior_run_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    init_repo_with_commit(&dir);
    let event_path = write_event(&dir, &serde_json::json!({}));
    let mut cmd = base_command(&dir, &event_path);
    cmd.env("GITHUB_REF", "refs/heads/create-pull-request/patch-deadbee");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("was created by this action"));
}

#[test]
fn debug_event_dumps_the_payload() {
    let dir = TempDir::new().unwrap();
    init_repo_with_commit(&dir);
    let event_path = write_event(&dir, &serde_json::json!({ "marker": "dump-me" }));
    let mut cmd = base_command(&dir, &event_path);
    cmd.env("GITHUB_REF", "refs/tags/v1.0.0")
        .env("DEBUG_EVENT", "true");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dump-me"));
}
