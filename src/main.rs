use anyhow::Result;
use clap::Parser;

use create_pull_request::config::Config;
use create_pull_request::event::TriggerEvent;
use create_pull_request::git::Git2Workspace;
use create_pull_request::github::GitHubClient;
use create_pull_request::telemetry;
use create_pull_request::workflow::{self, Outcome};

#[derive(Parser)]
#[command(name = "create-pull-request")]
#[command(about = "Create or update a pull request from working-copy changes")]
#[command(
    long_about = "Commits modified and untracked files in the current checkout to an \
                  automation-owned branch, force-pushes it, and creates or updates a pull \
                  request against the base branch derived from the GitHub Actions trigger. \
                  Configuration is read from the standard GITHUB_* and PULL_REQUEST_* \
                  environment variables."
)]
struct Cli {
    /// Resolve the branch plan and detect changes without pushing or calling
    /// the GitHub API
    #[arg(long)]
    dry_run: bool,

    /// Dump the raw trigger event payload, same as setting DEBUG_EVENT
    #[arg(long)]
    debug_event: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::load_env_file()?;
    telemetry::init_telemetry()?;

    let config = Config::from_env()?;
    let event = TriggerEvent::load(
        &config.event_path,
        &config.event_name,
        config.debug_event || cli.debug_event,
    )?;
    let mut workspace = Git2Workspace::open(
        std::env::current_dir()?,
        &config.github_token,
        &config.github_repository,
    )?;
    tokio::runtime::Runtime::new()?.block_on(async {
        // octocrab spawns its connection worker on the current runtime, so
        // the client has to be built inside it.
        let client = GitHubClient::new(&config.github_token, &config.github_repository)?;
        let outcome = workflow::run(&config, &event, &mut workspace, &client, cli.dry_run).await?;
        if let Outcome::Published { pr_number, created } = outcome {
            tracing::info!(pr_number, created, "pull request published");
        }
        Ok(())
    })
}
