// create-pull-request - GitHub Actions pull request automation
// This exposes the core components for testing and integration

pub mod branch;
pub mod config;
pub mod event;
pub mod git;
pub mod github;
pub mod outputs;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use branch::BranchSuffix;
pub use config::Config;
pub use event::{Identity, TriggerEvent};
pub use git::{ChangeSet, Git2Workspace, Workspace};
pub use github::{CreateOutcome, GitHubClient, GitHubError};
pub use telemetry::init_telemetry;
pub use workflow::{BaseDecision, Outcome};
