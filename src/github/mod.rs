// GitHub hosting-API integration via octocrab

pub mod client;
pub mod errors;
pub mod projects;
pub mod pulls;

pub use client::GitHubClient;
pub use errors::{is_duplicate_association, GitHubError};
pub use projects::{CardOutcome, ProjectBoard};
pub use pulls::{CreateOutcome, PullRequestPublisher};
