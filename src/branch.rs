//! Head branch name resolution.
//!
//! The suffix strategy decides whether re-runs are idempotent: a
//! `short-commit-hash` suffix yields the same branch for the same HEAD commit,
//! while `timestamp` and `random` generate a fresh name on every run.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;

pub const DEFAULT_BRANCH_PREFIX: &str = "create-pull-request/patch";

const RANDOM_SUFFIX_LEN: usize = 7;
const RANDOM_SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Strategy for generating a unique head branch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSuffix {
    ShortCommitHash,
    Timestamp,
    Random,
    None,
}

impl FromStr for BranchSuffix {
    type Err = UnknownBranchSuffix;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short-commit-hash" => Ok(BranchSuffix::ShortCommitHash),
            "timestamp" => Ok(BranchSuffix::Timestamp),
            "random" => Ok(BranchSuffix::Random),
            "none" => Ok(BranchSuffix::None),
            other => Err(UnknownBranchSuffix(other.to_string())),
        }
    }
}

impl fmt::Display for BranchSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchSuffix::ShortCommitHash => "short-commit-hash",
            BranchSuffix::Timestamp => "timestamp",
            BranchSuffix::Random => "random",
            BranchSuffix::None => "none",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("branch suffix '{0}' is not a valid value (expected short-commit-hash, timestamp, random or none)")]
pub struct UnknownBranchSuffix(pub String);

/// Resolve the head branch name from the configured prefix and suffix strategy.
pub fn resolve_branch_name(prefix: &str, suffix: BranchSuffix, head_short_sha: &str) -> String {
    match suffix {
        BranchSuffix::ShortCommitHash => format!("{prefix}-{head_short_sha}"),
        BranchSuffix::Timestamp => format!("{prefix}-{}", Utc::now().timestamp()),
        BranchSuffix::Random => format!("{prefix}-{}", random_suffix(RANDOM_SUFFIX_LEN)),
        BranchSuffix::None => prefix.to_string(),
    }
}

/// A base branch whose name starts with the configured prefix was created by a
/// prior run of this same automation. Publishing on top of it would chain pull
/// requests indefinitely when a PAT re-triggers workflows.
pub fn created_by_automation(base: &str, prefix: &str) -> bool {
    base.starts_with(prefix)
}

fn random_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| RANDOM_SUFFIX_CHARSET[rng.random_range(0..RANDOM_SUFFIX_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_commit_hash_suffix_is_deterministic() {
        let first = resolve_branch_name(
            "create-pull-request/patch",
            BranchSuffix::ShortCommitHash,
            "a1b2c3d",
        );
        let second = resolve_branch_name(
            "create-pull-request/patch",
            BranchSuffix::ShortCommitHash,
            "a1b2c3d",
        );
        assert_eq!(first, "create-pull-request/patch-a1b2c3d");
        assert_eq!(first, second);
    }

    #[test]
    fn none_suffix_uses_prefix_verbatim() {
        let branch = resolve_branch_name("release/auto", BranchSuffix::None, "a1b2c3d");
        assert_eq!(branch, "release/auto");
    }

    #[test]
    fn timestamp_suffix_appends_unix_seconds() {
        let branch = resolve_branch_name("patch", BranchSuffix::Timestamp, "a1b2c3d");
        let suffix = branch.strip_prefix("patch-").unwrap();
        assert!(suffix.parse::<i64>().is_ok());
    }

    #[test]
    fn random_suffix_is_lowercase_alphanumeric() {
        let suffix = random_suffix(7);
        assert_eq!(suffix.len(), 7);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    }

    #[test]
    fn suffix_strategy_parses_known_values() {
        assert_eq!(
            "short-commit-hash".parse::<BranchSuffix>().unwrap(),
            BranchSuffix::ShortCommitHash
        );
        assert_eq!(
            "timestamp".parse::<BranchSuffix>().unwrap(),
            BranchSuffix::Timestamp
        );
        assert_eq!("random".parse::<BranchSuffix>().unwrap(), BranchSuffix::Random);
        assert_eq!("none".parse::<BranchSuffix>().unwrap(), BranchSuffix::None);
        assert!("weekly".parse::<BranchSuffix>().is_err());
    }

    #[test]
    fn base_matching_prefix_is_flagged_as_automation_branch() {
        assert!(created_by_automation(
            "create-pull-request/patch-a1b2c3d",
            "create-pull-request/patch"
        ));
        assert!(!created_by_automation("main", "create-pull-request/patch"));
    }
}
