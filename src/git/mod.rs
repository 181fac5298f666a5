// Git working-tree operations via git2

pub mod operations;

pub use operations::{ChangeSet, Git2Workspace, Workspace};
