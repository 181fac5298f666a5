//! Workflow-runner command lines.
//!
//! The enclosing Actions runner parses stdout for `::`-prefixed commands, so
//! these go through `println!` verbatim rather than the tracing pipeline.

use std::fmt::Display;

pub fn set_output(name: &str, value: impl Display) {
    println!("{}", format_command("set-output", Some(name), &value.to_string()));
}

pub fn set_env(name: &str, value: impl Display) {
    println!("{}", format_command("set-env", Some(name), &value.to_string()));
}

pub fn warning(message: &str) {
    println!("{}", format_command("warning", None, message));
}

fn format_command(command: &str, name: Option<&str>, value: &str) -> String {
    match name {
        Some(name) => format!("::{command} name={name}::{value}"),
        None => format!("::{command}::{value}"),
    }
}
