//! Errors raised while assembling a terminal.

use crate::config::ConfigIssue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Terminal settings are invalid: {}", describe(.0))]
    InvalidSettings(Vec<ConfigIssue>),
}

impl BuildError {
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            Self::InvalidSettings(issues) => issues,
        }
    }
}

fn describe(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
