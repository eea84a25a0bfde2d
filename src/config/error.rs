//! Configuration loading and validation errors.

use crate::catalog::TicketClass;
use crate::money::Money;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", join_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

impl ConfigError {
    /// Validation problems, empty for load failures.
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            Self::Invalid(issues) => issues,
            Self::Load(_) => &[],
        }
    }
}

/// One problem found while validating a [`TerminalConfig`](super::TerminalConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("price for {class} must be positive, got {price}")]
    NonPositivePrice { class: TicketClass, price: Money },

    #[error("no ticket prices configured")]
    NoPrices,

    #[error("at least one destination is required")]
    NoDestinations,

    #[error("destination #{index} is blank")]
    BlankDestination { index: usize },

    #[error("destination '{name}' is listed twice")]
    DuplicateDestination { name: String },

    #[error("initial change pool cannot be negative, got {amount}")]
    NegativeChange { amount: Money },

    #[error("ticket validity must be at least one minute")]
    ZeroValidity,

    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,

    #[error("max insertion must be positive, got {amount}")]
    NonPositiveMaxInsertion { amount: Money },

    #[error("idle timeout must be at least one second")]
    ZeroIdleTimeout,
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
