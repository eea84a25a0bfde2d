//! Policy violations and how the terminal reacts to them.

use crate::money::Money;
use std::time::Duration;
use thiserror::Error;

/// A broken session rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Inserted {amount} exceeds the single-insertion limit of {max}")]
    MaxInsertionExceeded { max: Money, amount: Money },

    #[error("Transaction idle for {}s, limit is {}s", .idle.as_secs(), .timeout.as_secs())]
    IdleTimeoutExceeded { timeout: Duration, idle: Duration },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What to do when a money insertion breaks the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationStrategy {
    /// Refuse the insertion.
    #[default]
    Reject,

    /// Accept the insertion and log a warning.
    WarnOnly,
}
