//! Fluent construction of a [`SessionPolicy`].

use crate::money::Money;
use crate::policy::context::InsertionContext;
use crate::policy::rules::{InsertionCheck, SessionPolicy};
use crate::policy::violations::{PolicyViolation, ViolationStrategy};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for session policies.
#[derive(Default)]
pub struct PolicyBuilder {
    max_insertion: Option<Money>,
    idle_timeout: Option<Duration>,
    required_checks: Vec<InsertionCheck>,
    on_violation: ViolationStrategy,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest amount accepted in one insertion.
    pub fn max_insertion(mut self, max: Money) -> Self {
        self.max_insertion = Some(max);
        self
    }

    /// How long a sale may sit without progress before it is expired.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Run `check` on every insertion. A check may report several
    /// violations at once; they are accumulated with the built-in limits.
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&InsertionContext) -> Validation<(), NonEmptyVec<PolicyViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Refuse insertions for which `accepts` is false, reporting `message`.
    pub fn require_pred<F>(self, accepts: F, message: String) -> Self
    where
        F: Fn(&InsertionContext) -> bool + Send + Sync + 'static,
    {
        self.require(move |ctx: &InsertionContext| {
            if accepts(ctx) {
                Validation::success(())
            } else {
                Validation::fail(PolicyViolation::CustomCheckFailed {
                    message: message.clone(),
                })
            }
        })
    }

    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    pub fn build(self) -> SessionPolicy {
        SessionPolicy {
            max_insertion: self.max_insertion,
            idle_timeout: self.idle_timeout,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}
