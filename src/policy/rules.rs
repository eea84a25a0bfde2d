//! Session policy rules evaluated with `Validation`, so a single check
//! reports every violation at once.

use crate::policy::context::{idle_between, InsertionContext};
use crate::policy::violations::{PolicyViolation, ViolationStrategy};
use crate::money::Money;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for custom insertion checks.
pub type InsertionCheck =
    Box<dyn Fn(&InsertionContext) -> Validation<(), NonEmptyVec<PolicyViolation>> + Send + Sync>;

/// Limits applied to a customer session.
///
/// The default policy has no limits and rejects on violation.
#[derive(Default)]
pub struct SessionPolicy {
    pub(crate) max_insertion: Option<Money>,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) required_checks: Vec<InsertionCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl SessionPolicy {
    /// Check an insertion against every rule, accumulating all violations.
    pub fn enforce(
        &self,
        context: &InsertionContext,
    ) -> Validation<(), NonEmptyVec<PolicyViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<PolicyViolation>>> = Vec::new();

        if let Some(max) = self.max_insertion {
            let check = if context.amount > max {
                Validation::fail(PolicyViolation::MaxInsertionExceeded {
                    max,
                    amount: context.amount,
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        if let Some(timeout) = self.idle_timeout {
            let idle = context.idle_for();
            let check = if idle > timeout {
                Validation::fail(PolicyViolation::IdleTimeoutExceeded { timeout, idle })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Whether a sale last active at `last_activity` has timed out.
    pub fn is_idle_expired(&self, last_activity: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| idle_between(last_activity, now) > timeout)
    }

    pub fn max_insertion(&self) -> Option<Money> {
        self.max_insertion
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }
}

impl fmt::Debug for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPolicy")
            .field("max_insertion", &self.max_insertion)
            .field("idle_timeout", &self.idle_timeout)
            .field("required_checks", &self.required_checks.len())
            .field("on_violation", &self.on_violation)
            .finish()
    }
}
