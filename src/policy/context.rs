//! Facts a policy check gets to look at.

use crate::machine::MachineState;
use crate::money::Money;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Snapshot taken just before money is credited.
#[derive(Clone, Debug)]
pub struct InsertionContext {
    pub state: MachineState,
    pub amount: Money,
    pub inserted_so_far: Money,
    pub last_activity: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl InsertionContext {
    /// Time since the sale last made progress. Clock skew counts as zero.
    pub fn idle_for(&self) -> Duration {
        idle_between(self.last_activity, self.now)
    }
}

pub(crate) fn idle_between(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(since)
        .to_std()
        .unwrap_or(Duration::ZERO)
}
