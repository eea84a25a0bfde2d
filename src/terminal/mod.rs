//! The vending terminal: current state, ledger, policy and history behind
//! one synchronous API.
//!
//! Every operation runs to completion before it returns. The guard for the
//! requested intent is checked against the current state first; a refused
//! guard changes nothing. Transitions a handler chains through (cancel,
//! refund, dispensing) are each committed to the history.
//!
//! # Example
//!
//! ```rust
//! use ticket_terminal::{MachineState, Money, TerminalBuilder, TicketClass};
//!
//! let mut terminal = TerminalBuilder::with_defaults().build().unwrap();
//!
//! terminal.select_ticket(TicketClass::Adult, "Center").unwrap();
//! terminal.insert_money(Money::from_major(50)).unwrap();
//! terminal.insert_money(Money::from_major(50)).unwrap();
//! let ticket = terminal.dispense_ticket().unwrap();
//!
//! assert_eq!(terminal.state(), MachineState::TicketDispensed);
//! assert!(ticket.number.as_str().starts_with("TICK-"));
//! ```

mod shared;
mod status;

pub use shared::SharedTerminal;
pub use status::TerminalStatus;

use crate::catalog::TicketClass;
use crate::clock::Clock;
use crate::core::{State, StateHistory, StateTransition};
use crate::error::{Rejection, TerminalResult};
use crate::machine::transitions::handle;
use crate::machine::{Command, Intent, Ledger, MachineState, Outcome, Step};
use crate::money::Money;
use crate::policy::{InsertionContext, PolicyViolation, SessionPolicy, ViolationStrategy};
use crate::ticket::{IssuedTicket, SelectedTicket};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::{debug, info, warn};

/// History of a terminal, keyed by the intent that caused each move.
pub type TerminalHistory = StateHistory<MachineState, Intent>;

pub struct Terminal {
    state: MachineState,
    ledger: Ledger,
    policy: SessionPolicy,
    history: TerminalHistory,
    clock: Arc<dyn Clock>,
}

impl Terminal {
    pub(crate) fn from_parts(
        ledger: Ledger,
        policy: SessionPolicy,
        history_limit: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: MachineState::Idle,
            ledger,
            policy,
            history: StateHistory::with_limit(history_limit),
            clock,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Whether `intent` would pass its guard right now.
    pub fn can(&self, intent: Intent) -> bool {
        intent.permits(self.state)
    }

    pub fn history(&self) -> &TerminalHistory {
        &self.history
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn status(&self) -> TerminalStatus {
        TerminalStatus::capture(self.state, &self.ledger)
    }

    pub fn select_ticket(
        &mut self,
        class: TicketClass,
        destination: impl Into<String>,
    ) -> TerminalResult<SelectedTicket> {
        let command = Command::SelectTicket {
            class,
            destination: destination.into(),
        };
        match self.dispatch(command)? {
            Outcome::Selected(ticket) => Ok(ticket),
            other => Err(unexpected(Intent::SelectTicket, other)),
        }
    }

    /// Credit `amount` to the sale, returning the running total.
    ///
    /// The session policy is consulted after the guard. With
    /// [`ViolationStrategy::Reject`] a violating insertion is refused, and if
    /// the sale had already been idle past its timeout it is expired and
    /// refunded as well.
    pub fn insert_money(&mut self, amount: Money) -> TerminalResult<Money> {
        self.check_guard(Intent::InsertMoney)?;

        let now = self.clock.now();
        let context = InsertionContext {
            state: self.state,
            amount,
            inserted_so_far: self.ledger.transaction().inserted_amount(),
            last_activity: self.ledger.transaction().last_activity(),
            now,
        };

        if let Validation::Failure(violations) = self.policy.enforce(&context) {
            let violations: Vec<PolicyViolation> = violations.iter().cloned().collect();
            match self.policy.violation_strategy() {
                ViolationStrategy::Reject => {
                    let timed_out = violations
                        .iter()
                        .any(|v| matches!(v, PolicyViolation::IdleTimeoutExceeded { .. }));
                    if timed_out {
                        self.expire_sale(now);
                    }
                    let rejection = Rejection::PolicyViolation(violations);
                    warn!(intent = %Intent::InsertMoney, reason = %rejection, "Insertion refused by policy");
                    return Err(rejection);
                }
                ViolationStrategy::WarnOnly => {
                    for violation in &violations {
                        warn!(%violation, "Policy violation ignored");
                    }
                }
            }
        }

        match self.dispatch_at(Command::InsertMoney(amount), now)? {
            Outcome::Credited(total) => Ok(total),
            other => Err(unexpected(Intent::InsertMoney, other)),
        }
    }

    /// Abandon the sale and refund what was inserted, less any change
    /// already paid.
    pub fn cancel_transaction(&mut self) -> TerminalResult<Money> {
        match self.dispatch(Command::Cancel)? {
            Outcome::Refunded(amount) => Ok(amount),
            other => Err(unexpected(Intent::Cancel, other)),
        }
    }

    pub fn dispense_ticket(&mut self) -> TerminalResult<IssuedTicket> {
        match self.dispatch(Command::DispenseTicket)? {
            Outcome::Issued(ticket) => Ok(ticket),
            other => Err(unexpected(Intent::DispenseTicket, other)),
        }
    }

    pub fn dispense_change(&mut self) -> TerminalResult<Money> {
        match self.dispatch(Command::DispenseChange)? {
            Outcome::ChangePaid(amount) => Ok(amount),
            other => Err(unexpected(Intent::DispenseChange, other)),
        }
    }

    /// Pay back a canceled or failed sale and return to `Idle`.
    pub fn process_refund(&mut self) -> TerminalResult<Money> {
        match self.dispatch(Command::ProcessRefund)? {
            Outcome::Refunded(amount) => Ok(amount),
            other => Err(unexpected(Intent::ProcessRefund, other)),
        }
    }

    pub fn enter_maintenance(&mut self) -> TerminalResult<()> {
        self.dispatch(Command::EnterMaintenance).map(|_| ())
    }

    pub fn exit_maintenance(&mut self) -> TerminalResult<()> {
        self.dispatch(Command::ExitMaintenance).map(|_| ())
    }

    /// Add `count` tickets of `class`, returning the new stock level.
    pub fn restock(&mut self, class: TicketClass, count: u32) -> TerminalResult<u32> {
        match self.dispatch(Command::Restock { class, count })? {
            Outcome::Restocked { level, .. } => Ok(level),
            other => Err(unexpected(Intent::Restock, other)),
        }
    }

    /// Add `amount` to the change pool, returning the new pool total.
    pub fn replenish_change(&mut self, amount: Money) -> TerminalResult<Money> {
        match self.dispatch(Command::ReplenishChange(amount))? {
            Outcome::ChangeReplenished(total) => Ok(total),
            other => Err(unexpected(Intent::ReplenishChange, other)),
        }
    }

    /// Drop the current sale and force `Idle`, whatever the state. Inserted
    /// money is discarded, not refunded.
    pub fn reset_transaction(&mut self) {
        let now = self.clock.now();
        let discarded = self.ledger.transaction.refundable();
        self.ledger.transaction.clear(now);
        if !discarded.is_zero() {
            warn!(%discarded, state = %self.state, "Transaction reset with money inserted");
        }
        self.commit(MachineState::Idle, Intent::Reset, now);
    }

    /// Expire the sale if it has sat idle past the policy's timeout at
    /// `now`. Returns the refund when it did.
    pub fn expire_idle_transaction(&mut self, now: DateTime<Utc>) -> Option<Money> {
        if !self.can(Intent::ExpireIdle) {
            return None;
        }
        let last_activity = self.ledger.transaction().last_activity();
        if !self.policy.is_idle_expired(last_activity, now) {
            return None;
        }

        self.expire_sale(now)
    }

    fn expire_sale(&mut self, now: DateTime<Utc>) -> Option<Money> {
        match self.dispatch_at(Command::ExpireIdle, now) {
            Ok(Outcome::Refunded(refund)) => {
                info!(%refund, "Idle sale expired");
                Some(refund)
            }
            Ok(other) => {
                warn!(outcome = ?other, "Idle expiry produced no refund");
                None
            }
            Err(rejection) => {
                warn!(reason = %rejection, state = %self.state, "Idle expiry failed");
                None
            }
        }
    }

    fn check_guard(&self, intent: Intent) -> TerminalResult<()> {
        if self.can(intent) {
            Ok(())
        } else {
            let rejection = Rejection::InvalidStateOperation {
                intent,
                state: self.state,
            };
            warn!(%intent, state = %self.state, "Operation not allowed in current state");
            Err(rejection)
        }
    }

    fn dispatch(&mut self, command: Command) -> TerminalResult<Outcome> {
        let now = self.clock.now();
        self.dispatch_at(command, now)
    }

    /// Run a command and every command it chains into, committing each move.
    fn dispatch_at(&mut self, command: Command, now: DateTime<Utc>) -> TerminalResult<Outcome> {
        let intent = command.intent();
        self.check_guard(intent)?;

        let mut command = command;
        loop {
            match handle(self.state, command, &mut self.ledger, now) {
                Step::Stay(result) => return self.finish(intent, result),
                Step::Move { to, result } => {
                    self.commit(to, intent, now);
                    return self.finish(intent, result);
                }
                Step::Then { to, command: next } => {
                    self.commit(to, intent, now);
                    command = next;
                }
            }
        }
    }

    fn commit(&mut self, to: MachineState, cause: Intent, now: DateTime<Utc>) {
        let from = self.state;
        self.history.record(StateTransition {
            from,
            to,
            cause,
            timestamp: now,
        });
        self.state = to;

        debug!(
            from = %from,
            to = %to,
            %cause,
            transient = to.is_transient(),
            closes_sale = to.is_final(),
            "State transition"
        );
        if to.is_error() {
            warn!(from = %from, %cause, "Terminal entered error state");
        }
    }

    fn finish(&self, intent: Intent, result: Result<Outcome, Rejection>) -> TerminalResult<Outcome> {
        if let Err(rejection) = &result {
            warn!(%intent, state = %self.state, reason = %rejection, "Operation rejected");
        }
        result
    }
}

fn unexpected(intent: Intent, outcome: Outcome) -> Rejection {
    Rejection::Internal(format!("{} produced unexpected outcome {outcome:?}", intent.as_str()))
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("state", &self.state)
            .field("ledger", &self.ledger)
            .field("policy", &self.policy)
            .field("history_len", &self.history.len())
            .finish()
    }
}
