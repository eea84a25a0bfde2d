//! The terminal's state machine: states, intents, and transition handlers.
//!
//! Handlers are pure with respect to the machine state. They read and update
//! the [`Ledger`] and return a [`Step`] telling the dispatcher where to go;
//! the dispatcher owns the current state and the transition history.

pub mod intent;
pub mod states;
pub mod transaction;
pub(crate) mod transitions;

pub use intent::{Command, Intent};
pub use states::MachineState;
pub use transaction::TransactionState;

use crate::catalog::{Catalog, TicketClass};
use crate::error::Rejection;
use crate::money::Money;
use crate::ticket::{IssuedTicket, SelectedTicket};

/// Everything a transition may change besides the state itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub(crate) transaction: TransactionState,
    pub(crate) catalog: Catalog,
    pub(crate) available_change: Money,
    pub(crate) validity: chrono::Duration,
}

impl Ledger {
    pub fn transaction(&self) -> &TransactionState {
        &self.transaction
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn available_change(&self) -> Money {
        self.available_change
    }

    pub fn validity(&self) -> chrono::Duration {
        self.validity
    }
}

/// Successful result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(SelectedTicket),
    /// Running total after an insertion.
    Credited(Money),
    Issued(IssuedTicket),
    ChangePaid(Money),
    Refunded(Money),
    Restocked { class: TicketClass, level: u32 },
    /// Change pool total after a refill.
    ChangeReplenished(Money),
    Acknowledged,
}

/// What the dispatcher does after a handler ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep the current state.
    Stay(Result<Outcome, Rejection>),
    /// Commit a move to `to` and finish with `result`.
    Move {
        to: MachineState,
        result: Result<Outcome, Rejection>,
    },
    /// Commit a move to `to`, then run `command` from there.
    Then { to: MachineState, command: Command },
}

impl Step {
    pub(crate) fn stay(result: Result<Outcome, Rejection>) -> Self {
        Self::Stay(result)
    }

    pub(crate) fn moved(to: MachineState, result: Result<Outcome, Rejection>) -> Self {
        Self::Move { to, result }
    }

    pub(crate) fn then(to: MachineState, command: Command) -> Self {
        Self::Then { to, command }
    }
}
