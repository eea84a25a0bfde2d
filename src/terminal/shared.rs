//! Thread-safe handle to a terminal.

use super::{Terminal, TerminalStatus};
use crate::catalog::TicketClass;
use crate::error::TerminalResult;
use crate::machine::{Intent, MachineState};
use crate::money::Money;
use crate::ticket::{IssuedTicket, SelectedTicket};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle sharing one [`Terminal`] between threads.
///
/// Each method takes the lock once. Use [`SharedTerminal::with_session`] to
/// run a whole purchase without another caller interleaving.
#[derive(Clone, Debug)]
pub struct SharedTerminal {
    inner: Arc<Mutex<Terminal>>,
}

impl SharedTerminal {
    pub fn new(terminal: Terminal) -> Self {
        Self {
            inner: Arc::new(Mutex::new(terminal)),
        }
    }

    /// Run `f` with exclusive access to the terminal.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Terminal) -> R) -> R {
        let mut terminal = self.inner.lock();
        f(&mut terminal)
    }

    pub fn state(&self) -> MachineState {
        self.inner.lock().state()
    }

    pub fn can(&self, intent: Intent) -> bool {
        self.inner.lock().can(intent)
    }

    pub fn status(&self) -> TerminalStatus {
        self.inner.lock().status()
    }

    pub fn select_ticket(
        &self,
        class: TicketClass,
        destination: impl Into<String>,
    ) -> TerminalResult<SelectedTicket> {
        self.inner.lock().select_ticket(class, destination)
    }

    pub fn insert_money(&self, amount: Money) -> TerminalResult<Money> {
        self.inner.lock().insert_money(amount)
    }

    pub fn cancel_transaction(&self) -> TerminalResult<Money> {
        self.inner.lock().cancel_transaction()
    }

    pub fn dispense_ticket(&self) -> TerminalResult<IssuedTicket> {
        self.inner.lock().dispense_ticket()
    }

    pub fn dispense_change(&self) -> TerminalResult<Money> {
        self.inner.lock().dispense_change()
    }

    pub fn process_refund(&self) -> TerminalResult<Money> {
        self.inner.lock().process_refund()
    }

    pub fn enter_maintenance(&self) -> TerminalResult<()> {
        self.inner.lock().enter_maintenance()
    }

    pub fn exit_maintenance(&self) -> TerminalResult<()> {
        self.inner.lock().exit_maintenance()
    }

    pub fn restock(&self, class: TicketClass, count: u32) -> TerminalResult<u32> {
        self.inner.lock().restock(class, count)
    }

    pub fn replenish_change(&self, amount: Money) -> TerminalResult<Money> {
        self.inner.lock().replenish_change(amount)
    }

    pub fn reset_transaction(&self) {
        self.inner.lock().reset_transaction()
    }

    pub fn expire_idle_transaction(&self, now: DateTime<Utc>) -> Option<Money> {
        self.inner.lock().expire_idle_transaction(now)
    }
}

impl From<Terminal> for SharedTerminal {
    fn from(terminal: Terminal) -> Self {
        Self::new(terminal)
    }
}
