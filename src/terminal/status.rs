//! Read-only snapshot of the terminal.

use crate::catalog::TicketClass;
use crate::machine::{Ledger, MachineState};
use crate::money::Money;
use crate::ticket::{IssuedTicket, SelectedTicket};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Everything a display panel needs. Taking a snapshot never changes the
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStatus {
    pub state: MachineState,
    pub message: String,
    pub inserted_amount: Money,
    pub amount_due: Money,
    pub change_due: Money,
    pub selected_ticket: Option<SelectedTicket>,
    pub issued_ticket: Option<IssuedTicket>,
    pub available_change: Money,
    pub inventory: BTreeMap<TicketClass, u32>,
    /// Tickets left across all classes.
    pub inventory_count: u32,
}

impl TerminalStatus {
    pub(crate) fn capture(state: MachineState, ledger: &Ledger) -> Self {
        let tx = ledger.transaction();
        let catalog = ledger.catalog();

        Self {
            state,
            message: status_message(state, ledger),
            inserted_amount: tx.inserted_amount(),
            amount_due: tx.amount_due(),
            change_due: tx.change_due(),
            selected_ticket: tx.selected_ticket().cloned(),
            issued_ticket: tx.issued_ticket().cloned(),
            available_change: ledger.available_change(),
            inventory: catalog.stock_levels(),
            inventory_count: catalog.total_stock(),
        }
    }
}

fn status_message(state: MachineState, ledger: &Ledger) -> String {
    let tx = ledger.transaction();
    let price = tx.price().unwrap_or(Money::ZERO);

    match state {
        MachineState::Idle => "Ready. Please select a ticket.".to_string(),
        MachineState::WaitingForMoney => format!(
            "Waiting for payment. Inserted: {}, price: {}",
            tx.inserted_amount(),
            price
        ),
        MachineState::PartialMoneyReceived => format!(
            "Partial payment. Inserted: {}, still due: {}",
            tx.inserted_amount(),
            tx.amount_due()
        ),
        MachineState::MoneyReceived => format!(
            "Payment received. Waiting to dispense the ticket. Change: {}",
            tx.change_due()
        ),
        MachineState::TicketDispensing => "Dispensing ticket...".to_string(),
        MachineState::TicketDispensed => {
            "Ticket dispensed. Take your change or select a new ticket.".to_string()
        }
        MachineState::ChangeDispensing => "Dispensing change...".to_string(),
        MachineState::ChangeDispensed if tx.issued_ticket().is_some() => {
            "Change dispensed. Thank you!".to_string()
        }
        MachineState::ChangeDispensed => {
            "Change dispensed. Take your ticket or cancel.".to_string()
        }
        MachineState::TransactionCanceled => "Transaction canceled.".to_string(),
        MachineState::RefundProcessing => "Processing refund...".to_string(),
        MachineState::Error if tx.issued_ticket().is_some() => format!(
            "Out of service. Change of {} could not be paid; call an operator.",
            tx.change_due()
        ),
        MachineState::Error => format!(
            "Out of service. Refund of {} pending.",
            tx.refundable()
        ),
        MachineState::MaintenanceMode => "Maintenance in progress.".to_string(),
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== TERMINAL STATUS ===")?;
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "Message: {}", self.message)?;
        writeln!(f, "Inserted: {}", self.inserted_amount)?;
        writeln!(f, "Available change: {}", self.available_change)?;
        write!(f, "Tickets in stock: {}", self.inventory_count)?;
        if let Some(ticket) = &self.selected_ticket {
            write!(f, "\nSelected ticket: {ticket}")?;
        }
        if let Some(ticket) = &self.issued_ticket {
            write!(f, "\nIssued ticket: {ticket}")?;
        }
        Ok(())
    }
}
