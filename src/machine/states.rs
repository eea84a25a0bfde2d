//! The twelve states of the vending terminal.

use crate::machine_states;

machine_states! {
    /// Current node of the terminal's state machine.
    ///
    /// Exactly one state is active at a time and it alone decides which
    /// intents are legal.
    pub enum MachineState {
        /// Ready for a ticket selection.
        Idle,
        /// Ticket selected, nothing inserted yet.
        WaitingForMoney,
        /// Some money inserted, less than the price.
        PartialMoneyReceived,
        /// Inserted amount covers the price.
        MoneyReceived,
        TicketDispensing,
        /// Ticket printed; change may still be owed.
        TicketDispensed,
        ChangeDispensing,
        /// Change paid out.
        ChangeDispensed,
        TransactionCanceled,
        /// Dispense failed; needs a refund or an operator reset.
        Error,
        /// Operator mode: restock and refill change.
        MaintenanceMode,
        RefundProcessing,
    }
    final: [TransactionCanceled, ChangeDispensed, Error]
    error: [Error]
    transient: [TicketDispensing, ChangeDispensing, TransactionCanceled, RefundProcessing]
}

impl Default for MachineState {
    fn default() -> Self {
        Self::Idle
    }
}

impl MachineState {
    /// A customer sale is open: money may be held for it.
    pub fn has_open_sale(&self) -> bool {
        !matches!(self, Self::Idle | Self::MaintenanceMode)
    }
}
