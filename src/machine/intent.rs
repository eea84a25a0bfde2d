//! Intents, their guards, and the commands that carry their payloads.

use super::states::MachineState;
use crate::catalog::TicketClass;
use crate::core::Guard;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

use MachineState::*;

/// Kind of operation a caller (or timer, or operator) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SelectTicket,
    InsertMoney,
    Cancel,
    DispenseTicket,
    DispenseChange,
    ProcessRefund,
    EnterMaintenance,
    ExitMaintenance,
    Restock,
    ReplenishChange,
    /// Idle-timeout expiry of an unfinished sale.
    ExpireIdle,
    /// Administrative reset; bypasses guards.
    Reset,
}

impl Intent {
    pub const ALL: [Intent; 12] = [
        Intent::SelectTicket,
        Intent::InsertMoney,
        Intent::Cancel,
        Intent::DispenseTicket,
        Intent::DispenseChange,
        Intent::ProcessRefund,
        Intent::EnterMaintenance,
        Intent::ExitMaintenance,
        Intent::Restock,
        Intent::ReplenishChange,
        Intent::ExpireIdle,
        Intent::Reset,
    ];

    /// States in which this intent is legal. Depends on nothing but the
    /// intent itself.
    ///
    /// `DispenseTicket` in `TicketDispensing`, `DispenseChange` in
    /// `ChangeDispensing` and `ProcessRefund` in `RefundProcessing` exist only
    /// so a handler can chain into them within one operation. The terminal
    /// never rests in those states, so callers cannot reach these cells.
    pub const fn guard(self) -> Guard<MachineState> {
        match self {
            Self::SelectTicket => Guard::allowing(&[Idle, TicketDispensed, ChangeDispensed]),
            Self::InsertMoney => Guard::allowing(&[WaitingForMoney, PartialMoneyReceived]),
            Self::Cancel => Guard::allowing(&[
                WaitingForMoney,
                PartialMoneyReceived,
                MoneyReceived,
                ChangeDispensed,
            ]),
            Self::DispenseTicket => {
                Guard::allowing(&[MoneyReceived, TicketDispensing, ChangeDispensed])
            }
            Self::DispenseChange => Guard::allowing(&[
                MoneyReceived,
                TicketDispensed,
                ChangeDispensing,
                ChangeDispensed,
            ]),
            Self::ProcessRefund => Guard::allowing(&[TransactionCanceled, RefundProcessing, Error]),
            Self::EnterMaintenance => Guard::allowing(&[Idle]),
            Self::ExitMaintenance | Self::Restock | Self::ReplenishChange => {
                Guard::allowing(&[MaintenanceMode])
            }
            Self::ExpireIdle => {
                Guard::allowing(&[WaitingForMoney, PartialMoneyReceived, MoneyReceived])
            }
            Self::Reset => Guard::allowing(MachineState::ALL),
        }
    }

    pub fn permits(self, state: MachineState) -> bool {
        self.guard().check(&state)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectTicket => "select_ticket",
            Self::InsertMoney => "insert_money",
            Self::Cancel => "cancel",
            Self::DispenseTicket => "dispense_ticket",
            Self::DispenseChange => "dispense_change",
            Self::ProcessRefund => "process_refund",
            Self::EnterMaintenance => "enter_maintenance",
            Self::ExitMaintenance => "exit_maintenance",
            Self::Restock => "restock",
            Self::ReplenishChange => "replenish_change",
            Self::ExpireIdle => "expire_idle",
            Self::Reset => "reset",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::SelectTicket => "select a ticket",
            Self::InsertMoney => "insert money",
            Self::Cancel => "cancel the transaction",
            Self::DispenseTicket => "dispense a ticket",
            Self::DispenseChange => "dispense change",
            Self::ProcessRefund => "process a refund",
            Self::EnterMaintenance => "enter maintenance mode",
            Self::ExitMaintenance => "exit maintenance mode",
            Self::Restock => "restock tickets",
            Self::ReplenishChange => "replenish change",
            Self::ExpireIdle => "expire the transaction",
            Self::Reset => "reset the transaction",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// An intent together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectTicket {
        class: TicketClass,
        destination: String,
    },
    InsertMoney(Money),
    Cancel,
    DispenseTicket,
    DispenseChange,
    ProcessRefund,
    EnterMaintenance,
    ExitMaintenance,
    Restock {
        class: TicketClass,
        count: u32,
    },
    ReplenishChange(Money),
    ExpireIdle,
}

impl Command {
    pub fn intent(&self) -> Intent {
        match self {
            Self::SelectTicket { .. } => Intent::SelectTicket,
            Self::InsertMoney(_) => Intent::InsertMoney,
            Self::Cancel => Intent::Cancel,
            Self::DispenseTicket => Intent::DispenseTicket,
            Self::DispenseChange => Intent::DispenseChange,
            Self::ProcessRefund => Intent::ProcessRefund,
            Self::EnterMaintenance => Intent::EnterMaintenance,
            Self::ExitMaintenance => Intent::ExitMaintenance,
            Self::Restock { .. } => Intent::Restock,
            Self::ReplenishChange(_) => Intent::ReplenishChange,
            Self::ExpireIdle => Intent::ExpireIdle,
        }
    }
}
