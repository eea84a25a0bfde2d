//! Transition handlers.
//!
//! `handle` is called only after the intent's guard passed for `state`. It
//! validates every precondition before touching the ledger, so a refused
//! handler leaves money, stock and the transaction exactly as they were.

use super::intent::Command;
use super::states::MachineState;
use super::{Ledger, Outcome, Step};
use crate::catalog::TicketClass;
use crate::error::Rejection;
use crate::money::Money;
use crate::ticket::SelectedTicket;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use MachineState::*;

pub(crate) fn handle(
    state: MachineState,
    command: Command,
    ledger: &mut Ledger,
    now: DateTime<Utc>,
) -> Step {
    match (state, command) {
        (Idle, Command::SelectTicket { class, destination }) => {
            select(ledger, class, &destination, now)
        }
        (TicketDispensed | ChangeDispensed, Command::SelectTicket { class, destination }) => {
            reselect(state, ledger, class, destination, now)
        }

        (WaitingForMoney | PartialMoneyReceived, Command::InsertMoney(amount)) => {
            insert(ledger, amount, now)
        }

        (WaitingForMoney | PartialMoneyReceived | MoneyReceived, Command::Cancel)
        | (WaitingForMoney | PartialMoneyReceived | MoneyReceived, Command::ExpireIdle) => {
            Step::then(TransactionCanceled, Command::ProcessRefund)
        }
        (ChangeDispensed, Command::Cancel) => {
            if ledger.transaction.issued.is_some() {
                Step::stay(Err(Rejection::TransactionCompleted))
            } else {
                Step::then(TransactionCanceled, Command::ProcessRefund)
            }
        }

        (TransactionCanceled, Command::ProcessRefund) => {
            Step::then(RefundProcessing, Command::ProcessRefund)
        }
        (Error, Command::ProcessRefund) => {
            if ledger.transaction.issued.is_some() {
                Step::stay(Err(Rejection::RefundUnavailable))
            } else {
                Step::then(RefundProcessing, Command::ProcessRefund)
            }
        }
        (RefundProcessing, Command::ProcessRefund) => refund(ledger, now),

        (MoneyReceived, Command::DispenseTicket) => {
            Step::then(TicketDispensing, Command::DispenseTicket)
        }
        (ChangeDispensed, Command::DispenseTicket) => {
            if ledger.transaction.issued.is_some() {
                Step::stay(Err(Rejection::TicketAlreadyIssued))
            } else {
                Step::then(TicketDispensing, Command::DispenseTicket)
            }
        }
        (TicketDispensing, Command::DispenseTicket) => dispense_physical_ticket(ledger, now),

        (MoneyReceived, Command::DispenseChange) => {
            if ledger.transaction.change_due().is_zero() {
                Step::stay(Err(Rejection::NoChangeOwed))
            } else {
                Step::then(ChangeDispensing, Command::DispenseChange)
            }
        }
        (TicketDispensed, Command::DispenseChange) => {
            if ledger.transaction.change_due().is_zero() {
                // Exact payment: nothing to hand back, the sale is over.
                ledger.transaction.clear(now);
                Step::moved(Idle, Err(Rejection::NoChangeOwed))
            } else {
                Step::then(ChangeDispensing, Command::DispenseChange)
            }
        }
        (ChangeDispensed, Command::DispenseChange) => Step::stay(Err(Rejection::NoChangeOwed)),
        (ChangeDispensing, Command::DispenseChange) => pay_change(ledger, now),

        (Idle, Command::EnterMaintenance) => Step::moved(MaintenanceMode, Ok(Outcome::Acknowledged)),
        (MaintenanceMode, Command::ExitMaintenance) => Step::moved(Idle, Ok(Outcome::Acknowledged)),
        (MaintenanceMode, Command::Restock { class, count }) => {
            match ledger.catalog.restock(class, count) {
                Ok(level) => Step::stay(Ok(Outcome::Restocked { class, level })),
                Err(err) => Step::stay(Err(err.into())),
            }
        }
        (MaintenanceMode, Command::ReplenishChange(amount)) => replenish(ledger, amount),

        (state, command) => Step::stay(Err(Rejection::InvalidStateOperation {
            intent: command.intent(),
            state,
        })),
    }
}

fn select(
    ledger: &mut Ledger,
    class: TicketClass,
    destination: &str,
    now: DateTime<Utc>,
) -> Step {
    let Some(entry) = ledger.catalog.lookup(class, destination) else {
        return Step::stay(Err(Rejection::UnknownTicket {
            class,
            destination: destination.to_string(),
        }));
    };

    let selected = SelectedTicket::from_entry(entry, now, ledger.validity);
    ledger.transaction.selected = Some(selected.clone());
    ledger.transaction.touch(now);

    info!(ticket = %selected, "Ticket selected");
    Step::moved(WaitingForMoney, Ok(Outcome::Selected(selected)))
}

/// Close the finished sale and start a new one in the same operation. The
/// lookup runs first so an unknown ticket leaves the finished sale intact,
/// and a sale with change still owed is never closed.
fn reselect(
    state: MachineState,
    ledger: &mut Ledger,
    class: TicketClass,
    destination: String,
    now: DateTime<Utc>,
) -> Step {
    if state == ChangeDispensed && ledger.transaction.issued.is_none() {
        return Step::stay(Err(Rejection::SaleInProgress));
    }
    let owed = ledger.transaction.change_due();
    if !owed.is_zero() {
        return Step::stay(Err(Rejection::ChangeOwed { owed }));
    }
    if ledger.catalog.lookup(class, &destination).is_none() {
        return Step::stay(Err(Rejection::UnknownTicket { class, destination }));
    }

    ledger.transaction.clear(now);
    Step::then(Idle, Command::SelectTicket { class, destination })
}

fn insert(ledger: &mut Ledger, amount: Money, now: DateTime<Utc>) -> Step {
    if !amount.is_positive() {
        return Step::stay(Err(Rejection::InvalidAmount { amount }));
    }
    let Some(price) = ledger.transaction.price() else {
        return Step::stay(Err(Rejection::Internal(
            "payment state without a selected ticket".to_string(),
        )));
    };
    let total = match ledger.transaction.inserted.checked_add(amount) {
        Ok(total) => total,
        Err(err) => return Step::stay(Err(err.into())),
    };

    ledger.transaction.inserted = total;
    ledger.transaction.touch(now);

    let next = if total >= price {
        MoneyReceived
    } else {
        PartialMoneyReceived
    };
    Step::moved(next, Ok(Outcome::Credited(total)))
}

fn refund(ledger: &mut Ledger, now: DateTime<Utc>) -> Step {
    let amount = ledger.transaction.refundable();
    ledger.transaction.clear(now);

    info!(%amount, "Refund paid");
    Step::moved(Idle, Ok(Outcome::Refunded(amount)))
}

/// Print the selected ticket, consuming one unit of its class. With no stock
/// left nothing is consumed and the terminal enters `Error`.
fn dispense_physical_ticket(ledger: &mut Ledger, now: DateTime<Utc>) -> Step {
    let Some(selected) = ledger.transaction.selected.as_ref() else {
        return Step::moved(
            Error,
            Err(Rejection::Internal("dispense without a selected ticket".to_string())),
        );
    };

    match ledger.catalog.consume(selected.class) {
        Ok(remaining) => {
            let issued = selected.issue(now);
            info!(ticket = %issued, remaining, "Ticket issued");
            ledger.transaction.issued = Some(issued.clone());
            ledger.transaction.touch(now);
            Step::moved(TicketDispensed, Ok(Outcome::Issued(issued)))
        }
        Err(err) => {
            warn!(class = %selected.class, "Ticket stock exhausted");
            Step::moved(Error, Err(err.into()))
        }
    }
}

/// Hand back the overpayment from the change pool. If the pool cannot cover
/// it, nothing is paid and the terminal enters `Error`.
fn pay_change(ledger: &mut Ledger, now: DateTime<Utc>) -> Step {
    let owed = ledger.transaction.change_due();
    let available = ledger.available_change;

    if owed > available {
        warn!(%owed, %available, "Change pool cannot cover overpayment");
        return Step::moved(Error, Err(Rejection::InsufficientChange { owed, available }));
    }

    let (pool, returned) = match (
        available.checked_sub(owed),
        ledger.transaction.change_returned.checked_add(owed),
    ) {
        (Ok(pool), Ok(returned)) => (pool, returned),
        (Err(err), _) | (_, Err(err)) => return Step::moved(Error, Err(err.into())),
    };

    ledger.available_change = pool;
    ledger.transaction.change_returned = returned;
    ledger.transaction.touch(now);

    info!(change = %owed, pool = %pool, "Change dispensed");
    Step::moved(ChangeDispensed, Ok(Outcome::ChangePaid(owed)))
}

fn replenish(ledger: &mut Ledger, amount: Money) -> Step {
    if !amount.is_positive() {
        return Step::stay(Err(Rejection::InvalidAmount { amount }));
    }
    match ledger.available_change.checked_add(amount) {
        Ok(total) => {
            ledger.available_change = total;
            Step::stay(Ok(Outcome::ChangeReplenished(total)))
        }
        Err(err) => Step::stay(Err(err.into())),
    }
}
