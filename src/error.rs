//! Why a terminal operation was refused.

use crate::catalog::{StockError, TicketClass};
use crate::machine::{Intent, MachineState};
use crate::money::{Money, MoneyError};
use crate::policy::PolicyViolation;
use thiserror::Error;

/// Result of a terminal operation.
pub type TerminalResult<T> = Result<T, Rejection>;

/// A refused operation, with a human-readable reason.
///
/// Rejections are ordinary values: none of them is fatal, and the terminal
/// stays inspectable after every one of them. Only `InsufficientInventory`
/// and `InsufficientChange` move the machine (into `Error`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Cannot {intent} while the terminal is in state {state}")]
    InvalidStateOperation { intent: Intent, state: MachineState },

    #[error("No {class} ticket to '{destination}' in the catalog")]
    UnknownTicket {
        class: TicketClass,
        destination: String,
    },

    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Money },

    #[error("Out of stock: no {class} tickets left")]
    InsufficientInventory { class: TicketClass },

    #[error("Insufficient change: {owed} owed but only {available} available")]
    InsufficientChange { owed: Money, available: Money },

    #[error("No change owed")]
    NoChangeOwed,

    #[error("Ticket already issued for this transaction")]
    TicketAlreadyIssued,

    #[error("Transaction already completed")]
    TransactionCompleted,

    #[error("A paid sale is still open; take the ticket or cancel first")]
    SaleInProgress,

    #[error("Change of {owed} is still owed; dispense change first")]
    ChangeOwed { owed: Money },

    #[error("Refund unavailable: the ticket was already issued")]
    RefundUnavailable,

    #[error("Policy violated: {}", join_violations(.0))]
    PolicyViolation(Vec<PolicyViolation>),

    #[error("Inventory limit reached for {class}")]
    InventoryOverflow { class: TicketClass },

    #[error(transparent)]
    Arithmetic(#[from] MoneyError),

    #[error("Internal state machine error: {0}")]
    Internal(String),
}

impl Rejection {
    /// The refusal came from a guard rather than a precondition.
    pub fn is_wrong_state(&self) -> bool {
        matches!(self, Self::InvalidStateOperation { .. })
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<StockError> for Rejection {
    fn from(err: StockError) -> Self {
        match err {
            StockError::OutOfStock { class } => Self::InsufficientInventory { class },
            StockError::Overflow { class, .. } => Self::InventoryOverflow { class },
        }
    }
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_state_reason_names_intent_and_state() {
        let rejection = Rejection::InvalidStateOperation {
            intent: Intent::InsertMoney,
            state: MachineState::Idle,
        };
        assert!(rejection.is_wrong_state());
        assert_eq!(
            rejection.reason(),
            "Cannot insert money while the terminal is in state Idle"
        );
    }

    #[test]
    fn policy_reason_lists_every_violation() {
        let rejection = Rejection::PolicyViolation(vec![
            PolicyViolation::MaxInsertionExceeded {
                max: Money::from_major(100),
                amount: Money::from_major(500),
            },
            PolicyViolation::CustomCheckFailed {
                message: "jammed".to_string(),
            },
        ]);
        let reason = rejection.reason();
        assert!(reason.contains("500.00"));
        assert!(reason.contains("jammed"));
        assert!(!rejection.is_wrong_state());
    }

    #[test]
    fn stock_errors_convert() {
        let out: Rejection = StockError::OutOfStock {
            class: TicketClass::Child,
        }
        .into();
        assert_eq!(
            out,
            Rejection::InsufficientInventory {
                class: TicketClass::Child
            }
        );
    }
}
