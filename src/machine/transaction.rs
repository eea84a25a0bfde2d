//! Mutable record of the sale in progress.

use crate::money::Money;
use crate::ticket::{IssuedTicket, SelectedTicket};
use chrono::{DateTime, Utc};

/// Money and ticket bookkeeping for the active sale.
///
/// `inserted` stays non-zero only while a ticket is selected or a refund is
/// pending; [`TransactionState::clear`] zeroes it whenever the terminal goes
/// back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionState {
    pub(crate) inserted: Money,
    pub(crate) selected: Option<SelectedTicket>,
    pub(crate) issued: Option<IssuedTicket>,
    pub(crate) change_returned: Money,
    pub(crate) last_activity: DateTime<Utc>,
}

impl TransactionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            inserted: Money::ZERO,
            selected: None,
            issued: None,
            change_returned: Money::ZERO,
            last_activity: now,
        }
    }

    pub fn inserted_amount(&self) -> Money {
        self.inserted
    }

    pub fn selected_ticket(&self) -> Option<&SelectedTicket> {
        self.selected.as_ref()
    }

    pub fn issued_ticket(&self) -> Option<&IssuedTicket> {
        self.issued.as_ref()
    }

    pub fn change_returned(&self) -> Money {
        self.change_returned
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn price(&self) -> Option<Money> {
        self.selected.as_ref().map(|ticket| ticket.price)
    }

    /// Amount still needed to cover the price.
    pub fn amount_due(&self) -> Money {
        self.price()
            .map(|price| price.saturating_sub_floor(self.inserted))
            .unwrap_or(Money::ZERO)
    }

    /// Overpayment not yet handed back.
    pub fn change_due(&self) -> Money {
        self.price()
            .map(|price| {
                self.inserted
                    .saturating_sub_floor(price)
                    .saturating_sub_floor(self.change_returned)
            })
            .unwrap_or(Money::ZERO)
    }

    /// What a refund would hand back: everything inserted minus change
    /// already paid out.
    pub fn refundable(&self) -> Money {
        self.inserted.saturating_sub_floor(self.change_returned)
    }

    pub fn is_paid(&self) -> bool {
        self.price().is_some_and(|price| self.inserted >= price)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub(crate) fn clear(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, TicketClass};
    use chrono::Duration;

    fn with_ticket(price: i64, inserted: i64) -> TransactionState {
        let now = Utc::now();
        let entry = CatalogEntry {
            class: TicketClass::Vip,
            destination: "Stadium".to_string(),
            price: Money::from_major(price),
        };
        let mut tx = TransactionState::new(now);
        tx.selected = Some(SelectedTicket::from_entry(&entry, now, Duration::hours(2)));
        tx.inserted = Money::from_major(inserted);
        tx
    }

    #[test]
    fn empty_transaction_owes_nothing() {
        let tx = TransactionState::new(Utc::now());
        assert_eq!(tx.amount_due(), Money::ZERO);
        assert_eq!(tx.change_due(), Money::ZERO);
        assert!(!tx.is_paid());
    }

    #[test]
    fn underpayment_reports_amount_due() {
        let tx = with_ticket(100, 30);
        assert_eq!(tx.amount_due(), Money::from_major(70));
        assert_eq!(tx.change_due(), Money::ZERO);
        assert!(!tx.is_paid());
    }

    #[test]
    fn exact_payment_owes_no_change() {
        let tx = with_ticket(100, 100);
        assert!(tx.is_paid());
        assert_eq!(tx.change_due(), Money::ZERO);
    }

    #[test]
    fn change_due_accounts_for_change_already_returned() {
        let mut tx = with_ticket(200, 250);
        assert_eq!(tx.change_due(), Money::from_major(50));

        tx.change_returned = Money::from_major(50);
        assert_eq!(tx.change_due(), Money::ZERO);
        assert_eq!(tx.refundable(), Money::from_major(200));
    }

    #[test]
    fn clear_resets_everything() {
        let mut tx = with_ticket(200, 250);
        let later = Utc::now() + Duration::minutes(1);
        tx.clear(later);
        assert_eq!(tx, TransactionState::new(later));
    }
}
