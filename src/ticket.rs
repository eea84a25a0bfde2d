//! Ticket identity and validity windows.

use crate::catalog::{CatalogEntry, TicketClass};
use crate::money::Money;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const TICKET_PREFIX: &str = "TICK-";

/// Process-unique ticket number, `TICK-` followed by 32 hex digits of a
/// random v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    pub fn generate() -> Self {
        let id = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("{TICKET_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half-open interval `[valid_from, valid_until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl ValidityWindow {
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self {
            valid_from: start,
            valid_until: start + length,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at < self.valid_until
    }

    pub fn length(&self) -> Duration {
        self.valid_until - self.valid_from
    }
}

/// Snapshot of the catalog entry chosen for the active sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTicket {
    pub number: TicketNumber,
    pub class: TicketClass,
    pub destination: String,
    pub price: Money,
    pub validity: ValidityWindow,
}

impl SelectedTicket {
    pub fn from_entry(entry: &CatalogEntry, now: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            number: TicketNumber::generate(),
            class: entry.class,
            destination: entry.destination.clone(),
            price: entry.price,
            validity: ValidityWindow::starting_at(now, validity),
        }
    }

    /// Finalize the selection into an issued ticket, restamping the
    /// validity window from the moment of issue.
    pub fn issue(&self, issued_at: DateTime<Utc>) -> IssuedTicket {
        IssuedTicket {
            number: self.number.clone(),
            class: self.class,
            destination: self.destination.clone(),
            price: self.price,
            issued_at,
            validity: ValidityWindow::starting_at(issued_at, self.validity.length()),
        }
    }
}

impl fmt::Display for SelectedTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticket to {} - {} ({})",
            self.class, self.destination, self.price, self.number
        )
    }
}

/// A printed ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTicket {
    pub number: TicketNumber,
    pub class: TicketClass,
    pub destination: String,
    pub price: Money,
    pub issued_at: DateTime<Utc>,
    pub validity: ValidityWindow,
}

impl fmt::Display for IssuedTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticket to {} - {} ({}), valid until {}",
            self.class,
            self.destination,
            self.price,
            self.number,
            self.validity.valid_until.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            class: TicketClass::Adult,
            destination: "Center".to_string(),
            price: Money::from_major(100),
        }
    }

    #[test]
    fn ticket_numbers_have_prefix_and_full_uuid() {
        let number = TicketNumber::generate();
        let digits = number.as_str().strip_prefix(TICKET_PREFIX).unwrap();
        assert_eq!(digits.len(), 32);
        assert!(digits
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn ticket_numbers_do_not_repeat() {
        let numbers: HashSet<_> = (0..1_000).map(|_| TicketNumber::generate()).collect();
        assert_eq!(numbers.len(), 1_000);
    }

    #[test]
    fn validity_window_is_half_open() {
        let start = Utc::now();
        let window = ValidityWindow::starting_at(start, Duration::hours(2));
        assert!(window.contains(start));
        assert!(window.contains(start + Duration::minutes(119)));
        assert!(!window.contains(start + Duration::hours(2)));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn issue_keeps_number_and_restamps_window() {
        let selected_at = Utc::now();
        let selected = SelectedTicket::from_entry(&entry(), selected_at, Duration::hours(2));

        let issued_at = selected_at + Duration::minutes(3);
        let issued = selected.issue(issued_at);

        assert_eq!(issued.number, selected.number);
        assert_eq!(issued.validity.valid_from, issued_at);
        assert_eq!(issued.validity.valid_until, issued_at + Duration::hours(2));
        assert_eq!(issued.price, Money::from_major(100));
    }
}
