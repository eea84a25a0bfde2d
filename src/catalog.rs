//! Ticket catalog: prices per (class, destination) and per-class stock.

use crate::money::Money;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fare class of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketClass {
    Adult,
    Child,
    Student,
    Senior,
    Vip,
}

impl TicketClass {
    pub const ALL: [TicketClass; 5] = [
        TicketClass::Adult,
        TicketClass::Child,
        TicketClass::Student,
        TicketClass::Senior,
        TicketClass::Vip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Child => "Child",
            Self::Student => "Student",
            Self::Senior => "Senior",
            Self::Vip => "VIP",
        }
    }
}

impl fmt::Display for TicketClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid ticket class: {s}"))
    }
}

// Accepts any casing ("VIP", "vip", "Vip") so map keys survive sources that
// normalise key case.
impl<'de> Deserialize<'de> for TicketClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One sellable (class, destination) combination and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub class: TicketClass,
    pub destination: String,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("{class} tickets are out of stock")]
    OutOfStock { class: TicketClass },

    #[error("{class} inventory would exceed {max}")]
    Overflow { class: TicketClass, max: u32 },
}

/// Seeded catalog entries plus the mutable stock counters.
///
/// Entries never change after construction; only the counters move, through
/// [`Catalog::consume`] and [`Catalog::restock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    stock: BTreeMap<TicketClass, u32>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>, stock: BTreeMap<TicketClass, u32>) -> Self {
        Self { entries, stock }
    }

    /// Seed every (class, destination) pair that has a price.
    pub fn seed(
        prices: &BTreeMap<TicketClass, Money>,
        destinations: &[String],
        stock: BTreeMap<TicketClass, u32>,
    ) -> Self {
        let entries = prices
            .iter()
            .flat_map(|(class, price)| {
                destinations.iter().map(move |destination| CatalogEntry {
                    class: *class,
                    destination: destination.clone(),
                    price: *price,
                })
            })
            .collect();

        Self::new(entries, stock)
    }

    pub fn lookup(&self, class: TicketClass, destination: &str) -> Option<&CatalogEntry> {
        let destination = destination.trim();
        self.entries
            .iter()
            .find(|entry| entry.class == class && entry.destination == destination)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn stock(&self, class: TicketClass) -> u32 {
        self.stock.get(&class).copied().unwrap_or(0)
    }

    pub fn stock_levels(&self) -> BTreeMap<TicketClass, u32> {
        TicketClass::ALL
            .into_iter()
            .map(|class| (class, self.stock(class)))
            .collect()
    }

    pub fn total_stock(&self) -> u32 {
        self.stock.values().fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Take one ticket of `class` off the stock, returning what remains.
    pub fn consume(&mut self, class: TicketClass) -> Result<u32, StockError> {
        match self.stock.get_mut(&class) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(*count)
            }
            _ => Err(StockError::OutOfStock { class }),
        }
    }

    pub fn restock(&mut self, class: TicketClass, count: u32) -> Result<u32, StockError> {
        let current = self.stock(class);
        let level = current.checked_add(count).ok_or(StockError::Overflow {
            class,
            max: u32::MAX,
        })?;
        self.stock.insert(class, level);
        Ok(level)
    }
}
