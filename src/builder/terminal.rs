//! Fluent construction of a [`Terminal`].

use crate::builder::error::BuildError;
use crate::catalog::TicketClass;
use crate::clock::{Clock, SystemClock};
use crate::config::TerminalConfig;
use crate::machine::{Ledger, TransactionState};
use crate::money::Money;
use crate::policy::SessionPolicy;
use crate::terminal::Terminal;
use std::collections::BTreeMap;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::info;

/// Builder for terminals with a fluent API.
///
/// # Example
///
/// ```rust
/// use ticket_terminal::{Money, TerminalBuilder, TicketClass};
///
/// let terminal = TerminalBuilder::new()
///     .price(TicketClass::Adult, Money::from_major(3))
///     .destinations(["Harbour", "Old Town"])
///     .stock(TicketClass::Adult, 25)
///     .available_change(Money::from_major(40))
///     .build()
///     .unwrap();
///
/// assert_eq!(terminal.status().inventory_count, 25);
/// ```
pub struct TerminalBuilder {
    config: TerminalConfig,
    policy: Option<SessionPolicy>,
    clock: Option<Arc<dyn Clock>>,
}

impl TerminalBuilder {
    /// Start with no prices, destinations, stock or change.
    pub fn new() -> Self {
        Self::from_config(TerminalConfig {
            prices: BTreeMap::new(),
            destinations: Vec::new(),
            inventory: BTreeMap::new(),
            available_change: Money::ZERO,
            ..TerminalConfig::default()
        })
    }

    /// Start from the stock machine: five classes, five destinations.
    pub fn with_defaults() -> Self {
        Self::from_config(TerminalConfig::default())
    }

    pub fn from_config(config: TerminalConfig) -> Self {
        Self {
            config,
            policy: None,
            clock: None,
        }
    }

    pub fn price(mut self, class: TicketClass, price: Money) -> Self {
        self.config.prices.insert(class, price);
        self
    }

    /// Replace the destination list.
    pub fn destinations<I, D>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.config.destinations = destinations.into_iter().map(Into::into).collect();
        self
    }

    /// Replace every stock level; classes left out start empty.
    pub fn inventory(mut self, inventory: BTreeMap<TicketClass, u32>) -> Self {
        self.config.inventory = inventory;
        self
    }

    pub fn stock(mut self, class: TicketClass, count: u32) -> Self {
        self.config.inventory.insert(class, count);
        self
    }

    pub fn available_change(mut self, amount: Money) -> Self {
        self.config.available_change = amount;
        self
    }

    pub fn validity_minutes(mut self, minutes: u32) -> Self {
        self.config.ticket_validity_minutes = minutes;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Use `policy` instead of the one described by the configuration.
    pub fn policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Validate the settings and build the terminal in `Idle`.
    pub fn build(self) -> Result<Terminal, BuildError> {
        if let Validation::Failure(issues) = self.config.validate() {
            return Err(BuildError::InvalidSettings(issues.iter().cloned().collect()));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let policy = self.policy.unwrap_or_else(|| self.config.to_policy());
        let catalog = self.config.catalog();

        info!(
            entries = catalog.entries().len(),
            tickets = catalog.total_stock(),
            change = %self.config.available_change,
            "Terminal ready"
        );

        let ledger = Ledger {
            transaction: TransactionState::new(clock.now()),
            catalog,
            available_change: self.config.available_change,
            validity: self.config.validity(),
        };

        Ok(Terminal::from_parts(
            ledger,
            policy,
            self.config.history_limit,
            clock,
        ))
    }
}

impl Default for TerminalBuilder {
    fn default() -> Self {
        Self::new()
    }
}
