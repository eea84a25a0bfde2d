//! # Terminal configuration
//!
//! Settings are layered with the `config` crate:
//!
//! 1. built-in defaults (the stock five-class, five-destination machine),
//! 2. an optional YAML or TOML file, named explicitly or through
//!    `TICKET_TERMINAL_CONFIG`,
//! 3. environment variables such as `TICKET_TERMINAL__AVAILABLE_CHANGE=250`.
//!
//! A table given by a later layer (`prices`, `inventory`) replaces the
//! default table as a whole. Validation accumulates every problem instead of
//! stopping at the first one.
//!
//! ```rust
//! use ticket_terminal::config::TerminalConfig;
//! use ticket_terminal::{Money, TicketClass};
//!
//! let config = TerminalConfig::from_yaml_str(
//!     "available_change: 50\ndestinations: [Center, Harbour]\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.available_change, Money::from_major(50));
//! assert_eq!(config.prices[&TicketClass::Vip], Money::from_major(200));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigIssue, ConfigResult};

use crate::catalog::{Catalog, TicketClass};
use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::money::Money;
use crate::policy::{PolicyBuilder, SessionPolicy, ViolationStrategy};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Names a config file to load on top of the defaults.
pub const CONFIG_PATH_ENV_VAR: &str = "TICKET_TERMINAL_CONFIG";
pub const ENV_PREFIX: &str = "TICKET_TERMINAL";

pub const DEFAULT_AVAILABLE_CHANGE: Money = Money::from_major(500);
pub const DEFAULT_STOCK_PER_CLASS: u32 = 10;
pub const DEFAULT_VALIDITY_MINUTES: u32 = 120;
pub const DEFAULT_DESTINATIONS: [&str; 5] = ["Center", "Airport", "Station", "Stadium", "Theater"];

/// Everything needed to stand up a terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub prices: BTreeMap<TicketClass, Money>,
    pub destinations: Vec<String>,
    pub inventory: BTreeMap<TicketClass, u32>,
    pub available_change: Money,
    pub ticket_validity_minutes: u32,
    pub history_limit: usize,
    pub policy: PolicyConfig,
}

/// Serializable form of a [`SessionPolicy`]. Custom checks can only be
/// added in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub max_insertion: Option<Money>,
    pub idle_timeout_seconds: Option<u64>,
    /// Log violations instead of rejecting the insertion.
    pub warn_only: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        let prices = BTreeMap::from([
            (TicketClass::Adult, Money::from_major(100)),
            (TicketClass::Child, Money::from_major(50)),
            (TicketClass::Student, Money::from_major(70)),
            (TicketClass::Senior, Money::from_major(80)),
            (TicketClass::Vip, Money::from_major(200)),
        ]);

        Self {
            prices,
            destinations: DEFAULT_DESTINATIONS.iter().map(|d| d.to_string()).collect(),
            inventory: TicketClass::ALL
                .into_iter()
                .map(|class| (class, DEFAULT_STOCK_PER_CLASS))
                .collect(),
            available_change: DEFAULT_AVAILABLE_CHANGE,
            ticket_validity_minutes: DEFAULT_VALIDITY_MINUTES,
            history_limit: DEFAULT_HISTORY_LIMIT,
            policy: PolicyConfig::default(),
        }
    }
}

impl TerminalConfig {
    /// Load from `TICKET_TERMINAL_CONFIG` (if set) and the environment.
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV_VAR).ok();
        Self::load_from(path.as_deref().map(Path::new))
    }

    /// Load from an optional file plus the environment, then validate.
    pub fn load_from(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading terminal configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    /// Parse YAML text (no environment overrides), then validate.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    fn validated(self) -> ConfigResult<Self> {
        match self.validate() {
            Validation::Success(()) => Ok(self),
            Validation::Failure(issues) => Err(ConfigError::Invalid(issues.iter().cloned().collect())),
        }
    }

    /// Check every setting, reporting all problems at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigIssue>>> = Vec::new();

        if self.prices.is_empty() {
            checks.push(Validation::fail(ConfigIssue::NoPrices));
        }
        for (class, price) in &self.prices {
            if !price.is_positive() {
                checks.push(Validation::fail(ConfigIssue::NonPositivePrice {
                    class: *class,
                    price: *price,
                }));
            }
        }

        if self.destinations.is_empty() {
            checks.push(Validation::fail(ConfigIssue::NoDestinations));
        }
        let mut seen = BTreeSet::new();
        for (index, destination) in self.destinations.iter().enumerate() {
            let name = destination.trim();
            if name.is_empty() {
                checks.push(Validation::fail(ConfigIssue::BlankDestination { index }));
            } else if !seen.insert(name) {
                checks.push(Validation::fail(ConfigIssue::DuplicateDestination {
                    name: name.to_string(),
                }));
            }
        }

        if self.available_change < Money::ZERO {
            checks.push(Validation::fail(ConfigIssue::NegativeChange {
                amount: self.available_change,
            }));
        }
        if self.ticket_validity_minutes == 0 {
            checks.push(Validation::fail(ConfigIssue::ZeroValidity));
        }
        if self.history_limit == 0 {
            checks.push(Validation::fail(ConfigIssue::ZeroHistoryLimit));
        }
        if let Some(amount) = self.policy.max_insertion {
            if !amount.is_positive() {
                checks.push(Validation::fail(ConfigIssue::NonPositiveMaxInsertion { amount }));
            }
        }
        if self.policy.idle_timeout_seconds == Some(0) {
            checks.push(Validation::fail(ConfigIssue::ZeroIdleTimeout));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.ticket_validity_minutes))
    }

    /// Catalog with every priced class offered to every destination.
    pub fn catalog(&self) -> Catalog {
        let destinations: Vec<String> = self
            .destinations
            .iter()
            .map(|d| d.trim().to_string())
            .collect();
        Catalog::seed(&self.prices, &destinations, self.inventory.clone())
    }

    pub fn to_policy(&self) -> SessionPolicy {
        self.policy.to_policy()
    }
}

impl PolicyConfig {
    pub fn to_policy(&self) -> SessionPolicy {
        let mut builder = PolicyBuilder::new();
        if let Some(max) = self.max_insertion {
            builder = builder.max_insertion(max);
        }
        if let Some(secs) = self.idle_timeout_seconds {
            builder = builder.idle_timeout(Duration::from_secs(secs));
        }
        if self.warn_only {
            builder = builder.on_violation(ViolationStrategy::WarnOnly);
        }
        builder.build()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("destinations")
        .try_parsing(true)
}
