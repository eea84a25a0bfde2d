//! Ticket Terminal: the state machine of a self-service ticket-vending
//! terminal.
//!
//! A customer selects a ticket (class and destination), inserts money,
//! receives the ticket and any change, or cancels for a refund. An operator
//! can take the terminal into maintenance to restock tickets and refill the
//! change pool.
//!
//! # Core Concepts
//!
//! - **States**: twelve [`MachineState`]s; exactly one is active.
//! - **Intents**: every operation is an [`Intent`] whose guard depends only
//!   on the current state. A refused guard mutates nothing.
//! - **Ledger**: inserted money, the selected and issued ticket, per-class
//!   stock and the change pool, all in exact [`Money`].
//! - **History**: every committed transition, pass-through states included.
//! - **Policy**: optional insertion limit and idle timeout, checked with
//!   stillwater's accumulating `Validation`.
//!
//! The core never prints; it emits `tracing` events. Call
//! [`logging::init_logging`] to see them.
//!
//! # Example
//!
//! ```rust
//! use ticket_terminal::{MachineState, Money, Rejection, TerminalBuilder, TicketClass};
//!
//! let mut terminal = TerminalBuilder::with_defaults().build().unwrap();
//!
//! terminal.select_ticket(TicketClass::Vip, "Stadium").unwrap();
//! terminal.insert_money(Money::from_major(250)).unwrap();
//! terminal.dispense_ticket().unwrap();
//!
//! assert_eq!(terminal.dispense_change().unwrap(), Money::from_major(50));
//! assert_eq!(terminal.dispense_change(), Err(Rejection::NoChangeOwed));
//! assert_eq!(terminal.state(), MachineState::ChangeDispensed);
//! ```

pub mod builder;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod machine;
pub mod money;
pub mod policy;
pub mod terminal;
pub mod ticket;

pub use builder::{BuildError, TerminalBuilder};
pub use catalog::{Catalog, CatalogEntry, TicketClass};
pub use config::{ConfigError, TerminalConfig};
pub use error::{Rejection, TerminalResult};
pub use machine::{Command, Intent, MachineState};
pub use money::{Money, MoneyError};
pub use terminal::{SharedTerminal, Terminal, TerminalStatus};
pub use ticket::{IssuedTicket, SelectedTicket, TicketNumber};
