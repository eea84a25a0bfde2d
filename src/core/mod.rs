//! Core state machine types.
//!
//! - State classification via the `State` trait
//! - Guards that gate operations by state identity
//! - Bounded history of committed transitions
//!
//! Nothing in this module touches money or tickets.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{Cause, StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
