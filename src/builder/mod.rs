//! Builder API for assembling a terminal.
//!
//! [`TerminalBuilder`] starts from a configuration (or from scratch) and
//! lets code override any part of it before validation. The
//! [`machine_states!`](crate::machine_states) macro declares state enums
//! with their classification in one place.

pub mod error;
pub mod macros;
pub mod terminal;

pub use error::BuildError;
pub use terminal::TerminalBuilder;
