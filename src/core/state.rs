//! The `State` trait shared by every state enum in the crate.
//!
//! State methods are pure: they classify a state by identity alone and never
//! look at transaction data.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Copy` + `Eq`: states are plain tags, compared and copied freely
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in status reports and history
///
/// # Example
///
/// ```rust
/// use ticket_terminal::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closing,
///     Jammed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Open => "Open",
///             Self::Closing => "Closing",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn is_transient(&self) -> bool {
///         matches!(self, Self::Closing)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert!(Door::Jammed.is_error());
/// assert!(!Door::Open.is_final());
/// ```
pub trait State:
    Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// The state's name for display and logging.
    fn name(&self) -> &'static str;

    /// Final states end a sale; the next sale starts from a reset.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Error states require explicit recovery.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Transient states are only passed through inside one operation.
    ///
    /// Default implementation returns `false`.
    fn is_transient(&self) -> bool {
        false
    }
}
