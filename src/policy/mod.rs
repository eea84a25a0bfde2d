//! Session policy applied to money insertion and idle sales.
//!
//! Checks use stillwater's `Validation`, so a rejected insertion reports
//! every rule it broke rather than only the first one.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use ticket_terminal::policy::{PolicyBuilder, ViolationStrategy};
//! use ticket_terminal::Money;
//!
//! let policy = PolicyBuilder::new()
//!     .max_insertion(Money::from_major(500))
//!     .idle_timeout(Duration::from_secs(120))
//!     .on_violation(ViolationStrategy::Reject)
//!     .build();
//!
//! assert_eq!(policy.max_insertion(), Some(Money::from_major(500)));
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use context::InsertionContext;
pub use rules::SessionPolicy;
pub use violations::{PolicyViolation, ViolationStrategy};
