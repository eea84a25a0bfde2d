//! Guards: pure predicates over state identity.
//!
//! A guard answers "is this intent legal right now" from the current state
//! alone. It never looks at transaction data; amount checks and stock checks
//! belong to the handler that runs after the guard passed.

use super::state::State;

/// Set of states in which an operation is permitted.
///
/// # Example
///
/// ```rust
/// use ticket_terminal::core::Guard;
/// use ticket_terminal::MachineState;
///
/// let insert_money = Guard::allowing(&[
///     MachineState::WaitingForMoney,
///     MachineState::PartialMoneyReceived,
/// ]);
///
/// assert!(insert_money.check(&MachineState::WaitingForMoney));
/// assert!(!insert_money.check(&MachineState::Idle));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard<S: State> {
    allowed: &'static [S],
}

impl<S: State> Guard<S> {
    /// Guard that permits exactly the listed states.
    pub const fn allowing(allowed: &'static [S]) -> Self {
        Self { allowed }
    }

    pub fn check(&self, state: &S) -> bool {
        self.allowed.contains(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Busy,
        Broken,
    }

    impl State for TestState {
        fn name(&self) -> &'static str {
            match self {
                Self::Idle => "Idle",
                Self::Busy => "Busy",
                Self::Broken => "Broken",
            }
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Broken)
        }
    }

    const START: Guard<TestState> = Guard::allowing(&[TestState::Idle]);

    #[test]
    fn guard_allows_listed_states() {
        assert!(START.check(&TestState::Idle));
        assert!(!START.check(&TestState::Busy));
        assert!(!START.check(&TestState::Broken));
    }

    #[test]
    fn empty_guard_blocks_everything() {
        let guard: Guard<TestState> = Guard::allowing(&[]);
        assert!(!guard.check(&TestState::Idle));
        assert!(!guard.check(&TestState::Broken));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::allowing(&[TestState::Idle, TestState::Busy]);
        for state in [TestState::Idle, TestState::Busy, TestState::Broken] {
            assert_eq!(guard.check(&state), guard.check(&state));
        }
    }
}
