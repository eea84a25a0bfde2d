//! State transition history tracking.
//!
//! Every committed transition, including transient pass-through states, is
//! kept in a bounded log. Inspecting the log never changes it.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::Duration;

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// What triggered a transition (an intent tag, a timer, an operator).
pub trait Cause:
    Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
}

impl<T> Cause for T where
    T: Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
}

/// Record of a single state transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, C: Cause> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// What caused the move
    pub cause: C,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// Once `limit` entries are stored the oldest entry is evicted for each new
/// one; `evicted()` counts how many were dropped.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use ticket_terminal::core::{StateHistory, StateTransition};
/// use ticket_terminal::{Intent, MachineState};
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(StateTransition {
///     from: MachineState::Idle,
///     to: MachineState::WaitingForMoney,
///     cause: Intent::SelectTicket,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(
///     history.get_path(),
///     vec![&MachineState::Idle, &MachineState::WaitingForMoney]
/// );
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, C: Cause> {
    transitions: VecDeque<StateTransition<S, C>>,
    limit: usize,
    evicted: u64,
}

impl<S: State, C: Cause> Default for StateHistory<S, C> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl<S: State, C: Cause> StateHistory<S, C> {
    /// Create an empty history keeping at most `limit` entries (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
            evicted: 0,
        }
    }

    pub fn record(&mut self, transition: StateTransition<S, C>) {
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
            self.evicted += 1;
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the first retained `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the first and last retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S, C>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S, C>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    enum TestState {
        Ready,
        Printing,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &'static str {
            match self {
                Self::Ready => "Ready",
                Self::Printing => "Printing",
                Self::Done => "Done",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    enum TestCause {
        Start,
        Finish,
    }

    fn transition(from: TestState, to: TestState, cause: TestCause) -> StateTransition<TestState, TestCause> {
        StateTransition {
            from,
            to,
            cause,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState, TestCause> = StateHistory::default();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::default();
        history.record(transition(TestState::Ready, TestState::Printing, TestCause::Start));
        history.record(transition(TestState::Printing, TestState::Done, TestCause::Finish));

        assert_eq!(
            history.get_path(),
            vec![&TestState::Ready, &TestState::Printing, &TestState::Done]
        );
        assert_eq!(history.last().unwrap().cause, TestCause::Finish);
    }

    #[test]
    fn oldest_entries_are_evicted_past_limit() {
        let mut history = StateHistory::with_limit(2);
        history.record(transition(TestState::Ready, TestState::Printing, TestCause::Start));
        history.record(transition(TestState::Printing, TestState::Done, TestCause::Finish));
        history.record(transition(TestState::Done, TestState::Ready, TestCause::Start));

        assert_eq!(history.len(), 2);
        assert_eq!(history.evicted(), 1);
        assert_eq!(history.get_path()[0], &TestState::Printing);
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let mut history = StateHistory::with_limit(0);
        history.record(transition(TestState::Ready, TestState::Printing, TestCause::Start));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut history = StateHistory::default();
        history.record(StateTransition {
            from: TestState::Ready,
            to: TestState::Printing,
            cause: TestCause::Start,
            timestamp: start,
        });
        history.record(StateTransition {
            from: TestState::Printing,
            to: TestState::Done,
            cause: TestCause::Finish,
            timestamp: start + chrono::Duration::milliseconds(250),
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::with_limit(4);
        history.record(transition(TestState::Ready, TestState::Printing, TestCause::Start));

        let json = serde_json::to_string(&history).unwrap();
        let back: StateHistory<TestState, TestCause> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back.limit(), 4);
        assert_eq!(back.last(), history.last());
    }
}
