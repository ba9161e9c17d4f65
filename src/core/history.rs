//! Transition log.
//!
//! History is diagnostic only: routing decisions are always re-derived
//! from the current context, never from where the flow has been.

use super::event::EventKind;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single settled transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    pub from: S,
    pub to: S,
    /// Triggering event, `None` for eventless transitions.
    pub event: Option<EventKind>,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only history of transitions.
///
/// # Example
///
/// ```rust
/// use identify_flow::core::{EventKind, IdentifyState, StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new().record(StateTransition {
///     from: IdentifyState::EmailIdentification,
///     to: IdentifyState::SmsChallenge,
///     event: Some(EventKind::Identified),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&IdentifyState::EmailIdentification, &IdentifyState::SmsChallenge]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The receiver is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Number of times `state` was entered.
    pub fn visits(&self, state: &S) -> usize {
        self.transitions.iter().filter(|t| &t.to == state).count()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IdentifyState;

    fn step(
        from: IdentifyState,
        to: IdentifyState,
        event: Option<EventKind>,
    ) -> StateTransition<IdentifyState> {
        StateTransition {
            from,
            to,
            event,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<IdentifyState> = StateHistory::new();
        assert!(history.transitions().is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let next = history.record(step(
            IdentifyState::Init,
            IdentifyState::EmailIdentification,
            None,
        ));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(next.transitions().len(), 1);
    }

    #[test]
    fn path_and_visits_follow_recorded_order() {
        let history = StateHistory::new()
            .record(step(
                IdentifyState::EmailIdentification,
                IdentifyState::PhoneIdentification,
                Some(EventKind::Identified),
            ))
            .record(step(
                IdentifyState::PhoneIdentification,
                IdentifyState::EmailIdentification,
                Some(EventKind::NavigatedToPrevPage),
            ));

        assert_eq!(
            history.get_path(),
            vec![
                &IdentifyState::EmailIdentification,
                &IdentifyState::PhoneIdentification,
                &IdentifyState::EmailIdentification,
            ]
        );
        assert_eq!(history.visits(&IdentifyState::EmailIdentification), 1);
        assert_eq!(
            history.last().and_then(|t| t.event),
            Some(EventKind::NavigatedToPrevPage)
        );
    }

    #[test]
    fn single_transition_has_zero_duration() {
        let history = StateHistory::new().record(step(
            IdentifyState::Init,
            IdentifyState::InitBootstrap,
            None,
        ));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(step(
            IdentifyState::SmsChallenge,
            IdentifyState::Success,
            Some(EventKind::ChallengeSucceeded),
        ));

        let json = serde_json::to_string(&history).unwrap();
        let restored: StateHistory<IdentifyState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history, restored);
    }
}
