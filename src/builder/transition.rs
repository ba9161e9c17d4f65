//! Builder for transition rows.

use crate::actions::Action;
use crate::builder::error::BuildError;
use crate::core::{Event, EventKind, Guard, IdentifyState, MachineContext};
use crate::machine::Transition;

#[derive(Clone, Copy, Debug)]
enum Trigger {
    Always,
    On(EventKind),
}

#[derive(Clone, Copy, Debug)]
enum Target {
    State(IdentifyState),
    Stay,
}

/// Builder for transitions with a fluent API.
///
/// One builder may cover several source states; `build` expands it into
/// one row per source, keeping the source order.
///
/// # Example
///
/// ```rust
/// use identify_flow::actions::{assign_challenge_data, Action};
/// use identify_flow::builder::TransitionBuilder;
/// use identify_flow::core::{EventKind, IdentifyState};
///
/// let rows = TransitionBuilder::new()
///     .from_each(IdentifyState::CHALLENGES)
///     .on(EventKind::ChallengeReceived)
///     .stay()
///     .action(Action::new("assignChallengeData", assign_challenge_data))
///     .build()
///     .unwrap();
///
/// assert_eq!(rows.len(), 3);
/// assert!(rows.iter().all(|t| t.from == t.to));
/// ```
#[derive(Default)]
pub struct TransitionBuilder {
    from: Vec<IdentifyState>,
    trigger: Option<Trigger>,
    target: Option<Target>,
    guard: Option<Guard>,
    actions: Vec<Action>,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source state (required).
    pub fn from(mut self, state: IdentifyState) -> Self {
        self.from.push(state);
        self
    }

    /// Add several source states.
    pub fn from_each(mut self, states: impl IntoIterator<Item = IdentifyState>) -> Self {
        self.from.extend(states);
        self
    }

    /// Fire on an event.
    pub fn on(mut self, event: EventKind) -> Self {
        self.trigger = Some(Trigger::On(event));
        self
    }

    /// Fire without an event as soon as the source state is entered.
    pub fn always(mut self) -> Self {
        self.trigger = Some(Trigger::Always);
        self
    }

    /// Set the target state.
    pub fn to(mut self, state: IdentifyState) -> Self {
        self.target = Some(Target::State(state));
        self
    }

    /// Target the source state itself.
    pub fn stay(mut self) -> Self {
        self.target = Some(Target::Stay);
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, name: &'static str, predicate: F) -> Self
    where
        F: Fn(&MachineContext, Option<&Event>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(name, predicate));
        self
    }

    /// Append an action. Actions run in the order they are added.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn build(self) -> Result<Vec<Transition>, BuildError> {
        if self.from.is_empty() {
            return Err(BuildError::MissingFromState);
        }
        let trigger = self.trigger.ok_or(BuildError::MissingTrigger)?;
        let target = self.target.ok_or(BuildError::MissingTarget)?;

        self.from
            .iter()
            .map(|&from| {
                let to = match target {
                    Target::State(state) => state,
                    Target::Stay => from,
                };
                let on = match trigger {
                    Trigger::On(kind) => Some(kind),
                    Trigger::Always if to == from => {
                        return Err(BuildError::EventlessSelfLoop { state: from })
                    }
                    Trigger::Always if !self.actions.is_empty() => {
                        return Err(BuildError::ActionOnEventless { state: from })
                    }
                    Trigger::Always => None,
                };
                Ok(Transition {
                    from,
                    on,
                    to,
                    guard: self.guard.clone(),
                    actions: self.actions.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::reset;

    #[test]
    fn builder_validates_required_fields() {
        let result = TransitionBuilder::new().on(EventKind::IdentifyReset).build();
        assert!(matches!(result, Err(BuildError::MissingFromState)));

        let result = TransitionBuilder::new()
            .from(IdentifyState::SmsChallenge)
            .to(IdentifyState::EmailIdentification)
            .build();
        assert!(matches!(result, Err(BuildError::MissingTrigger)));

        let result = TransitionBuilder::new()
            .from(IdentifyState::SmsChallenge)
            .on(EventKind::IdentifyReset)
            .build();
        assert!(matches!(result, Err(BuildError::MissingTarget)));
    }

    #[test]
    fn eventless_rows_cannot_loop_or_act() {
        let result = TransitionBuilder::new()
            .from(IdentifyState::Init)
            .always()
            .stay()
            .build();
        assert_eq!(
            result.err(),
            Some(BuildError::EventlessSelfLoop {
                state: IdentifyState::Init
            })
        );

        let result = TransitionBuilder::new()
            .from(IdentifyState::Init)
            .always()
            .to(IdentifyState::EmailIdentification)
            .action(Action::new("reset", reset))
            .build();
        assert_eq!(
            result.err(),
            Some(BuildError::ActionOnEventless {
                state: IdentifyState::Init
            })
        );
    }

    #[test]
    fn from_each_expands_in_order() {
        let rows = TransitionBuilder::new()
            .from_each([IdentifyState::SmsChallenge, IdentifyState::EmailChallenge])
            .on(EventKind::IdentifyReset)
            .to(IdentifyState::EmailIdentification)
            .action(Action::new("reset", reset))
            .build()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].from, IdentifyState::SmsChallenge);
        assert_eq!(rows[1].from, IdentifyState::EmailChallenge);
        assert!(rows
            .iter()
            .all(|t| t.to == IdentifyState::EmailIdentification && t.actions.len() == 1));
    }

    #[test]
    fn guarded_row_respects_guard() {
        let rows = TransitionBuilder::new()
            .from(IdentifyState::PhoneIdentification)
            .on(EventKind::NavigatedToPrevPage)
            .to(IdentifyState::EmailIdentification)
            .when("hasEmail", |ctx, _| ctx.identify.email.is_some())
            .build()
            .unwrap();
        let row = &rows[0];
        let mut ctx = MachineContext::default();
        let event = Event::NavigatedToPrevPage;

        assert!(!row.can_execute(IdentifyState::PhoneIdentification, &ctx, Some(&event)));
        ctx.identify.email = Some("a@b.com".into());
        assert!(row.can_execute(IdentifyState::PhoneIdentification, &ctx, Some(&event)));
        assert!(!row.can_execute(IdentifyState::SmsChallenge, &ctx, Some(&event)));
    }
}
