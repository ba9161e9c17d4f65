//! A single row of the transition table.

use crate::actions::Action;
use crate::core::{Event, EventKind, Guard, IdentifyState, MachineContext};

/// Guarded move from one state to another.
///
/// `on == None` marks an eventless row, evaluated whenever the machine
/// settles in `from`.
#[derive(Clone, Debug)]
pub struct Transition {
    pub from: IdentifyState,
    pub on: Option<EventKind>,
    pub to: IdentifyState,
    pub guard: Option<Guard>,
    pub actions: Vec<Action>,
}

impl Transition {
    /// Whether this row is keyed on `state` and `trigger`.
    pub fn matches(&self, state: IdentifyState, trigger: Option<EventKind>) -> bool {
        self.from == state && self.on == trigger
    }

    /// Check if this row can fire (pure).
    pub fn can_execute(
        &self,
        state: IdentifyState,
        context: &MachineContext,
        event: Option<&Event>,
    ) -> bool {
        if !self.matches(state, event.map(Event::kind)) {
            return false;
        }

        self.guard.as_ref().map_or(true, |g| g.check(context, event))
    }

    /// Run the actions in order. Eventless rows carry none.
    pub fn apply(&self, context: MachineContext, event: Option<&Event>) -> MachineContext {
        match event {
            Some(event) => self
                .actions
                .iter()
                .fold(context, |ctx, action| action.apply(ctx, event)),
            None => context,
        }
    }

    pub fn is_eventless(&self) -> bool {
        self.on.is_none()
    }

    pub fn guard_name(&self) -> &'static str {
        self.guard.as_ref().map_or("always", Guard::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{assign_email, assign_phone};

    fn row(guard: Option<Guard>) -> Transition {
        Transition {
            from: IdentifyState::InitBootstrap,
            on: Some(EventKind::IdentifyFailed),
            to: IdentifyState::SmsChallenge,
            guard,
            actions: vec![
                Action::new("assignEmail", assign_email),
                Action::new("assignPhone", assign_phone),
            ],
        }
    }

    #[test]
    fn can_execute_matches_state_and_event() {
        let transition = row(None);
        let ctx = MachineContext::default();
        let failed = Event::IdentifyFailed {
            email: None,
            phone_number: None,
        };

        assert!(transition.can_execute(IdentifyState::InitBootstrap, &ctx, Some(&failed)));
        assert!(!transition.can_execute(IdentifyState::EmailIdentification, &ctx, Some(&failed)));
        assert!(!transition.can_execute(
            IdentifyState::InitBootstrap,
            &ctx,
            Some(&Event::IdentifyReset)
        ));
        assert!(!transition.can_execute(IdentifyState::InitBootstrap, &ctx, None));
    }

    #[test]
    fn can_execute_respects_guard() {
        let transition = row(Some(Guard::context("never", |_| false)));
        let failed = Event::IdentifyFailed {
            email: None,
            phone_number: None,
        };

        assert!(!transition.can_execute(
            IdentifyState::InitBootstrap,
            &MachineContext::default(),
            Some(&failed)
        ));
        assert_eq!(transition.guard_name(), "never");
    }

    #[test]
    fn apply_runs_actions_in_order() {
        let transition = row(None);
        let event = Event::IdentifyFailed {
            email: Some("a@b.com".into()),
            phone_number: Some("+1555".into()),
        };

        let ctx = transition.apply(MachineContext::default(), Some(&event));

        assert_eq!(ctx.identify.email.as_deref(), Some("a@b.com"));
        assert_eq!(ctx.identify.phone_number.as_deref(), Some("+1555"));
    }

    #[test]
    fn eventless_apply_leaves_context_untouched() {
        let transition = Transition {
            from: IdentifyState::Init,
            on: None,
            to: IdentifyState::EmailIdentification,
            guard: None,
            actions: Vec::new(),
        };
        let ctx = MachineContext::default();

        assert!(transition.is_eventless());
        assert_eq!(transition.apply(ctx.clone(), None), ctx);
        assert_eq!(transition.guard_name(), "always");
    }
}
