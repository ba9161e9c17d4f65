//! Ordered transition table.

use crate::core::{Event, EventKind, IdentifyState, MachineContext};
use crate::machine::Transition;

/// Ordered list of guarded rows.
///
/// For a given state and event the rows are evaluated top to bottom and
/// the first passing guard wins. Resolution is a pure function of
/// `(state, context, event)`.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    initial: IdentifyState,
    transitions: Vec<Transition>,
}

impl TransitionTable {
    pub(crate) fn new(initial: IdentifyState, transitions: Vec<Transition>) -> Self {
        Self {
            initial,
            transitions,
        }
    }

    pub fn initial(&self) -> IdentifyState {
        self.initial
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// First row that fires for `event` (or eventlessly when `None`).
    pub fn resolve(
        &self,
        state: IdentifyState,
        context: &MachineContext,
        event: Option<&Event>,
    ) -> Option<&Transition> {
        let trigger = event.map(Event::kind);
        self.transitions
            .iter()
            .filter(|t| t.matches(state, trigger))
            .find(|t| {
                let passed = t.guard.as_ref().map_or(true, |g| g.check(context, event));
                tracing::trace!(
                    state = %state,
                    guard = t.guard_name(),
                    to = %t.to,
                    passed,
                    "guard evaluated"
                );
                passed
            })
    }

    /// Target state and new context for `event`, or `None` when no row
    /// fires. Does not follow eventless rows in the target state.
    pub fn next(
        &self,
        state: IdentifyState,
        context: &MachineContext,
        event: &Event,
    ) -> Option<(IdentifyState, MachineContext)> {
        self.resolve(state, context, Some(event))
            .map(|t| (t.to, t.apply(context.clone(), Some(event))))
    }

    /// Whether any row in `state` listens for `kind`.
    pub fn handles(&self, state: IdentifyState, kind: EventKind) -> bool {
        self.transitions.iter().any(|t| t.matches(state, Some(kind)))
    }

    /// Event kinds `state` listens for, in table order without duplicates.
    pub fn accepted_events(&self, state: IdentifyState) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        for kind in self
            .transitions
            .iter()
            .filter(|t| t.from == state)
            .filter_map(|t| t.on)
        {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Possible targets of `kind` in `state`, in evaluation order.
    pub fn targets(&self, state: IdentifyState, kind: EventKind) -> Vec<IdentifyState> {
        self.transitions
            .iter()
            .filter(|t| t.matches(state, Some(kind)))
            .map(|t| t.to)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TableBuilder, TransitionBuilder};

    fn table() -> TransitionTable {
        TableBuilder::new()
            .initial(IdentifyState::EmailIdentification)
            .transition(
                TransitionBuilder::new()
                    .from(IdentifyState::SmsChallenge)
                    .on(EventKind::NavigatedToPrevPage)
                    .to(IdentifyState::PhoneIdentification)
                    .when("hasPhone", |ctx, _| ctx.identify.phone_number.is_some()),
            )
            .and_then(|b| {
                b.transition(
                    TransitionBuilder::new()
                        .from(IdentifyState::SmsChallenge)
                        .on(EventKind::NavigatedToPrevPage)
                        .to(IdentifyState::EmailIdentification),
                )
            })
            .and_then(TableBuilder::build)
            .unwrap()
    }

    #[test]
    fn first_passing_guard_wins() {
        let table = table();
        let mut ctx = MachineContext::default();
        let back = Event::NavigatedToPrevPage;

        let row = table.resolve(IdentifyState::SmsChallenge, &ctx, Some(&back));
        assert_eq!(row.map(|t| t.to), Some(IdentifyState::EmailIdentification));

        ctx.identify.phone_number = Some("+1555".into());
        let row = table.resolve(IdentifyState::SmsChallenge, &ctx, Some(&back));
        assert_eq!(row.map(|t| t.to), Some(IdentifyState::PhoneIdentification));
    }

    #[test]
    fn unmatched_event_resolves_to_none() {
        let table = table();
        let ctx = MachineContext::default();

        assert!(table
            .next(IdentifyState::SmsChallenge, &ctx, &Event::IdentifyReset)
            .is_none());
        assert!(table
            .next(
                IdentifyState::EmailIdentification,
                &ctx,
                &Event::NavigatedToPrevPage
            )
            .is_none());
    }

    #[test]
    fn introspection_lists_rows_in_order() {
        let table = table();

        assert!(table.handles(IdentifyState::SmsChallenge, EventKind::NavigatedToPrevPage));
        assert_eq!(
            table.accepted_events(IdentifyState::SmsChallenge),
            vec![EventKind::NavigatedToPrevPage]
        );
        assert_eq!(
            table.targets(IdentifyState::SmsChallenge, EventKind::NavigatedToPrevPage),
            vec![
                IdentifyState::PhoneIdentification,
                IdentifyState::EmailIdentification
            ]
        );
    }
}
