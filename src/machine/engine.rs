//! The machine instance a host drives.

use crate::builder::BuildError;
use crate::core::{
    ChallengeKind, Event, EventKind, IdentifyState, MachineArgs, MachineContext, State,
    StateHistory, StateTransition,
};
use crate::effects::{self, PendingRequest};
use crate::enforcement::{self, ConfigViolation};
use crate::guards;
use crate::machine::{standard_table, TransitionTable};
use chrono::Utc;
use std::sync::Arc;

/// Upper bound on eventless hops after a single event.
const MAX_EVENTLESS_STEPS: usize = 16;

/// Outcome of a single `send`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// A row fired. `to` is the state the machine settled in, after any
    /// eventless rows that followed.
    Transitioned { from: IdentifyState, to: IdentifyState },

    /// No row in `state` matched the event; nothing changed.
    Ignored {
        state: IdentifyState,
        event: EventKind,
    },
}

impl StepResult {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}

/// One user's identification session.
///
/// Owns the context exclusively. Hosts read `state()` and `context()` to
/// render and call `send` to advance. Calls must be serialized; `send`
/// takes `&mut self` so the borrow checker enforces it within a process.
#[derive(Clone, Debug)]
pub struct IdentifyMachine {
    table: Arc<TransitionTable>,
    state: IdentifyState,
    context: MachineContext,
    history: StateHistory<IdentifyState>,
}

impl IdentifyMachine {
    /// Create a machine running the standard table.
    pub fn new(args: MachineArgs) -> Result<Self, BuildError> {
        Ok(Self::with_table(Arc::new(standard_table()?), args))
    }

    /// Create a machine running a custom table.
    pub fn with_table(table: Arc<TransitionTable>, args: MachineArgs) -> Self {
        let state = table.initial();
        let mut machine = Self {
            table,
            state,
            context: MachineContext::from(args),
            history: StateHistory::new(),
        };
        machine.settle();
        machine
    }

    /// Rebuild a machine from previously captured parts.
    ///
    /// No eventless rows run: the parts are taken as already settled.
    pub(crate) fn from_parts(
        table: Arc<TransitionTable>,
        state: IdentifyState,
        context: MachineContext,
        history: StateHistory<IdentifyState>,
    ) -> Self {
        Self {
            table,
            state,
            context,
            history,
        }
    }

    pub fn state(&self) -> IdentifyState {
        self.state
    }

    pub fn context(&self) -> &MachineContext {
        &self.context
    }

    pub fn history(&self) -> &StateHistory<IdentifyState> {
        &self.history
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    /// Token yielded by the flow, present only in `success`.
    pub fn auth_token(&self) -> Option<&str> {
        self.context.challenge.auth_token.as_deref()
    }

    /// Kinds to offer on the selection screen.
    pub fn usable_challenge_kinds(&self) -> Vec<ChallengeKind> {
        guards::usable_challenge_kinds(&self.context, None)
    }

    /// Why the configuration was rejected. Empty unless in `configInvalid`.
    pub fn config_violations(&self) -> Vec<ConfigViolation> {
        if self.state == IdentifyState::ConfigInvalid {
            enforcement::config_violations(&self.context)
        } else {
            Vec::new()
        }
    }

    /// Backend call the host should make next, if any.
    pub fn pending_request(&self) -> Option<PendingRequest> {
        effects::pending_request(self.state, &self.context)
    }

    /// Whether `event` would fire a row in the current state.
    pub fn can(&self, event: &Event) -> bool {
        self.table
            .resolve(self.state, &self.context, Some(event))
            .is_some()
    }

    /// Dispatch an event and run it to completion.
    ///
    /// Unmatched events are a no-op and leave state and context as they
    /// were.
    pub fn send(&mut self, event: Event) -> StepResult {
        let from = self.state;
        let kind = event.kind();

        let Some(transition) = self.table.resolve(from, &self.context, Some(&event)) else {
            tracing::debug!(state = %from, event = %kind, "event ignored");
            return StepResult::Ignored { state: from, event: kind };
        };

        let to = transition.to;
        let context = transition.apply(self.context.clone(), Some(&event));
        self.enter(to, context, Some(kind));
        self.settle();

        StepResult::Transitioned {
            from,
            to: self.state,
        }
    }

    /// Follow eventless rows until none fires.
    fn settle(&mut self) {
        for _ in 0..MAX_EVENTLESS_STEPS {
            let Some(transition) = self.table.resolve(self.state, &self.context, None) else {
                return;
            };
            let to = transition.to;
            self.enter(to, self.context.clone(), None);
        }
        tracing::warn!(state = %self.state, "eventless transitions did not settle");
    }

    fn enter(&mut self, to: IdentifyState, context: MachineContext, event: Option<EventKind>) {
        let from = self.state;
        self.history = self.history.record(StateTransition {
            from,
            to,
            event,
            timestamp: Utc::now(),
        });
        self.state = to;
        self.context = context;

        if from != to {
            tracing::debug!(from = %from, to = %to, event = ?event, "transitioned");
        }
        match to {
            IdentifyState::ConfigInvalid if from != to => {
                let violations = enforcement::config_violations(&self.context);
                tracing::warn!(?violations, "onboarding configuration rejected");
            }
            IdentifyState::Success if from != to => {
                tracing::info!("identification completed");
            }
            _ => {}
        }
    }
}
