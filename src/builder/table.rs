//! Builder for transition tables.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::IdentifyState;
use crate::machine::{Transition, TransitionTable};

/// Builder for an ordered transition table.
///
/// Rows are kept in the order they are added; that order is the
/// tie-break when several guards for the same state and event pass.
#[derive(Default)]
pub struct TableBuilder {
    initial: Option<IdentifyState>,
    transitions: Vec<Transition>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: IdentifyState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add rows using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        self.transitions.extend(builder.build()?);
        Ok(self)
    }

    /// Add a pre-built row.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn build(self) -> Result<TransitionTable, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        Ok(TransitionTable::new(initial, self.transitions))
    }
}
