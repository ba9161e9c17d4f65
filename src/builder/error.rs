//! Build errors for transition tables.

use crate::core::IdentifyState;
use thiserror::Error;

/// Errors that can occur when building transitions and tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state) or .from_each(states)")]
    MissingFromState,

    #[error("Transition trigger not specified. Call .on(event) or .always()")]
    MissingTrigger,

    #[error("Transition target not specified. Call .to(state) or .stay()")]
    MissingTarget,

    #[error("Eventless transition from '{state}' cannot run actions")]
    ActionOnEventless { state: IdentifyState },

    #[error("Eventless transition from '{state}' targets itself and would never settle")]
    EventlessSelfLoop { state: IdentifyState },
}
