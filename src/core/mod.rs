//! Core machine types.
//!
//! This module contains the pure data of the flow:
//! - States via the `State` trait and `IdentifyState`
//! - The context carried through every transition
//! - Inbound events
//! - Guard predicates and the diagnostic transition history
//!
//! Nothing in here performs I/O.

mod context;
mod event;
mod guard;
mod history;
mod state;

pub(crate) use context::is_present;
pub use context::{
    AuthConfig, BootstrapData, ChallengeContext, ChallengeData, ChallengeKind, DeviceInfo,
    IdentifyContext, Identifier, MachineArgs, MachineContext, OnboardingConfig, PlatformType,
};
pub use event::{Event, EventKind, IdentifiedPayload};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{IdentifyState, State};
