//! Identify Flow: client-side orchestration of identity verification.
//!
//! The flow is a pure state machine in the "pure core, imperative shell"
//! style. The core is an ordered table of guarded transitions over an
//! immutable context: guards are pure predicates, actions map the old
//! context to a new one, and nothing in the core performs I/O. Backend
//! calls live in the [`effects`] shell as Stillwater effects whose result
//! is the next event to feed back in.
//!
//! # Core Concepts
//!
//! - **State**: which screen or phase the flow is in ([`IdentifyState`])
//! - **Events**: user actions and backend responses ([`Event`])
//! - **Guards**: named predicates that pick among candidate rows
//! - **Actions**: named context updates attached to a row
//! - **History**: diagnostic log of settled transitions
//!
//! # Example
//!
//! ```rust
//! use identify_flow::core::{
//!     ChallengeData, ChallengeKind, DeviceInfo, Event, IdentifiedPayload, IdentifyState,
//!     MachineArgs, OnboardingConfig,
//! };
//! use identify_flow::IdentifyMachine;
//!
//! let config = OnboardingConfig {
//!     key: "pb_test_123".to_string(),
//!     ..OnboardingConfig::default()
//! };
//! let mut machine = IdentifyMachine::new(MachineArgs::new(DeviceInfo::default(), config))?;
//! assert_eq!(machine.state(), IdentifyState::EmailIdentification);
//!
//! machine.send(Event::Identified(
//!     IdentifiedPayload::found([ChallengeKind::Sms]).with_email("jane@example.com"),
//! ));
//! assert_eq!(machine.state(), IdentifyState::SmsChallenge);
//!
//! machine.send(Event::ChallengeReceived {
//!     challenge_data: ChallengeData::new("challenge-token", ChallengeKind::Sms),
//! });
//! machine.send(Event::ChallengeSucceeded {
//!     auth_token: "auth-token".to_string(),
//! });
//! assert_eq!(machine.auth_token(), Some("auth-token"));
//! # Ok::<(), identify_flow::builder::BuildError>(())
//! ```

pub mod actions;
pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod enforcement;
pub mod guards;
pub mod machine;

// Re-export commonly used types
pub use checkpoint::{CheckpointError, Snapshot};
pub use core::{Event, EventKind, Guard, IdentifyState, MachineArgs, MachineContext, State};
pub use effects::{drive, IdentifyService, PendingRequest, ServiceError};
pub use machine::{IdentifyMachine, StepResult};
