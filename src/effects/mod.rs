//! Imperative shell around the pure machine.
//!
//! # Key Concepts
//!
//! - **Pending requests**: the backend call implied by the current state
//! - **Service environment**: the backend, supplied by the host
//! - **Effects**: Stillwater effects that run a request against the
//!   environment and produce the next event
//!
//! Following Stillwater conventions, request effects are returned as
//! `BoxedEffect` and built from the free-standing `from_fn` and `fail`
//! constructors.

mod request;
mod shell;

pub use request::{
    challenge_kind_for, pending_request, ChallengeRequest, IdentifyRequest, PendingRequest,
};
pub use shell::{drive, resolve, submit_identify, IdentifyService, ServiceError};
