//! Validation of the onboarding configuration.
//!
//! Uses Stillwater's `Validation` so that a host surfacing the
//! `configInvalid` state can report every problem at once instead of one
//! per attempt.
//!
//! # Example
//!
//! ```rust
//! use identify_flow::core::{MachineContext, OnboardingConfig};
//! use identify_flow::enforcement::{config_violations, ConfigViolation};
//!
//! let ctx = MachineContext {
//!     config: Some(OnboardingConfig::default()),
//!     ..MachineContext::default()
//! };
//!
//! assert_eq!(config_violations(&ctx), vec![ConfigViolation::MissingOnboardingKey]);
//! ```

pub mod rules;
pub mod violations;

pub use rules::{ConfigCheck, ConfigRules};
pub use violations::ConfigViolation;

use crate::core::MachineContext;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Run the standard rules against `ctx`.
pub fn validate_context(ctx: &MachineContext) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    ConfigRules::standard().enforce(ctx)
}

/// Violations of the standard rules as a flat list, empty when valid.
pub fn config_violations(ctx: &MachineContext) -> Vec<ConfigViolation> {
    match validate_context(ctx) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
