//! Configuration violations.

use thiserror::Error;

/// Reasons an onboarding configuration cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Onboarding configuration is missing")]
    MissingConfig,

    #[error("Onboarding configuration has an empty publishable key")]
    MissingOnboardingKey,

    #[error("Sandbox id '{sandbox_id}' supplied for a live configuration")]
    SandboxIdOnLiveConfig { sandbox_id: String },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
