//! Data carried through the machine.
//!
//! The context is owned by the machine and replaced wholesale by every
//! action; hosts only read it. Empty groups compare equal to their
//! `Default`, which is what a reset produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime platform reported by the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    Mobile,
    Desktop,
    #[default]
    Unknown,
}

/// Capability snapshot taken once when the flow starts.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform_type: PlatformType,
    pub supports_platform_authenticator: bool,
}

impl DeviceInfo {
    pub fn is_mobile(&self) -> bool {
        self.platform_type == PlatformType::Mobile
    }
}

/// Tenant onboarding configuration.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingConfig {
    /// Publishable key identifying the onboarding configuration.
    pub key: String,
    pub org_name: String,
    pub is_live: bool,
    pub is_no_phone_flow: bool,
    pub requires_id_doc: bool,
}

/// Opaque credential authorizing identify/challenge calls.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Identifiers supplied by the host before the flow starts.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapData {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Credential mechanism used to prove control of an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Sms,
    Email,
    Biometric,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 3] = [Self::Sms, Self::Email, Self::Biometric];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
            Self::Biometric => "biometric",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which identifier the backend used to resolve a match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Identifier {
    Email,
    PhoneNumber,
}

/// Material returned once a challenge has been issued.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeData {
    pub token: String,
    pub kind: ChallengeKind,
    /// WebAuthn request options, present for biometric challenges.
    pub biometric_challenge_json: Option<String>,
    /// Resending is blocked until this instant.
    pub retry_disabled_until: Option<DateTime<Utc>>,
}

impl ChallengeData {
    pub fn new(token: impl Into<String>, kind: ChallengeKind) -> Self {
        Self {
            token: token.into(),
            kind,
            biometric_challenge_json: None,
            retry_disabled_until: None,
        }
    }

    /// Whether a resend may be requested at `now`.
    pub fn can_retry_at(&self, now: DateTime<Utc>) -> bool {
        self.retry_disabled_until.map_or(true, |until| now >= until)
    }
}

/// Accumulated identification result.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyContext {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub user_found: Option<bool>,
    pub is_unverified: Option<bool>,
    pub successful_identifier: Option<Identifier>,
    /// Survives every reset.
    pub sandbox_id: Option<String>,
}

impl IdentifyContext {
    pub fn user_found(&self) -> bool {
        self.user_found.unwrap_or(false)
    }

    pub fn has_phone_number(&self) -> bool {
        is_present(self.phone_number.as_deref())
    }
}

/// Accumulated challenge result.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeContext {
    pub available_challenge_kinds: Option<Vec<ChallengeKind>>,
    pub has_syncable_passkey: Option<bool>,
    /// `None` until a challenge has been issued.
    pub challenge_data: Option<ChallengeData>,
    /// Set only in the `success` state.
    pub auth_token: Option<String>,
}

impl ChallengeContext {
    pub fn available_kinds(&self) -> &[ChallengeKind] {
        self.available_challenge_kinds.as_deref().unwrap_or(&[])
    }
}

/// Everything the machine knows about the session.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineContext {
    pub device: Option<DeviceInfo>,
    pub config: Option<OnboardingConfig>,
    pub auth_config: Option<AuthConfig>,
    pub bootstrap_data: BootstrapData,
    pub identify: IdentifyContext,
    pub challenge: ChallengeContext,
}

/// Caller-supplied values the context is built from.
#[derive(Clone, Debug, Default)]
pub struct MachineArgs {
    pub device: Option<DeviceInfo>,
    pub config: Option<OnboardingConfig>,
    pub auth_config: Option<AuthConfig>,
    pub bootstrap_data: BootstrapData,
    pub sandbox_id: Option<String>,
}

impl MachineArgs {
    pub fn new(device: DeviceInfo, config: OnboardingConfig) -> Self {
        Self {
            device: Some(device),
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn with_bootstrap(mut self, bootstrap_data: BootstrapData) -> Self {
        self.bootstrap_data = bootstrap_data;
        self
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = Some(auth_config);
        self
    }

    pub fn with_sandbox_id(mut self, sandbox_id: impl Into<String>) -> Self {
        self.sandbox_id = Some(sandbox_id.into());
        self
    }
}

impl From<MachineArgs> for MachineContext {
    fn from(args: MachineArgs) -> Self {
        Self {
            device: args.device,
            config: args.config,
            auth_config: args.auth_config,
            bootstrap_data: args.bootstrap_data,
            identify: IdentifyContext {
                sandbox_id: args.sandbox_id,
                ..IdentifyContext::default()
            },
            challenge: ChallengeContext::default(),
        }
    }
}

/// A value counts as supplied only when it is a non-empty string.
pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
