//! Machine states.
//!
//! The UI renders exactly one screen per state, so every state carries a
//! stable tag (`name`) that hosts can match on without depending on the
//! Rust enum layout.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for state machine states.
///
/// All methods are pure. States are plain values describing where the
/// flow currently is; everything the flow has learned lives in the
/// context, not in the state.
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Stable tag for display and logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Terminal states accept no further events.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is a failure state.
    fn is_error(&self) -> bool {
        false
    }
}

/// Every position the identification flow can be in.
///
/// # Example
///
/// ```rust
/// use identify_flow::core::{IdentifyState, State};
///
/// assert_eq!(IdentifyState::SmsChallenge.name(), "smsChallenge");
/// assert!(IdentifyState::Success.is_final());
/// assert!(IdentifyState::ConfigInvalid.is_error());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifyState {
    /// Waiting for device and config, then routing.
    Init,
    /// Silent identification using host-supplied identifiers.
    InitBootstrap,
    EmailIdentification,
    PhoneIdentification,
    /// More than one usable challenge kind; the user picks one.
    ChallengeKindSelection,
    SmsChallenge,
    EmailChallenge,
    BiometricChallenge,
    Success,
    ConfigInvalid,
}

impl IdentifyState {
    /// All states, in declaration order.
    pub const ALL: [IdentifyState; 10] = [
        Self::Init,
        Self::InitBootstrap,
        Self::EmailIdentification,
        Self::PhoneIdentification,
        Self::ChallengeKindSelection,
        Self::SmsChallenge,
        Self::EmailChallenge,
        Self::BiometricChallenge,
        Self::Success,
        Self::ConfigInvalid,
    ];

    /// States that collect an identifier.
    pub const IDENTIFICATION: [IdentifyState; 3] = [
        Self::InitBootstrap,
        Self::EmailIdentification,
        Self::PhoneIdentification,
    ];

    /// States that await completion of a credential challenge.
    pub const CHALLENGES: [IdentifyState; 3] = [
        Self::SmsChallenge,
        Self::EmailChallenge,
        Self::BiometricChallenge,
    ];

    pub fn is_challenge(&self) -> bool {
        Self::CHALLENGES.contains(self)
    }

    pub fn is_identification(&self) -> bool {
        Self::IDENTIFICATION.contains(self)
    }
}

impl State for IdentifyState {
    fn name(&self) -> &str {
        match self {
            Self::Init => "init",
            Self::InitBootstrap => "initBootstrap",
            Self::EmailIdentification => "emailIdentification",
            Self::PhoneIdentification => "phoneIdentification",
            Self::ChallengeKindSelection => "challengeKindSelection",
            Self::SmsChallenge => "smsChallenge",
            Self::EmailChallenge => "emailChallenge",
            Self::BiometricChallenge => "biometricChallenge",
            Self::Success => "success",
            Self::ConfigInvalid => "configInvalid",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Success | Self::ConfigInvalid)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::ConfigInvalid)
    }
}

impl fmt::Display for IdentifyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
