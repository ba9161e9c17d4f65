//! Outbound read surface: which backend call the host should make next.

use crate::core::{AuthConfig, ChallengeKind, IdentifyState, MachineContext};
use serde::{Deserialize, Serialize};

/// Lookup of an account by identifier.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub sandbox_id: Option<String>,
    #[serde(skip)]
    pub auth: Option<AuthConfig>,
}

impl IdentifyRequest {
    /// Request carrying the session's sandbox id and credential.
    pub fn for_context(ctx: &MachineContext) -> Self {
        Self {
            sandbox_id: ctx.identify.sandbox_id.clone(),
            auth: ctx.auth_config.clone(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}

/// Request to issue a challenge of `kind`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub kind: ChallengeKind,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub sandbox_id: Option<String>,
    #[serde(skip)]
    pub auth: Option<AuthConfig>,
}

/// Backend call implied by the current state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PendingRequest {
    /// Silent lookup with host-supplied identifiers.
    BootstrapIdentify(IdentifyRequest),
    /// Lookup with identifiers the user typed.
    Identify(IdentifyRequest),
    Challenge(ChallengeRequest),
}

/// Challenge kind a challenge state waits on.
pub fn challenge_kind_for(state: IdentifyState) -> Option<ChallengeKind> {
    match state {
        IdentifyState::SmsChallenge => Some(ChallengeKind::Sms),
        IdentifyState::EmailChallenge => Some(ChallengeKind::Email),
        IdentifyState::BiometricChallenge => Some(ChallengeKind::Biometric),
        _ => None,
    }
}

/// Derive the call to make next, if the state needs one without user input.
///
/// A challenge state needs a request while no challenge material has been
/// issued for its kind.
pub fn pending_request(state: IdentifyState, ctx: &MachineContext) -> Option<PendingRequest> {
    if state == IdentifyState::InitBootstrap {
        return Some(PendingRequest::BootstrapIdentify(IdentifyRequest {
            email: ctx.bootstrap_data.email.clone(),
            phone_number: ctx.bootstrap_data.phone_number.clone(),
            ..IdentifyRequest::for_context(ctx)
        }));
    }

    let kind = challenge_kind_for(state)?;
    let issued = ctx
        .challenge
        .challenge_data
        .as_ref()
        .is_some_and(|data| data.kind == kind);
    if issued {
        return None;
    }

    Some(PendingRequest::Challenge(ChallengeRequest {
        kind,
        email: ctx.identify.email.clone(),
        phone_number: ctx.identify.phone_number.clone(),
        sandbox_id: ctx.identify.sandbox_id.clone(),
        auth: ctx.auth_config.clone(),
    }))
}
