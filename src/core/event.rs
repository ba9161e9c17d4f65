//! Inbound events produced by the UI and network layers.

use super::context::{ChallengeData, ChallengeKind, DeviceInfo, Identifier, OnboardingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a successful identify response.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedPayload {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub user_found: bool,
    pub is_unverified: bool,
    pub successful_identifier: Option<Identifier>,
    pub available_challenge_kinds: Option<Vec<ChallengeKind>>,
    pub has_syncable_passkey: Option<bool>,
}

impl IdentifiedPayload {
    /// Payload for a lookup that matched no account.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Payload for a lookup that matched an account with the given kinds.
    pub fn found(kinds: impl Into<Vec<ChallengeKind>>) -> Self {
        Self {
            user_found: true,
            available_challenge_kinds: Some(kinds.into()),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.successful_identifier.get_or_insert(Identifier::Email);
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self.successful_identifier
            .get_or_insert(Identifier::PhoneNumber);
        self
    }

    pub fn with_syncable_passkey(mut self, has_syncable_passkey: bool) -> Self {
        self.has_syncable_passkey = Some(has_syncable_passkey);
        self
    }

    pub fn available_kinds(&self) -> &[ChallengeKind] {
        self.available_challenge_kinds.as_deref().unwrap_or(&[])
    }
}

/// Every event the machine accepts.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    InitContextUpdated {
        device: Option<DeviceInfo>,
        config: Option<OnboardingConfig>,
    },
    Identified(IdentifiedPayload),
    IdentifyFailed {
        email: Option<String>,
        phone_number: Option<String>,
    },
    IdentifyReset,
    NavigatedToPrevPage,
    KindSelected {
        kind: ChallengeKind,
    },
    ChangeChallengeToSms,
    ChallengeReceived {
        challenge_data: ChallengeData,
    },
    ChallengeSucceeded {
        auth_token: String,
    },
    BootstrapDataInvalid,
    SandboxIdChanged {
        sandbox_id: Option<String>,
    },
}

/// Payload-free discriminant used to index the transition table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    InitContextUpdated,
    Identified,
    IdentifyFailed,
    IdentifyReset,
    NavigatedToPrevPage,
    KindSelected,
    ChangeChallengeToSms,
    ChallengeReceived,
    ChallengeSucceeded,
    BootstrapDataInvalid,
    SandboxIdChanged,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitContextUpdated => "initContextUpdated",
            Self::Identified => "identified",
            Self::IdentifyFailed => "identifyFailed",
            Self::IdentifyReset => "identifyReset",
            Self::NavigatedToPrevPage => "navigatedToPrevPage",
            Self::KindSelected => "kindSelected",
            Self::ChangeChallengeToSms => "changeChallengeToSms",
            Self::ChallengeReceived => "challengeReceived",
            Self::ChallengeSucceeded => "challengeSucceeded",
            Self::BootstrapDataInvalid => "bootstrapDataInvalid",
            Self::SandboxIdChanged => "sandboxIdChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::InitContextUpdated { .. } => EventKind::InitContextUpdated,
            Self::Identified(_) => EventKind::Identified,
            Self::IdentifyFailed { .. } => EventKind::IdentifyFailed,
            Self::IdentifyReset => EventKind::IdentifyReset,
            Self::NavigatedToPrevPage => EventKind::NavigatedToPrevPage,
            Self::KindSelected { .. } => EventKind::KindSelected,
            Self::ChangeChallengeToSms => EventKind::ChangeChallengeToSms,
            Self::ChallengeReceived { .. } => EventKind::ChallengeReceived,
            Self::ChallengeSucceeded { .. } => EventKind::ChallengeSucceeded,
            Self::BootstrapDataInvalid => EventKind::BootstrapDataInvalid,
            Self::SandboxIdChanged { .. } => EventKind::SandboxIdChanged,
        }
    }

    /// Email carried by an identify response or failure, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Identified(payload) => payload.email.as_deref(),
            Self::IdentifyFailed { email, .. } => email.as_deref(),
            _ => None,
        }
    }

    /// Phone number carried by an identify response or failure, if any.
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            Self::Identified(payload) => payload.phone_number.as_deref(),
            Self::IdentifyFailed { phone_number, .. } => phone_number.as_deref(),
            _ => None,
        }
    }

    pub fn identified(&self) -> Option<&IdentifiedPayload> {
        match self {
            Self::Identified(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<IdentifiedPayload> for Event {
    fn from(payload: IdentifiedPayload) -> Self {
        Self::Identified(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Event::IdentifyReset.kind(), EventKind::IdentifyReset);
        assert_eq!(
            Event::from(IdentifiedPayload::not_found()).kind(),
            EventKind::Identified
        );
        assert_eq!(
            Event::KindSelected {
                kind: ChallengeKind::Email
            }
            .kind()
            .name(),
            "kindSelected"
        );
    }

    #[test]
    fn identifiers_are_read_from_identify_events_only() {
        let failed = Event::IdentifyFailed {
            email: Some("a@b.com".into()),
            phone_number: None,
        };
        assert_eq!(failed.email(), Some("a@b.com"));
        assert_eq!(failed.phone_number(), None);

        let identified = Event::from(IdentifiedPayload::not_found().with_phone_number("+1555"));
        assert_eq!(identified.phone_number(), Some("+1555"));

        assert_eq!(Event::NavigatedToPrevPage.email(), None);
    }

    #[test]
    fn payload_builders_record_successful_identifier() {
        let payload = IdentifiedPayload::found([ChallengeKind::Sms]).with_email("a@b.com");
        assert!(payload.user_found);
        assert_eq!(payload.successful_identifier, Some(Identifier::Email));
        assert_eq!(payload.available_kinds(), &[ChallengeKind::Sms]);

        let payload = payload.with_phone_number("+1555");
        assert_eq!(payload.successful_identifier, Some(Identifier::Email));
    }
}
