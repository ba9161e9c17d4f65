//! Effectful shell around the machine.
//!
//! Requests are turned into Stillwater effects over an environment that
//! talks to the backend. Running an effect yields the event to feed back
//! into the machine; the machine itself never performs I/O.

use crate::core::{ChallengeData, ChallengeKind, Event, IdentifiedPayload};
use crate::effects::request::{ChallengeRequest, IdentifyRequest, PendingRequest};
use crate::machine::{IdentifyMachine, StepResult};
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use thiserror::Error;

/// Errors reported by a backend environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Request rejected by backend: {reason}")]
    Rejected { reason: String },

    #[error("Cannot request a {kind} challenge without an identifier")]
    MissingIdentifier { kind: ChallengeKind },
}

/// Backend the shell runs requests against.
pub trait IdentifyService: Clone + Send + Sync + 'static {
    /// Look up an account. `Ok(None)` means no account matched.
    fn identify(&self, request: &IdentifyRequest)
        -> Result<Option<IdentifiedPayload>, ServiceError>;

    /// Issue a challenge and return its material.
    fn request_challenge(&self, request: &ChallengeRequest) -> Result<ChallengeData, ServiceError>;
}

/// Identifiers the backend did not echo back are taken from the request
/// that produced the payload.
fn with_submitted_identifiers(
    mut payload: IdentifiedPayload,
    request: &IdentifyRequest,
) -> IdentifiedPayload {
    if payload.email.is_none() {
        payload.email = request.email.clone();
    }
    if payload.phone_number.is_none() {
        payload.phone_number = request.phone_number.clone();
    }
    payload
}

/// Effect that performs `request` and produces the resulting event.
pub fn resolve<Env: IdentifyService>(request: PendingRequest) -> BoxedEffect<Event, ServiceError, Env> {
    match request {
        PendingRequest::BootstrapIdentify(req) => from_fn(move |env: &Env| {
            let event = match env.identify(&req)? {
                Some(payload) => Event::Identified(with_submitted_identifiers(payload, &req)),
                None => Event::IdentifyFailed {
                    email: req.email.clone(),
                    phone_number: req.phone_number.clone(),
                },
            };
            Ok(event)
        })
        .boxed(),

        PendingRequest::Identify(req) => from_fn(move |env: &Env| {
            let payload = env.identify(&req)?.unwrap_or_else(IdentifiedPayload::not_found);
            Ok(Event::Identified(with_submitted_identifiers(payload, &req)))
        })
        .boxed(),

        PendingRequest::Challenge(req) if req.email.is_none() && req.phone_number.is_none() => {
            fail(ServiceError::MissingIdentifier { kind: req.kind }).boxed()
        }

        PendingRequest::Challenge(req) => from_fn(move |env: &Env| {
            let challenge_data = env.request_challenge(&req)?;
            Ok(Event::ChallengeReceived { challenge_data })
        })
        .boxed(),
    }
}

/// Run the request the machine is waiting on, if any, and send the result.
///
/// Returns `Ok(None)` when the current state needs user input instead.
/// A failed request leaves the machine untouched; retrying is a matter of
/// calling `drive` again.
pub async fn drive<Env: IdentifyService>(
    machine: &mut IdentifyMachine,
    env: &Env,
) -> Result<Option<StepResult>, ServiceError> {
    let Some(request) = machine.pending_request() else {
        return Ok(None);
    };
    tracing::debug!(state = %machine.state(), ?request, "running pending request");

    let event = resolve::<Env>(request).run(env).await?;
    Ok(Some(machine.send(event)))
}

/// Submit identifiers the user typed and send the result.
pub async fn submit_identify<Env: IdentifyService>(
    machine: &mut IdentifyMachine,
    env: &Env,
    request: IdentifyRequest,
) -> Result<StepResult, ServiceError> {
    let event = resolve::<Env>(PendingRequest::Identify(request))
        .run(env)
        .await?;
    Ok(machine.send(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BootstrapData, DeviceInfo, IdentifyState, MachineArgs, OnboardingConfig};

    #[derive(Clone)]
    struct FakeBackend {
        account: Option<IdentifiedPayload>,
        fail_challenge: bool,
    }

    impl IdentifyService for FakeBackend {
        fn identify(
            &self,
            _request: &IdentifyRequest,
        ) -> Result<Option<IdentifiedPayload>, ServiceError> {
            Ok(self.account.clone())
        }

        fn request_challenge(
            &self,
            request: &ChallengeRequest,
        ) -> Result<ChallengeData, ServiceError> {
            if self.fail_challenge {
                return Err(ServiceError::Network("timeout".into()));
            }
            Ok(ChallengeData::new(
                format!("{}-challenge", request.kind),
                request.kind,
            ))
        }
    }

    fn config() -> OnboardingConfig {
        OnboardingConfig {
            key: "pb_test".into(),
            ..OnboardingConfig::default()
        }
    }

    fn bootstrapped(email: &str, phone: &str) -> IdentifyMachine {
        IdentifyMachine::new(
            MachineArgs::new(DeviceInfo::default(), config()).with_bootstrap(BootstrapData {
                email: Some(email.into()),
                phone_number: Some(phone.into()),
            }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn bootstrap_miss_becomes_identify_failed() {
        let env = FakeBackend {
            account: None,
            fail_challenge: false,
        };
        let mut machine = bootstrapped("a@b.com", "+15555550100");
        assert_eq!(machine.state(), IdentifyState::InitBootstrap);

        drive(&mut machine, &env).await.unwrap();

        assert_eq!(machine.state(), IdentifyState::SmsChallenge);
        assert_eq!(machine.context().identify.email.as_deref(), Some("a@b.com"));

        drive(&mut machine, &env).await.unwrap();
        let data = machine.context().challenge.challenge_data.clone().unwrap();
        assert_eq!(data.kind, ChallengeKind::Sms);
        assert_eq!(data.token, "sms-challenge");

        assert_eq!(drive(&mut machine, &env).await, Ok(None));
    }

    #[tokio::test]
    async fn failed_request_leaves_machine_untouched() {
        let env = FakeBackend {
            account: Some(
                IdentifiedPayload::found([ChallengeKind::Sms]).with_phone_number("+15555550100"),
            ),
            fail_challenge: true,
        };
        let mut machine = bootstrapped("a@b.com", "+15555550100");
        drive(&mut machine, &env).await.unwrap();
        assert_eq!(machine.state(), IdentifyState::SmsChallenge);

        let before = machine.context().clone();
        let result = drive(&mut machine, &env).await;

        assert_eq!(result, Err(ServiceError::Network("timeout".into())));
        assert_eq!(machine.context(), &before);
    }

    #[tokio::test]
    async fn form_submission_without_match_moves_to_phone() {
        let env = FakeBackend {
            account: None,
            fail_challenge: false,
        };
        let mut machine =
            IdentifyMachine::new(MachineArgs::new(DeviceInfo::default(), config())).unwrap();

        let request = IdentifyRequest::for_context(machine.context()).with_email("new@b.com");
        submit_identify(&mut machine, &env, request).await.unwrap();

        assert_eq!(machine.state(), IdentifyState::PhoneIdentification);
        assert_eq!(
            machine.context().identify.email.as_deref(),
            Some("new@b.com")
        );
        assert_eq!(machine.context().identify.user_found, Some(false));
    }

    #[tokio::test]
    async fn challenge_without_identifier_fails() {
        let env = FakeBackend {
            account: None,
            fail_challenge: false,
        };
        let request = PendingRequest::Challenge(ChallengeRequest {
            kind: ChallengeKind::Email,
            email: None,
            phone_number: None,
            sandbox_id: None,
            auth: None,
        });

        let result = resolve::<FakeBackend>(request).run(&env).await;
        assert_eq!(
            result,
            Err(ServiceError::MissingIdentifier {
                kind: ChallengeKind::Email
            })
        );
    }

    fn silent_backend() -> FakeBackend {
        FakeBackend {
            account: Some(IdentifiedPayload::found([ChallengeKind::Sms])),
            fail_challenge: false,
        }
    }

    #[tokio::test]
    async fn match_without_echoed_identifier_keeps_submitted_email() {
        let env = silent_backend();
        let mut machine =
            IdentifyMachine::new(MachineArgs::new(DeviceInfo::default(), config())).unwrap();

        let request = IdentifyRequest::for_context(machine.context()).with_email("a@b.com");
        submit_identify(&mut machine, &env, request).await.unwrap();

        assert_eq!(machine.state(), IdentifyState::SmsChallenge);
        assert_eq!(machine.context().identify.email.as_deref(), Some("a@b.com"));

        drive(&mut machine, &env).await.unwrap();
        let data = machine.context().challenge.challenge_data.clone().unwrap();
        assert_eq!(data.kind, ChallengeKind::Sms);
    }

    #[tokio::test]
    async fn bootstrap_match_without_echoed_identifiers_keeps_bootstrap_values() {
        let env = silent_backend();
        let mut machine = bootstrapped("a@b.com", "+15555550100");

        drive(&mut machine, &env).await.unwrap();

        assert_eq!(machine.state(), IdentifyState::SmsChallenge);
        assert_eq!(machine.context().identify.email.as_deref(), Some("a@b.com"));
        assert_eq!(
            machine.context().identify.phone_number.as_deref(),
            Some("+15555550100")
        );
        assert!(drive(&mut machine, &env).await.unwrap().is_some());
        assert!(machine.context().challenge.challenge_data.is_some());
    }

    #[tokio::test]
    async fn lookup_with_new_email_discards_previous_challenge() {
        let env = silent_backend();
        let mut machine =
            IdentifyMachine::new(MachineArgs::new(DeviceInfo::default(), config())).unwrap();
        let request = IdentifyRequest::for_context(machine.context()).with_email("a@b.com");
        submit_identify(&mut machine, &env, request).await.unwrap();
        drive(&mut machine, &env).await.unwrap();

        machine.send(Event::NavigatedToPrevPage);
        assert_eq!(machine.state(), IdentifyState::EmailIdentification);
        assert!(machine.context().challenge.challenge_data.is_some());

        let request = IdentifyRequest::for_context(machine.context()).with_email("c@d.com");
        submit_identify(&mut machine, &env, request).await.unwrap();

        assert_eq!(machine.context().identify.email.as_deref(), Some("c@d.com"));
        assert!(machine.context().challenge.challenge_data.is_none());
        match machine.pending_request() {
            Some(PendingRequest::Challenge(req)) => {
                assert_eq!(req.email.as_deref(), Some("c@d.com"))
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }
}
