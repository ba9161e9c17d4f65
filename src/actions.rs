//! Action library.
//!
//! Actions take the old context by value and return the new one. They run
//! after a transition has been selected and before the machine settles in
//! the target state, in the order the table lists them.

use crate::core::{BootstrapData, ChallengeContext, Event, IdentifyContext, MachineContext};
use std::fmt;
use std::sync::Arc;

type Apply = dyn Fn(MachineContext, &Event) -> MachineContext + Send + Sync;

/// Named context mutation attached to a transition.
#[derive(Clone)]
pub struct Action {
    name: &'static str,
    apply: Arc<Apply>,
}

impl Action {
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(MachineContext, &Event) -> MachineContext + Send + Sync + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, context: MachineContext, event: &Event) -> MachineContext {
        (self.apply)(context, event)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

/// Store `incoming` in `slot`, discarding issued challenge material when
/// the identifier actually changes. Empty or absent values are ignored.
fn replace_identifier(
    slot: &mut Option<String>,
    incoming: Option<&str>,
    challenge: &mut ChallengeContext,
) {
    let Some(value) = incoming.filter(|v| !v.is_empty()) else {
        return;
    };
    if slot.as_deref() != Some(value) {
        challenge.challenge_data = None;
        *slot = Some(value.to_string());
    }
}

pub fn assign_email(mut ctx: MachineContext, event: &Event) -> MachineContext {
    replace_identifier(&mut ctx.identify.email, event.email(), &mut ctx.challenge);
    ctx
}

pub fn assign_phone(mut ctx: MachineContext, event: &Event) -> MachineContext {
    replace_identifier(
        &mut ctx.identify.phone_number,
        event.phone_number(),
        &mut ctx.challenge,
    );
    ctx
}

/// Merge an identify response: match outcome, challenge availability and
/// any identifiers it carries.
pub fn assign_identification_result(ctx: MachineContext, event: &Event) -> MachineContext {
    let Some(payload) = event.identified() else {
        return ctx;
    };
    let mut ctx = assign_phone(assign_email(ctx, event), event);

    ctx.identify.user_found = Some(payload.user_found);
    ctx.identify.is_unverified = Some(payload.is_unverified);
    ctx.identify.successful_identifier = payload.successful_identifier;
    ctx.challenge.available_challenge_kinds = payload.available_challenge_kinds.clone();
    ctx.challenge.has_syncable_passkey = payload.has_syncable_passkey;
    ctx
}

pub fn assign_auth_token(mut ctx: MachineContext, event: &Event) -> MachineContext {
    if let Event::ChallengeSucceeded { auth_token } = event {
        ctx.challenge.auth_token = Some(auth_token.clone());
    }
    ctx
}

pub fn assign_challenge_data(mut ctx: MachineContext, event: &Event) -> MachineContext {
    if let Event::ChallengeReceived { challenge_data } = event {
        ctx.challenge.challenge_data = Some(challenge_data.clone());
    }
    ctx
}

/// Start over. Only the sandbox id survives.
pub fn reset(ctx: MachineContext, _event: &Event) -> MachineContext {
    MachineContext {
        identify: IdentifyContext {
            sandbox_id: ctx.identify.sandbox_id,
            ..IdentifyContext::default()
        },
        challenge: ChallengeContext::default(),
        bootstrap_data: BootstrapData::default(),
        ..ctx
    }
}

pub fn assign_sandbox_id(mut ctx: MachineContext, event: &Event) -> MachineContext {
    if let Event::SandboxIdChanged {
        sandbox_id: Some(sandbox_id),
    } = event
    {
        if !sandbox_id.is_empty() {
            ctx.identify.sandbox_id = Some(sandbox_id.clone());
        }
    }
    ctx
}

/// Fill in device and config if they have not been set yet.
pub fn assign_init_context(mut ctx: MachineContext, event: &Event) -> MachineContext {
    if let Event::InitContextUpdated { device, config } = event {
        if ctx.device.is_none() {
            ctx.device = device.clone();
        }
        if ctx.config.is_none() {
            ctx.config = config.clone();
        }
    }
    ctx
}
