//! Guard library.
//!
//! Pure predicates the transition table consults to pick a branch. Guards
//! attached to `identified` transitions run before the identification
//! result is merged into the context, so challenge availability is read
//! from the event payload when one is present and from the context
//! otherwise.

use crate::core::{is_present, ChallengeKind, Event, MachineContext};
use crate::enforcement;

/// Challenge kinds and passkey availability as seen by a guard.
struct ChallengeView<'a> {
    kinds: &'a [ChallengeKind],
    has_syncable_passkey: bool,
}

fn challenge_view<'a>(ctx: &'a MachineContext, event: Option<&'a Event>) -> ChallengeView<'a> {
    match event.and_then(Event::identified) {
        Some(payload) => ChallengeView {
            kinds: payload.available_kinds(),
            has_syncable_passkey: payload.has_syncable_passkey.unwrap_or(false),
        },
        None => ChallengeView {
            kinds: ctx.challenge.available_kinds(),
            has_syncable_passkey: ctx.challenge.has_syncable_passkey.unwrap_or(false),
        },
    }
}

fn user_found(ctx: &MachineContext, event: Option<&Event>) -> bool {
    match event.and_then(Event::identified) {
        Some(payload) => payload.user_found,
        None => ctx.identify.user_found(),
    }
}

/// Device can run a passkey ceremony for this user.
fn device_supports_biometric(ctx: &MachineContext, has_syncable_passkey: bool) -> bool {
    ctx.device.as_ref().is_some_and(|device| {
        device.supports_platform_authenticator && (device.is_mobile() || has_syncable_passkey)
    })
}

/// Kinds from the current view that this device can actually complete.
pub fn usable_challenge_kinds(ctx: &MachineContext, event: Option<&Event>) -> Vec<ChallengeKind> {
    let view = challenge_view(ctx, event);
    let biometric_ok = device_supports_biometric(ctx, view.has_syncable_passkey);
    let mut usable: Vec<ChallengeKind> = Vec::with_capacity(view.kinds.len());
    for kind in view.kinds {
        let ok = match kind {
            ChallengeKind::Biometric => biometric_ok,
            ChallengeKind::Sms | ChallengeKind::Email => true,
        };
        if ok && !usable.contains(kind) {
            usable.push(*kind);
        }
    }
    usable
}

pub fn has_any_bootstrap_value(ctx: &MachineContext) -> bool {
    is_present(ctx.bootstrap_data.email.as_deref())
        || is_present(ctx.bootstrap_data.phone_number.as_deref())
}

pub fn is_no_phone_flow(ctx: &MachineContext) -> bool {
    ctx.config.as_ref().is_some_and(|c| c.is_no_phone_flow)
}

/// Sandbox ids may be set. Live configurations reject them.
pub fn is_sandbox_allowed(ctx: &MachineContext) -> bool {
    !ctx.config.as_ref().is_some_and(|c| c.is_live)
}

/// Device and config have both been supplied.
pub fn is_init_context_ready(ctx: &MachineContext) -> bool {
    ctx.device.is_some() && ctx.config.is_some()
}

/// A config is present and fails validation.
pub fn is_config_invalid(ctx: &MachineContext) -> bool {
    ctx.config.is_some() && enforcement::validate_context(ctx).is_failure()
}

pub fn has_both_identifiers(event: &Event) -> bool {
    is_present(event.email()) && is_present(event.phone_number())
}

pub fn missing_email(event: &Event) -> bool {
    !is_present(event.email())
}

pub fn missing_phone(event: &Event) -> bool {
    !is_present(event.phone_number())
}

/// Email is the channel to challenge on.
///
/// Holds in the no-phone flow when the account accepts email codes or no
/// account matched, and in any flow when email is the only kind the
/// account reports.
pub fn is_email_challenge_possible(ctx: &MachineContext, event: Option<&Event>) -> bool {
    let view = challenge_view(ctx, event);
    let email_only = view.kinds.iter().all(|k| *k == ChallengeKind::Email);
    let no_phone = is_no_phone_flow(ctx)
        && (view.kinds.contains(&ChallengeKind::Email) || !user_found(ctx, event));

    no_phone || (!view.kinds.is_empty() && email_only)
}

pub fn is_biometric_challenge_allowed(ctx: &MachineContext, event: Option<&Event>) -> bool {
    let view = challenge_view(ctx, event);
    view.kinds.contains(&ChallengeKind::Biometric)
        && device_supports_biometric(ctx, view.has_syncable_passkey)
}

/// More than one kind is usable on this device, so the user should pick.
pub fn has_multiple_challenge_kinds(ctx: &MachineContext, event: Option<&Event>) -> bool {
    challenge_view(ctx, event).kinds.len() > 1 && usable_challenge_kinds(ctx, event).len() > 1
}

pub fn is_user_not_found_or_has_phone_number(ctx: &MachineContext) -> bool {
    !ctx.identify.user_found() || ctx.identify.has_phone_number()
}

pub fn is_user_not_found_or_no_challenges_available(event: &Event) -> bool {
    match event.identified() {
        Some(payload) => !payload.user_found || payload.available_kinds().is_empty(),
        None => false,
    }
}

/// The event selects `kind` and the device can complete it.
pub fn is_usable_kind_selected(
    ctx: &MachineContext,
    event: Option<&Event>,
    kind: ChallengeKind,
) -> bool {
    match event {
        Some(Event::KindSelected { kind: selected }) if *selected == kind => {
            usable_challenge_kinds(ctx, None).contains(&kind)
        }
        _ => false,
    }
}
