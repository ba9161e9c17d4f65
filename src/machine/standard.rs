//! The identification flow's transition table.
//!
//! Row order is part of the contract: for every state/event pair the
//! guards are listed from highest to lowest priority and the last row of
//! a group is the unguarded fallback, if there is one.

use crate::actions::{self, Action};
use crate::builder::{BuildError, TableBuilder, TransitionBuilder};
use crate::core::{ChallengeKind, Event, EventKind, Guard, IdentifyState as S, MachineContext};
use crate::guards;
use crate::machine::TransitionTable;

const NON_TERMINAL: [S; 8] = [
    S::Init,
    S::InitBootstrap,
    S::EmailIdentification,
    S::PhoneIdentification,
    S::ChallengeKindSelection,
    S::SmsChallenge,
    S::EmailChallenge,
    S::BiometricChallenge,
];

const RESETTABLE: [S; 7] = [
    S::InitBootstrap,
    S::EmailIdentification,
    S::PhoneIdentification,
    S::ChallengeKindSelection,
    S::SmsChallenge,
    S::EmailChallenge,
    S::BiometricChallenge,
];

fn on(from: S, event: EventKind, to: S) -> TransitionBuilder {
    TransitionBuilder::new().from(from).on(event).to(to)
}

fn ctx_guard(name: &'static str, predicate: fn(&MachineContext) -> bool) -> Guard {
    Guard::context(name, predicate)
}

fn event_guard(name: &'static str, predicate: fn(&Event) -> bool) -> Guard {
    Guard::event(name, predicate)
}

fn email_challenge_possible() -> Guard {
    Guard::new(
        "isEmailChallengePossible",
        guards::is_email_challenge_possible,
    )
}

fn multiple_challenge_kinds() -> Guard {
    Guard::new(
        "hasMultipleChallengeKinds",
        guards::has_multiple_challenge_kinds,
    )
}

fn biometric_allowed() -> Guard {
    Guard::new(
        "isBiometricChallengeAllowed",
        guards::is_biometric_challenge_allowed,
    )
}

fn not_found_or_has_phone() -> Guard {
    ctx_guard(
        "isUserNotFoundOrHasPhoneNumber",
        guards::is_user_not_found_or_has_phone_number,
    )
}

fn kind_selected(kind: ChallengeKind) -> Guard {
    Guard::new("isUsableKindSelected", move |ctx, event| {
        guards::is_usable_kind_selected(ctx, event, kind)
    })
}

fn assign_email() -> Action {
    Action::new("assignEmail", actions::assign_email)
}

fn assign_phone() -> Action {
    Action::new("assignPhone", actions::assign_phone)
}

fn assign_identification_result() -> Action {
    Action::new(
        "assignIdentificationResult",
        actions::assign_identification_result,
    )
}

fn reset() -> Action {
    Action::new("reset", actions::reset)
}

fn init_rows() -> Vec<TransitionBuilder> {
    vec![
        TransitionBuilder::new()
            .from(S::Init)
            .always()
            .to(S::ConfigInvalid)
            .guard(ctx_guard("isConfigInvalid", guards::is_config_invalid)),
        TransitionBuilder::new()
            .from(S::Init)
            .always()
            .to(S::InitBootstrap)
            .guard(ctx_guard("hasAnyBootstrapValue", |ctx| {
                guards::is_init_context_ready(ctx) && guards::has_any_bootstrap_value(ctx)
            })),
        TransitionBuilder::new()
            .from(S::Init)
            .always()
            .to(S::EmailIdentification)
            .guard(ctx_guard("isInitContextReady", guards::is_init_context_ready)),
        TransitionBuilder::new()
            .from(S::Init)
            .on(EventKind::InitContextUpdated)
            .stay()
            .action(Action::new(
                "assignInitContext",
                actions::assign_init_context,
            )),
    ]
}

fn bootstrap_rows() -> Vec<TransitionBuilder> {
    vec![
        on(
            S::InitBootstrap,
            EventKind::BootstrapDataInvalid,
            S::EmailIdentification,
        )
        .action(reset()),
        on(S::InitBootstrap, EventKind::IdentifyFailed, S::EmailChallenge)
            .guard(ctx_guard("isNoPhoneFlow", guards::is_no_phone_flow))
            .action(assign_email())
            .action(assign_phone()),
        on(S::InitBootstrap, EventKind::IdentifyFailed, S::SmsChallenge)
            .guard(event_guard(
                "hasBothIdentifiers",
                guards::has_both_identifiers,
            ))
            .action(assign_email())
            .action(assign_phone()),
        on(
            S::InitBootstrap,
            EventKind::IdentifyFailed,
            S::EmailIdentification,
        )
        .guard(event_guard("missingEmail", guards::missing_email))
        .action(assign_phone()),
        on(
            S::InitBootstrap,
            EventKind::IdentifyFailed,
            S::PhoneIdentification,
        )
        .guard(event_guard("missingPhone", guards::missing_phone))
        .action(assign_email()),
    ]
}

/// `identified` routing shared by every identification state. Only email
/// entry can fall back to collecting a phone number.
fn identified_rows(from: S) -> Vec<TransitionBuilder> {
    let mut rows = vec![on(from, EventKind::Identified, S::EmailChallenge)
        .guard(email_challenge_possible())
        .action(assign_identification_result())];

    if from == S::EmailIdentification {
        rows.push(
            on(from, EventKind::Identified, S::PhoneIdentification)
                .guard(event_guard(
                    "isUserNotFoundOrNoChallengesAvailable",
                    guards::is_user_not_found_or_no_challenges_available,
                ))
                .action(assign_identification_result()),
        );
    }

    rows.extend([
        on(from, EventKind::Identified, S::ChallengeKindSelection)
            .guard(multiple_challenge_kinds())
            .action(assign_identification_result()),
        on(from, EventKind::Identified, S::BiometricChallenge)
            .guard(biometric_allowed())
            .action(assign_identification_result()),
        on(from, EventKind::Identified, S::SmsChallenge).action(assign_identification_result()),
    ]);
    rows
}

fn selection_rows() -> Vec<TransitionBuilder> {
    vec![
        on(
            S::ChallengeKindSelection,
            EventKind::KindSelected,
            S::SmsChallenge,
        )
        .guard(kind_selected(ChallengeKind::Sms)),
        on(
            S::ChallengeKindSelection,
            EventKind::KindSelected,
            S::EmailChallenge,
        )
        .guard(kind_selected(ChallengeKind::Email)),
        on(
            S::ChallengeKindSelection,
            EventKind::KindSelected,
            S::BiometricChallenge,
        )
        .guard(kind_selected(ChallengeKind::Biometric)),
        on(
            S::ChallengeKindSelection,
            EventKind::NavigatedToPrevPage,
            S::PhoneIdentification,
        )
        .guard(not_found_or_has_phone()),
        on(
            S::ChallengeKindSelection,
            EventKind::NavigatedToPrevPage,
            S::EmailIdentification,
        ),
    ]
}

fn challenge_rows() -> Vec<TransitionBuilder> {
    vec![
        TransitionBuilder::new()
            .from_each(S::CHALLENGES)
            .on(EventKind::ChallengeReceived)
            .stay()
            .action(Action::new(
                "assignChallengeData",
                actions::assign_challenge_data,
            )),
        TransitionBuilder::new()
            .from_each(S::CHALLENGES)
            .on(EventKind::ChallengeSucceeded)
            .to(S::Success)
            .action(Action::new("assignAuthToken", actions::assign_auth_token)),
        // Unknown users return to phone entry, even without a phone on
        // file. Only known users without a phone return to email entry.
        on(
            S::SmsChallenge,
            EventKind::NavigatedToPrevPage,
            S::BiometricChallenge,
        )
        .guard(biometric_allowed()),
        on(
            S::SmsChallenge,
            EventKind::NavigatedToPrevPage,
            S::PhoneIdentification,
        )
        .guard(not_found_or_has_phone()),
        on(
            S::SmsChallenge,
            EventKind::NavigatedToPrevPage,
            S::EmailIdentification,
        ),
        on(
            S::BiometricChallenge,
            EventKind::NavigatedToPrevPage,
            S::PhoneIdentification,
        )
        .guard(not_found_or_has_phone()),
        on(
            S::BiometricChallenge,
            EventKind::NavigatedToPrevPage,
            S::EmailIdentification,
        ),
        on(
            S::BiometricChallenge,
            EventKind::ChangeChallengeToSms,
            S::SmsChallenge,
        ),
        on(
            S::EmailChallenge,
            EventKind::NavigatedToPrevPage,
            S::EmailIdentification,
        ),
    ]
}

fn shared_rows() -> Vec<TransitionBuilder> {
    vec![
        on(
            S::PhoneIdentification,
            EventKind::NavigatedToPrevPage,
            S::EmailIdentification,
        ),
        TransitionBuilder::new()
            .from_each(RESETTABLE)
            .on(EventKind::IdentifyReset)
            .to(S::EmailIdentification)
            .action(reset()),
        TransitionBuilder::new()
            .from_each(NON_TERMINAL)
            .on(EventKind::SandboxIdChanged)
            .stay()
            .guard(ctx_guard("isSandboxAllowed", guards::is_sandbox_allowed))
            .action(Action::new("assignSandboxId", actions::assign_sandbox_id)),
    ]
}

/// Build the full identification flow table.
pub fn standard_table() -> Result<TransitionTable, BuildError> {
    let rows = init_rows()
        .into_iter()
        .chain(bootstrap_rows())
        .chain(S::IDENTIFICATION.into_iter().flat_map(identified_rows))
        .chain(selection_rows())
        .chain(challenge_rows())
        .chain(shared_rows());

    let mut builder = TableBuilder::new().initial(S::Init);
    for row in rows {
        builder = builder.transition(row)?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    fn table() -> TransitionTable {
        standard_table().unwrap()
    }

    #[test]
    fn standard_table_builds() {
        let table = table();
        assert_eq!(table.initial(), S::Init);
        assert!(!table.transitions().is_empty());
    }

    #[test]
    fn terminal_states_have_no_rows() {
        let table = table();
        for state in [S::Success, S::ConfigInvalid] {
            assert!(state.is_final());
            assert!(table.accepted_events(state).is_empty());
        }
    }

    #[test]
    fn identified_priority_order() {
        let table = table();

        assert_eq!(
            table.targets(S::EmailIdentification, EventKind::Identified),
            vec![
                S::EmailChallenge,
                S::PhoneIdentification,
                S::ChallengeKindSelection,
                S::BiometricChallenge,
                S::SmsChallenge,
            ]
        );
        for from in [S::InitBootstrap, S::PhoneIdentification] {
            assert_eq!(
                table.targets(from, EventKind::Identified),
                vec![
                    S::EmailChallenge,
                    S::ChallengeKindSelection,
                    S::BiometricChallenge,
                    S::SmsChallenge,
                ]
            );
        }
    }

    #[test]
    fn bootstrap_failure_priority_order() {
        assert_eq!(
            table().targets(S::InitBootstrap, EventKind::IdentifyFailed),
            vec![
                S::EmailChallenge,
                S::SmsChallenge,
                S::EmailIdentification,
                S::PhoneIdentification,
            ]
        );
    }

    #[test]
    fn every_non_terminal_state_accepts_sandbox_changes() {
        let table = table();
        for state in NON_TERMINAL {
            assert!(table.handles(state, EventKind::SandboxIdChanged));
        }
    }

    #[test]
    fn reset_reachable_from_every_state_after_init() {
        let table = table();
        assert!(!table.handles(S::Init, EventKind::IdentifyReset));
        for state in RESETTABLE {
            assert_eq!(
                table.targets(state, EventKind::IdentifyReset),
                vec![S::EmailIdentification]
            );
        }
    }

    #[test]
    fn email_challenge_always_goes_back_to_email_entry() {
        assert_eq!(
            table().targets(S::EmailChallenge, EventKind::NavigatedToPrevPage),
            vec![S::EmailIdentification]
        );
    }
}
