//! Configuration rules evaluated with `Validation`.

use crate::core::{is_present, MachineContext};
use crate::enforcement::violations::ConfigViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for a single configuration check.
pub type ConfigCheck =
    Box<dyn Fn(&MachineContext) -> Validation<(), NonEmptyVec<ConfigViolation>> + Send + Sync>;

/// Set of checks a context must pass before the flow may start.
/// Every failing check is reported, not just the first.
pub struct ConfigRules {
    checks: Vec<ConfigCheck>,
}

impl ConfigRules {
    /// Rules every onboarding configuration must satisfy.
    pub fn standard() -> Self {
        Self {
            checks: vec![
                Box::new(check_config_present) as ConfigCheck,
                Box::new(check_live_sandbox) as ConfigCheck,
            ],
        }
    }

    /// Add a predicate check reported with `message` when it fails.
    pub fn require_pred<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&MachineContext) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.checks.push(Box::new(move |ctx: &MachineContext| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(ConfigViolation::CustomCheckFailed {
                    message: message.clone(),
                })
            }
        }));
        self
    }

    /// Run every check, accumulating all violations.
    pub fn enforce(&self, ctx: &MachineContext) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> =
            self.checks.iter().map(|check| check(ctx)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for ConfigRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_config_present(ctx: &MachineContext) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    match &ctx.config {
        None => Validation::fail(ConfigViolation::MissingConfig),
        Some(config) if config.key.trim().is_empty() => {
            Validation::fail(ConfigViolation::MissingOnboardingKey)
        }
        Some(_) => Validation::success(()),
    }
}

fn check_live_sandbox(ctx: &MachineContext) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let is_live = ctx.config.as_ref().is_some_and(|c| c.is_live);
    match ctx.identify.sandbox_id.as_deref() {
        Some(sandbox_id) if is_live && is_present(Some(sandbox_id)) => {
            Validation::fail(ConfigViolation::SandboxIdOnLiveConfig {
                sandbox_id: sandbox_id.to_string(),
            })
        }
        _ => Validation::success(()),
    }
}
