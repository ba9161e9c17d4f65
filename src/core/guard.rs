//! Guard predicates for choosing among competing transitions.
//!
//! A guard sees the context and the incoming event (absent for eventless
//! transitions). Guards are evaluated in table order and the first one
//! that passes wins, so they must be pure.

use super::context::MachineContext;
use super::event::Event;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&MachineContext, Option<&Event>) -> bool + Send + Sync;

/// Named pure predicate over `(context, event)`.
///
/// # Example
///
/// ```rust
/// use identify_flow::core::{Guard, MachineContext};
///
/// let has_email = Guard::new("hasEmail", |ctx: &MachineContext, _| {
///     ctx.identify.email.is_some()
/// });
///
/// assert_eq!(has_email.name(), "hasEmail");
/// assert!(!has_email.check(&MachineContext::default(), None));
/// ```
#[derive(Clone)]
pub struct Guard {
    name: &'static str,
    predicate: Arc<Predicate>,
}

impl Guard {
    /// Create a guard from a pure predicate.
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&MachineContext, Option<&Event>) -> bool + Send + Sync + 'static,
    {
        Guard {
            name,
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that only looks at the context.
    pub fn context<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&MachineContext) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |ctx, _| predicate(ctx))
    }

    /// Guard that only looks at the event. Fails when there is no event.
    pub fn event<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |_, event| event.is_some_and(&predicate))
    }

    /// Negation of this guard.
    pub fn negate(self) -> Self {
        let inner = self.predicate;
        Guard {
            name: self.name,
            predicate: Arc::new(move |ctx: &MachineContext, event: Option<&Event>| {
                !inner(ctx, event)
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn check(&self, context: &MachineContext, event: Option<&Event>) -> bool {
        (self.predicate)(context, event)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guard").field(&self.name).finish()
    }
}
