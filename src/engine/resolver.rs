//! Pure trigger resolution.
//!
//! Given the current state's configuration, the optional default
//! configuration, a fired trigger and the context, selects at most one
//! applicable effect:
//!
//! 1. an unguarded entry on the current state wins outright (guards and
//!    the default configuration are not consulted);
//! 2. otherwise the state's guarded variants for the trigger are scanned
//!    in registration order and the first passing guard wins;
//! 3. otherwise steps 1–2 repeat against the default configuration;
//! 4. otherwise the trigger is unresolved.
//!
//! The returned effect is cloned out of the model (a state identifier or a
//! shared action handle), so the engine can execute it without borrowing
//! the configuration.

use crate::config::{StateConfig, TriggerEffect};
use crate::core::{StateId, TriggerId};

pub(crate) fn resolve<S, T, C>(
    state: &StateConfig<S, T, C>,
    fallback: Option<&StateConfig<S, T, C>>,
    trigger: &T,
    context: &C,
) -> Option<TriggerEffect<S, C>>
where
    S: StateId,
    T: TriggerId,
{
    resolve_in(state, trigger, context)
        .or_else(|| fallback.and_then(|fallback| resolve_in(fallback, trigger, context)))
}

fn resolve_in<S, T, C>(
    config: &StateConfig<S, T, C>,
    trigger: &T,
    context: &C,
) -> Option<TriggerEffect<S, C>>
where
    S: StateId,
    T: TriggerId,
{
    if let Some(exact) = config.unguarded_for(trigger) {
        return exact.effect().cloned();
    }
    config
        .guarded_for(trigger)?
        .iter()
        .find(|variant| variant.guard_passes(context))
        .and_then(|variant| variant.effect().cloned())
}
