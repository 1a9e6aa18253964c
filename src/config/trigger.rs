//! Per-trigger configuration with a write-once effect.

use crate::config::error::ConfigError;
use crate::core::{Guard, TriggerAction, TriggerId};
use std::fmt;
use std::sync::Arc;

/// The effect a resolved trigger executes.
///
/// Selected exactly once per trigger configuration; modeled as one enum so
/// mutual exclusion is a property of the type rather than a set of
/// runtime-checked flags.
pub(crate) enum TriggerEffect<S, C> {
    /// Move to the target state, running exit/entry lifecycle callbacks.
    Transition(S),
    /// Run a side-effecting action; the current state is unchanged.
    Action(Arc<dyn TriggerAction<C>>),
    /// Deliberate no-op: no callback runs, the current state is unchanged.
    Ignore,
}

impl<S, C> TriggerEffect<S, C> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Transition(_) => "transition",
            Self::Action(_) => "action",
            Self::Ignore => "ignore",
        }
    }
}

impl<S: Clone, C> Clone for TriggerEffect<S, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Transition(target) => Self::Transition(target.clone()),
            Self::Action(action) => Self::Action(Arc::clone(action)),
            Self::Ignore => Self::Ignore,
        }
    }
}

impl<S: fmt::Debug, C> fmt::Debug for TriggerEffect<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition(target) => f.debug_tuple("Transition").field(target).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
            Self::Ignore => f.write_str("Ignore"),
        }
    }
}

impl<S: fmt::Debug, T: fmt::Debug, C> fmt::Debug for TriggerConfig<S, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerConfig")
            .field("owner", &self.owner)
            .field("trigger", &self.trigger)
            .field("guard", &self.guard.as_ref().map(|_| ".."))
            .field("effect", &self.effect)
            .finish()
    }
}

/// Builder for the effect of one (state, trigger) registration.
///
/// Returned by [`StateConfig::on`](crate::StateConfig::on) and
/// [`StateConfig::on_if`](crate::StateConfig::on_if). Exactly one of
/// [`goes_to`](Self::goes_to), [`execute`](Self::execute) or
/// [`ignore`](Self::ignore) may succeed; any second call, in any
/// combination, fails with [`ConfigError::ConflictingEffects`] naming both
/// effect kinds.
pub struct TriggerConfig<S, T, C> {
    owner: String,
    trigger: T,
    guard: Option<Guard<C>>,
    effect: Option<TriggerEffect<S, C>>,
}

impl<S, T, C> TriggerConfig<S, T, C>
where
    T: TriggerId,
{
    pub(crate) fn unguarded(owner: String, trigger: T) -> Self {
        Self {
            owner,
            trigger,
            guard: None,
            effect: None,
        }
    }

    pub(crate) fn guarded(owner: String, trigger: T, guard: Guard<C>) -> Self {
        Self {
            owner,
            trigger,
            guard: Some(guard),
            effect: None,
        }
    }

    /// Configure the trigger to transition to `target`.
    pub fn goes_to(&mut self, target: S) -> Result<&mut Self, ConfigError> {
        self.set_effect(TriggerEffect::Transition(target))
    }

    /// Configure the trigger to run `action` in place, leaving the current
    /// state unchanged.
    pub fn execute<A>(&mut self, action: A) -> Result<&mut Self, ConfigError>
    where
        A: TriggerAction<C> + 'static,
    {
        self.set_effect(TriggerEffect::Action(Arc::new(action)))
    }

    /// Configure the trigger as an explicit no-op.
    pub fn ignore(&mut self) -> Result<&mut Self, ConfigError> {
        self.set_effect(TriggerEffect::Ignore)
    }

    fn set_effect(&mut self, effect: TriggerEffect<S, C>) -> Result<&mut Self, ConfigError> {
        if let Some(existing) = &self.effect {
            return Err(ConfigError::ConflictingEffects {
                state: self.owner.clone(),
                trigger: self.trigger_name(),
                existing: existing.kind(),
                requested: effect.kind(),
            });
        }
        self.effect = Some(effect);
        Ok(self)
    }

    pub(crate) fn effect(&self) -> Option<&TriggerEffect<S, C>> {
        self.effect.as_ref()
    }

    /// The guard passes when absent (unguarded) or when its predicate
    /// evaluates true against the context.
    pub(crate) fn guard_passes(&self, context: &C) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard.check(context))
    }

    pub(crate) fn trigger_name(&self) -> String {
        format!("{:?}", self.trigger)
    }
}
