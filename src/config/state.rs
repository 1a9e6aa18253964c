//! Per-state configuration: trigger maps and the lifecycle handler.

use crate::config::error::ConfigError;
use crate::config::trigger::TriggerConfig;
use crate::core::{Guard, Handler, StateId, TriggerId};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration owned by one state (or by the default pseudo-state).
///
/// Holds the unguarded trigger map, the guarded trigger lists (scanned in
/// registration order) and the state's entry/exit handler. A given trigger
/// on a given state is either exclusively guarded or exclusively unguarded;
/// the conflict is rejected at registration time, not at dispatch time.
pub struct StateConfig<S, T, C> {
    /// `None` marks the default pseudo-state.
    id: Option<S>,
    unguarded: HashMap<T, TriggerConfig<S, T, C>>,
    guarded: HashMap<T, Vec<TriggerConfig<S, T, C>>>,
    handler: Option<Arc<dyn Handler<T, C>>>,
}

impl<S, T, C> StateConfig<S, T, C>
where
    S: StateId,
    T: TriggerId,
{
    pub(crate) fn for_state(id: S) -> Self {
        Self {
            id: Some(id),
            unguarded: HashMap::new(),
            guarded: HashMap::new(),
            handler: None,
        }
    }

    pub(crate) fn fallback() -> Self {
        Self {
            id: None,
            unguarded: HashMap::new(),
            guarded: HashMap::new(),
            handler: None,
        }
    }

    /// Register `trigger` without a guard and return its effect builder.
    ///
    /// Idempotent: a repeated call for the same trigger returns the
    /// existing builder, so a duplicate effect still trips the write-once
    /// check. Fails if the trigger already has guarded registrations.
    pub fn on(&mut self, trigger: T) -> Result<&mut TriggerConfig<S, T, C>, ConfigError> {
        if self.guarded.contains_key(&trigger) {
            return Err(ConfigError::UnguardedAfterGuarded {
                state: self.display_name(),
                trigger: format!("{trigger:?}"),
            });
        }
        let owner = self.display_name();
        Ok(self
            .unguarded
            .entry(trigger.clone())
            .or_insert_with(|| TriggerConfig::unguarded(owner, trigger)))
    }

    /// Register a guarded variant of `trigger` and return its effect
    /// builder.
    ///
    /// Variants for the same trigger accumulate in registration order; the
    /// resolver picks the first whose guard passes. Fails if the trigger
    /// already has an unguarded registration.
    pub fn on_if<G>(
        &mut self,
        trigger: T,
        guard: G,
    ) -> Result<&mut TriggerConfig<S, T, C>, ConfigError>
    where
        G: Fn(&C) -> bool + Send + Sync + 'static,
    {
        if self.unguarded.contains_key(&trigger) {
            return Err(ConfigError::GuardedAfterUnguarded {
                state: self.display_name(),
                trigger: format!("{trigger:?}"),
            });
        }
        let owner = self.display_name();
        let variants = self.guarded.entry(trigger.clone()).or_default();
        variants.push(TriggerConfig::guarded(owner, trigger, Guard::new(guard)));
        Ok(variants.last_mut().expect("variant pushed above"))
    }

    /// Attach the state's entry/exit handler.
    pub fn handled_by<H>(&mut self, handler: H) -> &mut Self
    where
        H: Handler<T, C> + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Triggers registered on this state, guarded or unguarded.
    pub fn triggers(&self) -> Vec<T> {
        self.unguarded
            .keys()
            .chain(self.guarded.keys())
            .cloned()
            .collect()
    }

    pub(crate) fn display_name(&self) -> String {
        match &self.id {
            Some(id) => format!("{id:?}"),
            None => "<default>".to_string(),
        }
    }

    pub(crate) fn handler(&self) -> Option<Arc<dyn Handler<T, C>>> {
        self.handler.clone()
    }

    pub(crate) fn unguarded_for(&self, trigger: &T) -> Option<&TriggerConfig<S, T, C>> {
        self.unguarded.get(trigger)
    }

    pub(crate) fn guarded_for(&self, trigger: &T) -> Option<&[TriggerConfig<S, T, C>]> {
        self.guarded.get(trigger).map(Vec::as_slice)
    }

    pub(crate) fn trigger_configs(&self) -> impl Iterator<Item = &TriggerConfig<S, T, C>> {
        self.unguarded
            .values()
            .chain(self.guarded.values().flatten())
    }
}
