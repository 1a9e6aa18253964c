//! The configuration model: an immutable-after-build graph of states.
//!
//! Built once through the fluent registration API, then handed to a
//! [`StateMachine`](crate::StateMachine), which treats it as read-only.
//! Eager validation of the graph happens at
//! [`start`](crate::StateMachine::start).
//!
//! # Example
//!
//! ```rust
//! use switchyard::MachineModel;
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Light {
//!     Red,
//!     Green,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Cue {
//!     Go,
//!     Stop,
//! }
//!
//! struct Ctx;
//!
//! let mut model: MachineModel<Light, Cue, Ctx> = MachineModel::new();
//! model.state(Light::Red).on(Cue::Go)?.goes_to(Light::Green)?;
//! model.state(Light::Green).on(Cue::Stop)?.goes_to(Light::Red)?;
//! // A cross-cutting fallback, consulted only when the current state has
//! // no entry for the fired trigger.
//! model.default_state().on(Cue::Go)?.ignore()?;
//! model.mark_initial(Light::Red);
//! # Ok::<(), switchyard::ConfigError>(())
//! ```

pub mod error;
mod state;
mod trigger;

pub use error::ConfigError;
pub use state::StateConfig;
pub use trigger::TriggerConfig;

pub(crate) use trigger::TriggerEffect;

use crate::core::{StateId, TriggerId};
use std::collections::HashMap;

/// Declarative description of states, triggers, guards and handlers.
///
/// `state` and `default_state` are idempotent get-or-create operations, so
/// configuration can be spread across several call sites. The model is a
/// plain value; ownership moves into the engine, which makes post-start
/// mutation impossible.
pub struct MachineModel<S, T, C> {
    states: HashMap<S, StateConfig<S, T, C>>,
    fallback: Option<StateConfig<S, T, C>>,
    initial: Option<S>,
}

impl<S, T, C> MachineModel<S, T, C>
where
    S: StateId,
    T: TriggerId,
{
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            fallback: None,
            initial: None,
        }
    }

    /// Get or create the configuration for `id`.
    ///
    /// Repeated calls with the same identifier return the same
    /// configuration.
    pub fn state(&mut self, id: S) -> &mut StateConfig<S, T, C> {
        self.states
            .entry(id.clone())
            .or_insert_with(|| StateConfig::for_state(id))
    }

    /// Get or create the one default configuration.
    ///
    /// Its trigger maps are consulted only when the current state's own
    /// configuration has no entry for a fired trigger; a same-named trigger
    /// on the current state always wins.
    pub fn default_state(&mut self) -> &mut StateConfig<S, T, C> {
        self.fallback.get_or_insert_with(StateConfig::fallback)
    }

    /// Record the state the engine must enter when the context carries no
    /// prior state.
    pub fn mark_initial(&mut self, id: S) {
        self.initial = Some(id);
    }

    pub(crate) fn initial(&self) -> Option<&S> {
        self.initial.as_ref()
    }

    pub(crate) fn state_config(&self, id: &S) -> Option<&StateConfig<S, T, C>> {
        self.states.get(id)
    }

    pub(crate) fn fallback_config(&self) -> Option<&StateConfig<S, T, C>> {
        self.fallback.as_ref()
    }

    /// Eager whole-graph checks, run once at engine start.
    ///
    /// Every registered trigger must carry an effect, and every transition
    /// target must name a configured state with a handler attached.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for config in self.states.values().chain(self.fallback.iter()) {
            for trigger_config in config.trigger_configs() {
                match trigger_config.effect() {
                    None => {
                        return Err(ConfigError::MissingEffect {
                            state: config.display_name(),
                            trigger: trigger_config.trigger_name(),
                        })
                    }
                    Some(TriggerEffect::Transition(target)) => {
                        let Some(target_config) = self.states.get(target) else {
                            return Err(ConfigError::UnknownTarget {
                                state: config.display_name(),
                                trigger: trigger_config.trigger_name(),
                                target: format!("{target:?}"),
                            });
                        };
                        if target_config.handler().is_none() {
                            return Err(ConfigError::TargetMissingHandler {
                                state: config.display_name(),
                                trigger: trigger_config.trigger_name(),
                                target: format!("{target:?}"),
                            });
                        }
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

impl<S, T, C> Default for MachineModel<S, T, C>
where
    S: StateId,
    T: TriggerId,
{
    fn default() -> Self {
        Self::new()
    }
}
