//! Configuration errors.

use thiserror::Error;

/// Errors raised while building or validating a configuration model.
///
/// All of these signal a programming error in the configuration: they are
/// detected eagerly (at registration or at
/// [`start`](crate::StateMachine::start)) and must not be retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("trigger '{trigger}' on state '{state}' is already configured as '{existing}'; cannot reconfigure it as '{requested}'")]
    ConflictingEffects {
        state: String,
        trigger: String,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("trigger '{trigger}' on state '{state}' already has guarded configurations; an unguarded configuration cannot be added")]
    UnguardedAfterGuarded { state: String, trigger: String },

    #[error("trigger '{trigger}' on state '{state}' already has an unguarded configuration; a guarded configuration cannot be added")]
    GuardedAfterUnguarded { state: String, trigger: String },

    #[error("trigger '{trigger}' on state '{state}' was registered but never given an effect. Call goes_to(), execute() or ignore()")]
    MissingEffect { state: String, trigger: String },

    #[error("trigger '{trigger}' on state '{state}' targets state '{target}', which has no configuration")]
    UnknownTarget {
        state: String,
        trigger: String,
        target: String,
    },

    #[error("trigger '{trigger}' on state '{state}' targets state '{target}', which has no handler attached")]
    TargetMissingHandler {
        state: String,
        trigger: String,
        target: String,
    },
}
