//! Engine errors.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by [`StateMachine`](crate::StateMachine) operations.
///
/// Configuration problems surface eagerly at `start()` and are fatal.
/// `UnresolvedTrigger` is recoverable only by installing an
/// invalid-trigger listener; `Callback` wraps a failure raised inside a
/// handler, action or listener and aborts the current drain loop, leaving
/// remaining queued triggers discarded.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("state machine already started")]
    AlreadyStarted,

    #[error("state machine not started. Call start() before firing triggers")]
    NotStarted,

    #[error("no initial state available. Call mark_initial() on the model or resume from a context with a recorded state")]
    MissingInitialState,

    #[error("state '{state}' has no registered configuration")]
    UnknownState { state: String },

    #[error("state '{state}' has no handler attached. Call handled_by()")]
    MissingHandler { state: String },

    #[error("trigger '{trigger}' cannot be handled in state '{state}'")]
    UnresolvedTrigger { trigger: String, state: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("callback failed: {0}")]
    Callback(Box<dyn std::error::Error + Send + Sync>),
}
