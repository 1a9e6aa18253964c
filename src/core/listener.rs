//! Optional engine notification hooks.
//!
//! Listeners observe the engine without influencing trigger resolution.
//! Their failures propagate exactly like handler failures and abort the
//! current drain loop.

use crate::core::handler::CallbackError;
use async_trait::async_trait;

/// Notified on every committed transition.
///
/// The trigger and source state are `None` for the initial entry performed
/// by [`start`](crate::StateMachine::start), which has no firing trigger
/// and no source state.
///
/// Blanket-implemented for closures `Fn(Option<&T>, Option<&S>, &S)`;
/// implement the trait directly when the listener needs to suspend or fail.
#[async_trait]
pub trait TransitionListener<S, T>: Send + Sync {
    /// Observe a committed transition.
    async fn on_transition(
        &self,
        trigger: Option<&T>,
        source: Option<&S>,
        target: &S,
    ) -> Result<(), CallbackError>;
}

#[async_trait]
impl<S, T, F> TransitionListener<S, T> for F
where
    S: Sync,
    T: Sync,
    F: Fn(Option<&T>, Option<&S>, &S) + Send + Sync,
{
    async fn on_transition(
        &self,
        trigger: Option<&T>,
        source: Option<&S>,
        target: &S,
    ) -> Result<(), CallbackError> {
        self(trigger, source, target);
        Ok(())
    }
}

/// Notified when a fired trigger resolves to no configuration.
///
/// Installing this listener turns unresolved triggers from fatal
/// [`EngineError::UnresolvedTrigger`](crate::EngineError::UnresolvedTrigger)
/// errors into locally recovered events: the listener is invoked and the
/// drain loop continues with the next queued trigger.
///
/// Blanket-implemented for closures `Fn(&S, &T)`.
#[async_trait]
pub trait InvalidTriggerListener<S, T>: Send + Sync {
    /// Observe an unresolved trigger in the given state.
    async fn on_invalid(&self, state: &S, trigger: &T) -> Result<(), CallbackError>;
}

#[async_trait]
impl<S, T, F> InvalidTriggerListener<S, T> for F
where
    S: Sync,
    T: Sync,
    F: Fn(&S, &T) + Send + Sync,
{
    async fn on_invalid(&self, state: &S, trigger: &T) -> Result<(), CallbackError> {
        self(state, trigger);
        Ok(())
    }
}
