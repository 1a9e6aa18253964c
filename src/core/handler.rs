//! Entry/exit handlers and trigger actions.
//!
//! Handlers are the per-state lifecycle callbacks: `entering` runs after a
//! transition commits, `exiting` runs before the source state is left. Both
//! may suspend. `entering` receives a [`FireHandle`] so it can enqueue
//! further triggers; those are appended to the machine's queue and picked
//! up by the already-running drain loop, never processed recursively.

use crate::engine::FireHandle;
use async_trait::async_trait;

/// Error type reported by handlers, actions and listeners.
///
/// Callback failures propagate out of the drain loop unmodified as
/// [`EngineError::Callback`](crate::EngineError::Callback); the engine does
/// not retry or roll back the current state.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Per-state entry/exit lifecycle callbacks.
///
/// Every state entered by the engine must have a handler attached via
/// [`StateConfig::handled_by`](crate::StateConfig::handled_by); a missing
/// handler is reported at [`start`](crate::StateMachine::start) time.
///
/// # Example
///
/// ```rust
/// use switchyard::{async_trait, CallbackError, FireHandle, Handler};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Event {
///     Loaded,
/// }
///
/// struct LoaderContext {
///     records: u32,
/// }
///
/// struct Loading;
///
/// #[async_trait]
/// impl Handler<Event, LoaderContext> for Loading {
///     async fn entering(
///         &self,
///         fire: &FireHandle<Event>,
///         ctx: &mut LoaderContext,
///     ) -> Result<(), CallbackError> {
///         ctx.records = 42;
///         // Queue the next trigger; the running drain loop picks it up.
///         fire.fire(Event::Loaded);
///         Ok(())
///     }
///
///     async fn exiting(&self, _ctx: &mut LoaderContext) -> Result<(), CallbackError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<T, C>: Send + Sync {
    /// Called after the machine has committed entry into the handler's
    /// state. Triggers fired through `fire` are queued, not recursed into.
    async fn entering(&self, fire: &FireHandle<T>, context: &mut C) -> Result<(), CallbackError>;

    /// Called before the machine leaves the handler's state.
    async fn exiting(&self, context: &mut C) -> Result<(), CallbackError>;
}

/// Side-effecting callable attached to a trigger with
/// [`TriggerConfig::execute`](crate::TriggerConfig::execute).
///
/// Runs with exclusive access to the context; the current state is
/// unchanged. Blanket-implemented for synchronous closures
/// `Fn(&mut C) -> Result<(), CallbackError>`; implement the trait directly
/// when the action needs to suspend.
#[async_trait]
pub trait TriggerAction<C>: Send + Sync {
    /// Execute the action against the context.
    async fn run(&self, context: &mut C) -> Result<(), CallbackError>;
}

#[async_trait]
impl<C, F> TriggerAction<C> for F
where
    C: Send + 'static,
    F: Fn(&mut C) -> Result<(), CallbackError> + Send + Sync,
{
    async fn run(&self, context: &mut C) -> Result<(), CallbackError> {
        self(context)
    }
}
