//! The transition engine: queued trigger processing over a configuration
//! model.
//!
//! One [`StateMachine`] owns a model, a context and a trigger queue. Work
//! is cooperative and serial: [`fire`](StateMachine::fire) appends to the
//! queue and drains it, and triggers fired from inside handlers (through a
//! [`FireHandle`]) are appended to the same queue rather than processed
//! recursively. Two logical triggers can therefore never interleave their
//! effects, and triggers are always fully processed in firing order, no
//! matter how deeply nested the firing call site is.
//!
//! The spec-level "active loop flag" is structural here: the drain loop
//! runs under `&mut self`, so a second concurrent loop per instance is
//! rejected at compile time, and a `FireHandle` can only append.

pub mod error;
pub(crate) mod queue;
mod resolver;

pub use error::EngineError;
pub use queue::FireHandle;

use crate::checkpoint::Checkpoint;
use crate::config::{MachineModel, TriggerEffect};
use crate::core::{Context, Handler, InvalidTriggerListener, StateId, TransitionListener, TriggerId};
use queue::TriggerQueue;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Drives one instance through transitions strictly according to fired
/// triggers.
///
/// See the crate-level documentation for a complete example.
pub struct StateMachine<S, T, C>
where
    S: StateId,
    T: TriggerId,
    C: Context<S>,
{
    model: MachineModel<S, T, C>,
    context: C,
    current: Option<S>,
    queue: TriggerQueue<T>,
    transition_listener: Option<Arc<dyn TransitionListener<S, T>>>,
    invalid_listener: Option<Arc<dyn InvalidTriggerListener<S, T>>>,
}

impl<S, T, C> StateMachine<S, T, C>
where
    S: StateId,
    T: TriggerId,
    C: Context<S>,
{
    /// Create an engine over a finished model and a caller-supplied
    /// context.
    ///
    /// The model moves into the engine and is read-only from here on. A
    /// context whose `state()` is `Some` puts the engine on the resume
    /// path at [`start`](Self::start).
    pub fn new(model: MachineModel<S, T, C>, context: C) -> Self {
        Self {
            model,
            context,
            current: None,
            queue: TriggerQueue::new(),
            transition_listener: None,
            invalid_listener: None,
        }
    }

    /// Install a listener notified on every committed transition.
    pub fn with_transition_listener<L>(mut self, listener: L) -> Self
    where
        L: TransitionListener<S, T> + 'static,
    {
        self.transition_listener = Some(Arc::new(listener));
        self
    }

    /// Install a listener that recovers unresolved triggers.
    ///
    /// Without it, an unresolved trigger aborts the drain loop with
    /// [`EngineError::UnresolvedTrigger`].
    pub fn with_invalid_trigger_listener<L>(mut self, listener: L) -> Self
    where
        L: InvalidTriggerListener<S, T> + 'static,
    {
        self.invalid_listener = Some(Arc::new(listener));
        self
    }

    /// Validate the model and enter the initial business state.
    ///
    /// The initial state is the context's recorded state if present (the
    /// resume path), else the state named by
    /// [`mark_initial`](MachineModel::mark_initial). The transition
    /// listener is notified with no trigger and no source; the state's
    /// entry callback runs only when not resuming, so restoring a
    /// serialized context never re-runs entry side effects for the state
    /// the instance is already parked in. Triggers the entry callback
    /// enqueues are drained before `start` returns.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if self.current.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        self.model.validate()?;

        let resuming = self.context.state().is_some();
        let initial = match self.context.state() {
            Some(state) => state.clone(),
            None => self
                .model
                .initial()
                .cloned()
                .ok_or(EngineError::MissingInitialState)?,
        };
        let entry = self.handler_for(&initial)?;
        debug!(state = ?initial, resuming, "starting state machine");

        self.current = Some(initial.clone());
        self.context.set_state(initial.clone());

        if let Some(listener) = self.transition_listener.clone() {
            listener
                .on_transition(None, None, &initial)
                .await
                .map_err(EngineError::Callback)?;
        }
        if !resuming {
            let fire = self.queue.handle();
            if let Err(err) = entry.entering(&fire, &mut self.context).await {
                self.queue.clear();
                return Err(EngineError::Callback(err));
            }
        }
        self.drain().await
    }

    /// Fire a trigger against the current state.
    ///
    /// The trigger is appended to the queue, then the queue is drained in
    /// FIFO order; triggers that handlers fire while this call is draining
    /// are picked up by the same loop. On an error the drain stops and
    /// unconsumed queue entries are discarded.
    pub async fn fire(&mut self, trigger: T) -> Result<(), EngineError> {
        if self.current.is_none() {
            return Err(EngineError::NotStarted);
        }
        self.queue.push(trigger);
        self.drain().await
    }

    /// The current business state, or `None` before [`start`](Self::start).
    pub fn current_state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Triggers registered on the current state, guarded or unguarded.
    ///
    /// Default-configuration triggers are not included; the resolver
    /// consults them on demand rather than surfacing them as primary
    /// affordances of the state.
    pub fn valid_triggers(&self) -> Vec<T> {
        self.current
            .as_ref()
            .and_then(|state| self.model.state_config(state))
            .map(|config| config.triggers())
            .unwrap_or_default()
    }

    /// Shared view of the context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Exclusive view of the context.
    ///
    /// Only reachable while no drain loop is running, so callers cannot
    /// race the engine's own context accesses.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consume the engine and hand the context back.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Snapshot the context into a versioned [`Checkpoint`].
    ///
    /// The engine is quiescent whenever this is callable (queue empty, no
    /// drain running), so the snapshot always captures a resumable state.
    pub fn checkpoint(&self) -> Checkpoint<C>
    where
        C: Clone + Serialize,
    {
        Checkpoint::capture(&self.context)
    }

    async fn drain(&mut self) -> Result<(), EngineError> {
        while let Some(trigger) = self.queue.pop() {
            if let Err(err) = self.dispatch(trigger).await {
                self.queue.clear();
                return Err(err);
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, trigger: T) -> Result<(), EngineError> {
        let Some(current) = self.current.clone() else {
            return Err(EngineError::NotStarted);
        };
        trace!(state = ?current, trigger = ?trigger, "processing trigger");

        let state_config =
            self.model
                .state_config(&current)
                .ok_or_else(|| EngineError::UnknownState {
                    state: format!("{current:?}"),
                })?;
        let resolved = resolver::resolve(
            state_config,
            self.model.fallback_config(),
            &trigger,
            &self.context,
        );

        match resolved {
            None => match self.invalid_listener.clone() {
                Some(listener) => {
                    warn!(state = ?current, trigger = ?trigger, "unresolved trigger recovered by listener");
                    listener
                        .on_invalid(&current, &trigger)
                        .await
                        .map_err(EngineError::Callback)?;
                }
                None => {
                    return Err(EngineError::UnresolvedTrigger {
                        trigger: format!("{trigger:?}"),
                        state: format!("{current:?}"),
                    });
                }
            },
            Some(TriggerEffect::Ignore) => {
                trace!(state = ?current, trigger = ?trigger, "trigger ignored");
            }
            Some(TriggerEffect::Action(action)) => {
                action
                    .run(&mut self.context)
                    .await
                    .map_err(EngineError::Callback)?;
            }
            Some(TriggerEffect::Transition(target)) => {
                self.transition(trigger, current, target).await?;
            }
        }
        Ok(())
    }

    /// Execute one committed transition: exit the source, notify the
    /// listener, record the target, enter the target.
    async fn transition(&mut self, trigger: T, source: S, target: S) -> Result<(), EngineError> {
        let exit = self.handler_for(&source)?;
        exit.exiting(&mut self.context)
            .await
            .map_err(EngineError::Callback)?;

        if let Some(listener) = self.transition_listener.clone() {
            listener
                .on_transition(Some(&trigger), Some(&source), &target)
                .await
                .map_err(EngineError::Callback)?;
        }
        debug!(source = ?source, target = ?target, trigger = ?trigger, "transition");

        self.current = Some(target.clone());
        self.context.set_state(target.clone());

        let entry = self.handler_for(&target)?;
        let fire = self.queue.handle();
        entry
            .entering(&fire, &mut self.context)
            .await
            .map_err(EngineError::Callback)
    }

    fn handler_for(&self, state: &S) -> Result<Arc<dyn Handler<T, C>>, EngineError> {
        let config = self
            .model
            .state_config(state)
            .ok_or_else(|| EngineError::UnknownState {
                state: format!("{state:?}"),
            })?;
        config.handler().ok_or_else(|| EngineError::MissingHandler {
            state: format!("{state:?}"),
        })
    }
}
