//! Switchyard: an async finite state machine runtime with queued trigger
//! processing.
//!
//! A machine is described declaratively — states, the triggers each state
//! accepts, optional guard predicates, optional default (state-independent)
//! triggers and per-state entry/exit handlers — and then driven strictly by
//! fired triggers. Triggers are processed serially in FIFO order even when
//! handlers fire further triggers, and a running instance's position can be
//! serialized through its context and resumed in a fresh instance.
//!
//! # Core concepts
//!
//! - [`MachineModel`]: immutable-after-build graph of [`StateConfig`]s,
//!   each mapping triggers to write-once effects (transition, action or
//!   explicit ignore), plus one optional default configuration consulted
//!   as a fallback.
//! - [`StateMachine`]: owns the trigger queue and current-state pointer;
//!   resolves each dequeued trigger (exact match, then guarded match in
//!   registration order, then default) and executes its effect with
//!   ordered lifecycle callbacks.
//! - [`Context`]: the shared mutable record carrying domain data and the
//!   machine's recorded state, enabling serialization and resumption.
//! - [`Handler`], [`TransitionListener`], [`InvalidTriggerListener`]:
//!   async callbacks; guards stay synchronous.
//!
//! # Example
//!
//! ```rust
//! use switchyard::{
//!     async_trait, CallbackError, Context, FireHandle, Handler, MachineModel, StateMachine,
//! };
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Phase {
//!     Idle,
//!     Busy,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Event {
//!     Begin,
//!     Finish,
//! }
//!
//! #[derive(Default)]
//! struct JobContext {
//!     state: Option<Phase>,
//!     jobs_done: u32,
//! }
//!
//! impl Context<Phase> for JobContext {
//!     fn state(&self) -> Option<&Phase> {
//!         self.state.as_ref()
//!     }
//!
//!     fn set_state(&mut self, state: Phase) {
//!         self.state = Some(state);
//!     }
//! }
//!
//! struct Quiet;
//!
//! #[async_trait]
//! impl Handler<Event, JobContext> for Quiet {
//!     async fn entering(
//!         &self,
//!         _fire: &FireHandle<Event>,
//!         _ctx: &mut JobContext,
//!     ) -> Result<(), CallbackError> {
//!         Ok(())
//!     }
//!
//!     async fn exiting(&self, _ctx: &mut JobContext) -> Result<(), CallbackError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut model = MachineModel::new();
//! model.state(Phase::Idle).handled_by(Quiet).on(Event::Begin)?.goes_to(Phase::Busy)?;
//! model
//!     .state(Phase::Busy)
//!     .handled_by(Quiet)
//!     .on(Event::Finish)?
//!     .execute(|ctx: &mut JobContext| -> Result<(), CallbackError> {
//!         ctx.jobs_done += 1;
//!         Ok(())
//!     })?;
//! model.mark_initial(Phase::Idle);
//!
//! let mut machine = StateMachine::new(model, JobContext::default());
//! machine.start().await?;
//! machine.fire(Event::Begin).await?;
//! machine.fire(Event::Finish).await?;
//!
//! assert_eq!(machine.current_state(), Some(&Phase::Busy));
//! assert_eq!(machine.context().jobs_done, 1);
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use checkpoint::{Checkpoint, CheckpointError, CHECKPOINT_VERSION};
pub use config::{ConfigError, MachineModel, StateConfig, TriggerConfig};
pub use crate::core::{
    CallbackError, Context, Guard, Handler, InvalidTriggerListener, StateId, TransitionListener,
    TriggerAction, TriggerId,
};
pub use engine::{EngineError, FireHandle, StateMachine};

// Handler and listener impls are written with this attribute; re-exported
// so downstream crates need no direct async-trait dependency.
pub use async_trait::async_trait;
