//! Core traits shared by the configuration model and the engine.
//!
//! - Identifier traits for states and triggers
//! - The `Context` record the engine mutates and callbacks read
//! - Synchronous `Guard` predicates
//! - Async `Handler`, `TriggerAction` and listener traits

mod context;
mod guard;
mod handler;
mod id;
mod listener;

pub use context::Context;
pub use guard::Guard;
pub use handler::{CallbackError, Handler, TriggerAction};
pub use id::{StateId, TriggerId};
pub use listener::{InvalidTriggerListener, TransitionListener};
