//! The shared mutable context record.
//!
//! A context carries cross-state domain data plus the machine's recorded
//! state. The engine holds the context exclusively for its entire lifetime
//! and hands out `&mut` references only to the callbacks it invokes within
//! its own drain loop, so no locking is needed inside guards or handlers.

/// Record shared by all states, guards and handlers of one machine instance.
///
/// The engine writes the recorded state on every committed transition, so
/// serializing the context at any quiescent point (queue empty, no drain
/// running) captures enough information to resume: construct a fresh engine
/// with a context whose `state()` returns the prior value and call
/// [`start`](crate::StateMachine::start).
///
/// Serialization of the concrete context type is owned by the caller —
/// derive `serde` traits on it and use any format, or wrap it in a
/// [`Checkpoint`](crate::Checkpoint).
///
/// # Example
///
/// ```rust
/// use switchyard::Context;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Phase {
///     Idle,
///     Busy,
/// }
///
/// #[derive(Default)]
/// struct JobContext {
///     state: Option<Phase>,
///     jobs_done: u32,
/// }
///
/// impl Context<Phase> for JobContext {
///     fn state(&self) -> Option<&Phase> {
///         self.state.as_ref()
///     }
///
///     fn set_state(&mut self, state: Phase) {
///         self.state = Some(state);
///     }
/// }
/// ```
pub trait Context<S>: Send + 'static {
    /// The machine's recorded state, if any.
    ///
    /// `Some` either after the engine has committed a transition or when
    /// the context was restored from a prior run (the resume path).
    fn state(&self) -> Option<&S>;

    /// Record the machine's current state.
    ///
    /// Called by the engine on start and on every committed transition.
    fn set_state(&mut self, state: S);
}
