//! Identifier traits for states and triggers.
//!
//! States and triggers are opaque to the engine: any value that can be
//! cloned, compared, hashed and debugged can key a configuration. Both
//! traits are blanket-implemented, so plain enums work out of the box.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifies a state in the configuration model.
///
/// Uniquely keys exactly one state configuration and must be stable for
/// the lifetime of the model. Typically a fieldless enum.
///
/// # Example
///
/// ```rust
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum DoorState {
///     Open,
///     Closed,
/// }
/// // DoorState is a StateId automatically.
/// fn assert_state_id<S: switchyard::StateId>() {}
/// assert_state_id::<DoorState>();
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<S> StateId for S where S: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Identifies a trigger that may be fired against the current state.
///
/// Scoped per state (and per the default pseudo-state); the same trigger
/// value may be configured differently on different states.
pub trait TriggerId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> TriggerId for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
