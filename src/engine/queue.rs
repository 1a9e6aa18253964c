//! The serial trigger queue shared between the engine and handlers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// FIFO queue of pending triggers, owned by one engine instance.
///
/// Append-only at the tail, consumed from the head, drained to empty
/// between activations and never persisted. The mutex recovers from
/// poisoning: a panicking callback must not wedge the queue.
pub(crate) struct TriggerQueue<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> TriggerQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    fn locked(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, trigger: T) {
        self.locked().push_back(trigger);
    }

    pub(crate) fn pop(&self) -> Option<T> {
        self.locked().pop_front()
    }

    /// Discard unconsumed entries after an aborted drain.
    pub(crate) fn clear(&self) {
        self.locked().clear();
    }

    pub(crate) fn handle(&self) -> FireHandle<T> {
        FireHandle {
            queue: Arc::clone(&self.inner),
        }
    }
}

/// Enqueue-only capability handed to entry handlers.
///
/// Firing through the handle appends to the engine's queue; the trigger is
/// processed by the already-running drain loop, after everything queued
/// before it. The handle can never start a second loop or interleave one
/// trigger's effects with another's.
pub struct FireHandle<T> {
    queue: Arc<Mutex<VecDeque<T>>>,
}

impl<T> FireHandle<T> {
    /// Append a trigger to the tail of the queue.
    pub fn fire(&self, trigger: T) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(trigger);
    }
}

impl<T> Clone for FireHandle<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}
