//! Checkpoint and resume support.
//!
//! A checkpoint wraps the caller's context — the one record that carries
//! the machine's position plus domain data — in a versioned, identifiable
//! envelope. Restoring is the mirror image: decode the checkpoint, take
//! the context out and hand it to a fresh engine; `start()` then resumes
//! in the recorded state without re-running its entry callback.
//!
//! The envelope is a convenience. Callers who own their persistence format
//! can serialize the context directly instead.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for the checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's context.
///
/// Capture one at any quiescent point (queue empty, no drain running) via
/// [`StateMachine::checkpoint`](crate::StateMachine::checkpoint) or
/// [`Checkpoint::capture`].
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use switchyard::Checkpoint;
///
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// struct OrderContext {
///     state: Option<String>,
///     items: u32,
/// }
///
/// let context = OrderContext {
///     state: Some("Packed".to_string()),
///     items: 3,
/// };
///
/// let checkpoint = Checkpoint::capture(&context);
/// let json = checkpoint.to_json()?;
///
/// let restored: Checkpoint<OrderContext> = Checkpoint::from_json(&json)?;
/// assert_eq!(restored.into_context(), context);
/// # Ok::<(), switchyard::CheckpointError>(())
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint<C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When the checkpoint was captured
    pub created_at: DateTime<Utc>,

    /// The wrapped context, including the machine's recorded state
    pub context: C,
}

impl<C> Checkpoint<C> {
    /// Snapshot a context into a fresh, uniquely identified checkpoint.
    pub fn capture(context: &C) -> Self
    where
        C: Clone,
    {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            context: context.clone(),
        }
    }

    /// Take the context back out, ready to hand to a fresh engine.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError>
    where
        C: Serialize,
    {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, rejecting incompatible format versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError>
    where
        C: DeserializeOwned,
    {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate_version()?;
        Ok(checkpoint)
    }

    /// Encode as a compact binary blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError>
    where
        C: Serialize,
    {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from a binary blob, rejecting incompatible format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError>
    where
        C: DeserializeOwned,
    {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate_version()?;
        Ok(checkpoint)
    }

    fn validate_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
