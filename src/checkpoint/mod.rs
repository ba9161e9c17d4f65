//! Snapshot and restore for identification sessions.
//!
//! The machine never persists anything on its own. Hosts that need a
//! session to survive a page reload or process restart capture a
//! [`Snapshot`], store it wherever they like, and restore it later.
//! Transition tables hold closures and are not serialized; a restored
//! machine runs the standard table.

use crate::core::{IdentifyState, MachineContext, StateHistory};
use crate::machine::{standard_table, IdentifyMachine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable capture of a machine's state, context and history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    pub taken_at: DateTime<Utc>,

    pub state: IdentifyState,

    pub context: MachineContext,

    pub history: StateHistory<IdentifyState>,
}

impl Snapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Serialize to a compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Check the snapshot describes a state the machine could have reached.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let has_token = self.context.challenge.auth_token.is_some();
        let in_success = self.state == IdentifyState::Success;
        if has_token != in_success {
            return Err(CheckpointError::ValidationFailed(format!(
                "auth token {} in state {}",
                if has_token { "present" } else { "missing" },
                self.state
            )));
        }

        if let Some(last) = self.history.last() {
            if last.to != self.state {
                return Err(CheckpointError::ValidationFailed(format!(
                    "history ends in {} but state is {}",
                    last.to, self.state
                )));
            }
        }
        Ok(())
    }
}

impl IdentifyMachine {
    /// Capture the current session.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            state: self.state(),
            context: self.context().clone(),
            history: self.history().clone(),
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// Eventless rows do not run: the snapshot is taken as already settled.
    pub fn restore(snapshot: Snapshot) -> Result<Self, CheckpointError> {
        snapshot.validate()?;
        tracing::debug!(id = %snapshot.id, state = %snapshot.state, "restoring snapshot");

        Ok(Self::from_parts(
            Arc::new(standard_table()?),
            snapshot.state,
            snapshot.context,
            snapshot.history,
        ))
    }
}
