//! History snapshots backing undo/redo.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calc::{Calculation, HistoryRow};
use crate::persist::{PersistError, PersistResult};

/// Version number for serialized [`MementoEnvelope`] payloads.
pub const MEMENTO_FORMAT_VERSION: u16 = 1;

/// Immutable snapshot of the history list plus capture time.
///
/// Snapshots share the underlying [`Calculation`] records with the live
/// history (`Arc` per record). Records are immutable, so appending to or
/// evicting from the live history never mutates a stored snapshot.
/// Mementos are owned exclusively by the engine's undo/redo stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMemento {
    history: Vec<Arc<Calculation>>,
    timestamp: NaiveDateTime,
}

/// Versioned wrapper for stable memento export payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MementoEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Snapshot capture time, ISO-8601.
    pub timestamp: String,
    /// History rows at capture time.
    pub history: Vec<HistoryRow>,
}

impl HistoryMemento {
    /// Captures a snapshot of `history` at the current time.
    pub fn capture(history: &[Arc<Calculation>]) -> Self {
        Self {
            history: history.to_vec(),
            timestamp: Local::now().naive_local(),
        }
    }

    /// Consumes the memento, yielding the snapshotted history.
    pub fn into_history(self) -> Vec<Arc<Calculation>> {
        self.history
    }

    /// Snapshotted history.
    pub fn history(&self) -> &[Arc<Calculation>] {
        &self.history
    }

    /// Capture time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Exports the snapshot as a versioned JSON payload. Export only;
    /// in-process undo/redo uses the live snapshots.
    pub fn to_json(&self) -> PersistResult<String> {
        let envelope = MementoEnvelope {
            format_version: MEMENTO_FORMAT_VERSION,
            timestamp: self.timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            history: self.history.iter().map(|calc| calc.to_row()).collect(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Reconstructs a snapshot from its JSON payload, re-deriving every
    /// record result.
    pub fn from_json(payload: &str) -> PersistResult<Self> {
        let envelope: MementoEnvelope = serde_json::from_str(payload)?;
        if envelope.format_version != MEMENTO_FORMAT_VERSION {
            return Err(PersistError::Message(format!(
                "unsupported memento format version: {}",
                envelope.format_version
            )));
        }
        let timestamp = envelope
            .timestamp
            .parse::<NaiveDateTime>()
            .map_err(|err| PersistError::Message(format!("invalid memento timestamp: {err}")))?;
        let mut history = Vec::with_capacity(envelope.history.len());
        for row in &envelope.history {
            let calc =
                Calculation::from_row(row).map_err(|err| PersistError::Message(err.message))?;
            history.push(Arc::new(calc));
        }
        Ok(Self { history, timestamp })
    }
}
