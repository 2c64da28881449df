//! Persistence abstraction over the tabular history store.

pub mod csv;

use std::sync::Arc;

use thiserror::Error;

use crate::calc::Calculation;

/// Faults raised by history stores and memento export.
#[derive(Debug, Error)]
pub enum PersistError {
    /// CSV encode/decode fault.
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    /// Filesystem fault.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encode/decode fault.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Any other persistence fault.
    #[error("{0}")]
    Message(String),
}

/// Convenience alias for persistence results.
pub type PersistResult<T> = Result<T, PersistError>;

/// Bulk history serialization seam.
///
/// `save` writes the whole history list wholesale, never incrementally;
/// `load` of an absent or empty store yields an empty history, not an error.
pub trait HistoryStore {
    /// Persists the full history list.
    fn save(&self, history: &[Arc<Calculation>]) -> PersistResult<()>;

    /// Loads the full history list.
    fn load(&self) -> PersistResult<Vec<Arc<Calculation>>>;
}
