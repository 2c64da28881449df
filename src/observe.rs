//! History observers notified after each successful calculation.

use std::sync::Arc;

use tracing::info;

use crate::calc::Calculation;
use crate::config::CalculatorConfig;
use crate::error::OperationError;
use crate::persist::{HistoryStore, csv::CsvHistoryStore};

/// Payload handed to observers: the new calculation plus a view of the
/// post-append history.
#[derive(Debug)]
pub struct HistoryEvent<'a> {
    /// The calculation that was just performed.
    pub calculation: &'a Calculation,
    /// Current history including the new calculation.
    pub history: &'a [Arc<Calculation>],
}

/// Notification sink invoked synchronously, in registration order, once per
/// successful `perform_operation`.
pub trait HistoryObserver {
    /// Stable name used for registration bookkeeping and removal.
    fn name(&self) -> &'static str;

    /// Reacts to a new calculation. A failure propagates out of
    /// `perform_operation` as an [`OperationError`].
    fn update(&mut self, event: &HistoryEvent<'_>) -> Result<(), OperationError>;
}

/// Stateless observer that writes a structured log line per calculation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl HistoryObserver for LoggingObserver {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn update(&mut self, event: &HistoryEvent<'_>) -> Result<(), OperationError> {
        let calc = event.calculation;
        info!(
            "Calculation performed: {} ({}, {}) = {}",
            calc.operation(),
            calc.operand1(),
            calc.operand2(),
            calc.result()
        );
        Ok(())
    }
}

/// Observer that persists the history after each calculation when auto-save
/// is enabled.
///
/// Holds only the narrow persist capability (flag plus store); it never owns
/// or references the engine.
#[derive(Debug, Clone)]
pub struct AutoSaveObserver {
    auto_save: bool,
    store: CsvHistoryStore,
}

impl AutoSaveObserver {
    /// Builds the observer from the configuration's auto-save flag and
    /// history file path.
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            auto_save: config.auto_save(),
            store: CsvHistoryStore::new(config.history_file().clone()),
        }
    }
}

impl HistoryObserver for AutoSaveObserver {
    fn name(&self) -> &'static str {
        "auto-save"
    }

    fn update(&mut self, event: &HistoryEvent<'_>) -> Result<(), OperationError> {
        if !self.auto_save {
            return Ok(());
        }
        self.store
            .save(event.history)
            .map_err(|err| OperationError::new(format!("Failed to save history: {err}")))?;
        info!("history auto-saved");
        Ok(())
    }
}
