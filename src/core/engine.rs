use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::calc::Calculation;
use crate::config::CalculatorConfig;
use crate::error::{ConfigError, OperationError};
use crate::observe::{HistoryEvent, HistoryObserver};
use crate::ops::Operation;
use crate::persist::{HistoryStore, csv::CsvHistoryStore};
use crate::validate;

use super::memento::HistoryMemento;

/// Calculator engine: orchestrates validation, execution, recording,
/// undo/redo stack maintenance, bounded history eviction, and persistence.
///
/// Single-threaded by design; wrap each public method in external locking if
/// an instance is ever shared across threads, since the undo/redo push-pair
/// is not atomic against interleaved calls.
pub struct Calculator {
    config: CalculatorConfig,
    history: Vec<Arc<Calculation>>,
    undo_stack: Vec<HistoryMemento>,
    redo_stack: Vec<HistoryMemento>,
    observers: Vec<Box<dyn HistoryObserver>>,
    strategy: Option<Box<dyn Operation>>,
    store: CsvHistoryStore,
}

impl Calculator {
    /// Constructs an engine for one session.
    ///
    /// Validates the configuration, creates the history directory, and loads
    /// any persisted history. A load failure is logged and the engine starts
    /// with an empty history; a configuration fault is fatal.
    pub fn new(config: CalculatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        std::fs::create_dir_all(config.history_dir()).map_err(|err| {
            ConfigError::new(format!(
                "cannot create history directory {}: {err}",
                config.history_dir().display()
            ))
        })?;

        let store = CsvHistoryStore::new(config.history_file().clone());
        let mut engine = Self {
            config,
            history: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            observers: Vec::new(),
            strategy: None,
            store,
        };

        if let Err(err) = engine.load_history() {
            error!("failed to load existing history: {err}");
        }
        info!("calculator initialized");
        Ok(engine)
    }

    /// Replaces the active operation strategy. The engine holds at most one.
    pub fn set_operation(&mut self, strategy: Box<dyn Operation>) {
        info!("operation strategy set to: {}", strategy.name());
        self.strategy = Some(strategy);
    }

    /// Validates both raw operands, executes the active strategy, records
    /// the calculation, and notifies observers. Returns the numeric result.
    ///
    /// Exactly one undo entry is pushed and the redo stack is cleared per
    /// successful call; the oldest history entry is evicted when the bound
    /// is exceeded. Every failure surfaces as [`OperationError`].
    pub fn perform_operation(&mut self, raw_a: &str, raw_b: &str) -> Result<Decimal, OperationError> {
        let Some(strategy) = self.strategy.as_deref() else {
            error!("no operation strategy set");
            return Err(OperationError::new("No operation strategy set"));
        };

        let a = validate::validate_number(raw_a, &self.config).map_err(|err| {
            error!("input validation error: {err}");
            OperationError::new(format!("Input validation error: {err}"))
        })?;
        let b = validate::validate_number(raw_b, &self.config).map_err(|err| {
            error!("input validation error: {err}");
            OperationError::new(format!("Input validation error: {err}"))
        })?;

        strategy.execute(a, b).map_err(|err| {
            error!("operation error: {err}");
            OperationError::new(format!("Operation error: {err}"))
        })?;

        // Calculation re-derives the result through the dispatch table; the
        // strategy run above surfaces precondition errors with the engine's
        // wrapping.
        let calculation = Arc::new(Calculation::new(strategy.name(), a, b)?);
        let result = calculation.result();

        // Pre-operation snapshot enables undo; new work invalidates redo.
        self.undo_stack.push(HistoryMemento::capture(&self.history));
        self.redo_stack.clear();

        self.history.push(Arc::clone(&calculation));
        if self.history.len() > self.config.max_history_size() {
            let removed = self.history.remove(0);
            info!("history limit exceeded, removed oldest calculation: {removed}");
        }

        self.notify_observers(&calculation)?;
        Ok(result)
    }

    /// Registers an observer at the end of the notification order.
    pub fn add_observer(&mut self, observer: Box<dyn HistoryObserver>) {
        info!("observer added: {}", observer.name());
        self.observers.push(observer);
    }

    /// Removes the observer registered under `name`. Removing an
    /// unregistered observer is a no-op.
    pub fn remove_observer(&mut self, name: &str) {
        if let Some(pos) = self.observers.iter().position(|obs| obs.name() == name) {
            self.observers.remove(pos);
            info!("observer removed: {name}");
        }
    }

    /// Notifies all observers, in registration order, of a new calculation.
    pub fn notify_observers(&mut self, calculation: &Calculation) -> Result<(), OperationError> {
        let event = HistoryEvent {
            calculation,
            history: &self.history,
        };
        for observer in self.observers.iter_mut() {
            observer.update(&event)?;
        }
        Ok(())
    }

    /// Restores the most recent pre-operation snapshot. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(memento) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(HistoryMemento::capture(&self.history));
        self.history = memento.into_history();
        true
    }

    /// Restores the most recently undone state. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(memento) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(HistoryMemento::capture(&self.history));
        self.history = memento.into_history();
        true
    }

    /// Empties the history and both undo/redo stacks. Irreversible.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        info!("history cleared");
    }

    /// Writes the current history out wholesale through the store.
    pub fn save_history(&self) -> Result<(), OperationError> {
        self.store.save(&self.history).map_err(|err| {
            error!("failed to save history: {err}");
            OperationError::new(format!("Failed to save history: {err}"))
        })
    }

    /// Replaces the current history with the persisted one. An absent or
    /// empty store yields an empty history.
    pub fn load_history(&mut self) -> Result<(), OperationError> {
        self.history = self.store.load().map_err(|err| {
            error!("failed to load history: {err}");
            OperationError::new(format!("Failed to load history: {err}"))
        })?;
        Ok(())
    }

    /// Current history, oldest first.
    pub fn history(&self) -> &[Arc<Calculation>] {
        &self.history
    }

    /// Display-form lines for the current history.
    pub fn show_history(&self) -> Vec<String> {
        self.history.iter().map(|calc| calc.to_string()).collect()
    }

    /// Number of pending undo snapshots.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of pending redo snapshots.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Engine configuration.
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}
