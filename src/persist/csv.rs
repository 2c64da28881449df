//! CSV-backed history store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::calc::{Calculation, HistoryRow};

use super::{HistoryStore, PersistError, PersistResult};

const HEADER: [&str; 5] = ["operation", "operand1", "operand2", "result", "timestamp"];

/// CSV implementation of [`HistoryStore`].
///
/// The file always carries the header row, even when the history is empty.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    /// Creates a store writing to `path`. The parent directory is created on
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// History file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for CsvHistoryStore {
    fn save(&self, history: &[Arc<Calculation>]) -> PersistResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        // Header written by hand so a header-only file comes out for an
        // empty history.
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for calc in history {
            writer.serialize(calc.to_row())?;
        }
        writer.flush()?;
        info!("history saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> PersistResult<Vec<Arc<Calculation>>> {
        if !self.path.exists() {
            info!("history file does not exist: {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().from_path(&self.path)?;
        let mut history = Vec::new();
        for row in reader.deserialize::<HistoryRow>() {
            let row = row?;
            let calc =
                Calculation::from_row(&row).map_err(|err| PersistError::Message(err.message))?;
            history.push(Arc::new(calc));
        }
        info!(
            "history loaded from {}, total calculations: {}",
            self.path.display(),
            history.len()
        );
        Ok(history)
    }
}
