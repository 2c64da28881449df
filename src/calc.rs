//! Calculation record: inputs, derived result, timestamp, and the CSV row
//! mapping used by persistence.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::OperationError;
use crate::ops;

/// One computed calculation, immutable after construction.
///
/// The result is always derived from `(operation, operand1, operand2)` when
/// the record is built; a stored result is never trusted on reload.
#[derive(Debug, Clone)]
pub struct Calculation {
    operation: String,
    operand1: Decimal,
    operand2: Decimal,
    result: Decimal,
    timestamp: NaiveDateTime,
}

/// Flat row form of a [`Calculation`] as persisted in the history file.
///
/// Columns, in order: `operation`, `operand1`, `operand2`, `result`,
/// `timestamp`. Decimal fields are decimal-parseable strings; the timestamp
/// is ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// Strategy display name, e.g. `"Addition"`.
    pub operation: String,
    /// First operand.
    pub operand1: String,
    /// Second operand.
    pub operand2: String,
    /// Stored result; recomputed and cross-checked on load.
    pub result: String,
    /// ISO-8601 timestamp, second or microsecond precision.
    pub timestamp: String,
}

impl Calculation {
    /// Builds a record by executing `operation` on the operands.
    ///
    /// Fails with `"Unsupported operation: <name>"` when the name is not in
    /// the dispatch table; strategy faults are wrapped with their original
    /// message.
    pub fn new(
        operation: impl Into<String>,
        operand1: Decimal,
        operand2: Decimal,
    ) -> Result<Self, OperationError> {
        let operation = operation.into();
        let result = calculate(&operation, operand1, operand2)?;
        Ok(Self {
            operation,
            operand1,
            operand2,
            result,
            timestamp: Local::now().naive_local(),
        })
    }

    /// Reconstructs a record from its persisted row form.
    ///
    /// The result is re-derived by running the operation; a mismatch with the
    /// stored result is logged as a warning and the recomputed value wins.
    pub fn from_row(row: &HistoryRow) -> Result<Self, OperationError> {
        let operand1 = parse_decimal(&row.operand1)?;
        let operand2 = parse_decimal(&row.operand2)?;
        let stored_result = parse_decimal(&row.result)?;
        let timestamp = row.timestamp.parse::<NaiveDateTime>().map_err(|err| {
            OperationError::new(format!("Invalid data for creating Calculation: {err}"))
        })?;

        let mut calc = Self::new(row.operation.clone(), operand1, operand2)?;
        calc.timestamp = timestamp;
        if calc.result != stored_result {
            warn!(
                "calculated result {} does not match saved result {}, using calculated result",
                calc.result, stored_result
            );
        }
        Ok(calc)
    }

    /// Converts the record to its persisted row form.
    pub fn to_row(&self) -> HistoryRow {
        HistoryRow {
            operation: self.operation.clone(),
            operand1: self.operand1.to_string(),
            operand2: self.operand2.to_string(),
            result: self.result.to_string(),
            timestamp: iso_timestamp(self.timestamp),
        }
    }

    /// Strategy display name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// First operand.
    pub fn operand1(&self) -> Decimal {
        self.operand1
    }

    /// Second operand.
    pub fn operand2(&self) -> Decimal {
        self.operand2
    }

    /// Derived result. There is no setter; the value is frozen at
    /// construction.
    pub fn result(&self) -> Decimal {
        self.result
    }

    /// Construction time (or the persisted time after reload).
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Result rounded to `precision` decimal places for display, then
    /// normalized.
    pub fn format_result(&self, precision: u32) -> String {
        self.result.round_dp(precision).normalize().to_string()
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {} at {}",
            self.operation,
            self.operand1,
            self.operand2,
            self.result,
            iso_timestamp(self.timestamp)
        )
    }
}

/// Equality covers `(operation, operand1, operand2, result)`; the timestamp
/// is excluded.
impl PartialEq for Calculation {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.operand1 == other.operand1
            && self.operand2 == other.operand2
            && self.result == other.result
    }
}

impl Eq for Calculation {}

fn calculate(operation: &str, a: Decimal, b: Decimal) -> Result<Decimal, OperationError> {
    let strategy = ops::by_display_name(operation).ok_or_else(|| {
        error!("unsupported operation: {operation}");
        OperationError::new(format!("Unsupported operation: {operation}"))
    })?;
    strategy
        .execute(a, b)
        .map_err(|err| OperationError::new(format!("Invalid operation: {err}")))
}

fn parse_decimal(raw: &str) -> Result<Decimal, OperationError> {
    Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|err| OperationError::new(format!("Invalid data for creating Calculation: {err}")))
}

fn iso_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
