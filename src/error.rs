//! Error taxonomy shared across the crate.
//!
//! Three kinds, by propagation policy: [`ConfigError`] is construction-time
//! and fatal, [`ValidationError`] is raised by the input validator and by
//! operation precondition checks, and [`OperationError`] is the single kind
//! that callers of the engine ever see. The engine is the translation
//! boundary that re-wraps everything else.

use thiserror::Error;

/// Invalid configuration value. Raised while resolving or validating
/// [`crate::config::CalculatorConfig`]; fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    /// Human-readable description of the invalid setting.
    pub message: String,
}

impl ConfigError {
    /// Constructs a configuration error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Malformed or out-of-bounds operand, or a failed operation precondition.
/// Never escapes the engine boundary; always re-wrapped as [`OperationError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable description of the rejected input.
    pub message: String,
}

impl ValidationError {
    /// Constructs a validation error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The single user-facing failure kind: unsupported operation, arithmetic
/// fault, persistence fault, or any unexpected internal fault, carrying a
/// message describing the original cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    /// Human-readable description of the original cause.
    pub message: String,
}

impl OperationError {
    /// Constructs an operation error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
