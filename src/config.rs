//! Calculator configuration with an explicit > env var > default fallback
//! chain, resolved once at startup.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ConfigError;

/// Explicit overrides taking precedence over environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Root directory for derived paths.
    pub base_dir: Option<PathBuf>,
    /// Maximum number of history entries kept in memory.
    pub max_history_size: Option<usize>,
    /// Whether observers persist history after each calculation.
    pub auto_save: Option<bool>,
    /// Display rounding precision in decimal places.
    pub precision: Option<u32>,
    /// Largest absolute operand value accepted by the validator.
    pub max_input_value: Option<Decimal>,
    /// Encoding name recorded for persisted files.
    pub default_encoding: Option<String>,
}

/// Resolved, validated calculator configuration.
///
/// All fields and derived paths are computed once by [`CalculatorConfig::resolve`];
/// nothing reads the environment after that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    base_dir: PathBuf,
    max_history_size: usize,
    auto_save: bool,
    precision: u32,
    max_input_value: Decimal,
    default_encoding: String,
    log_dir: PathBuf,
    log_file: PathBuf,
    history_dir: PathBuf,
    history_file: PathBuf,
}

impl CalculatorConfig {
    /// Resolves configuration from explicit overrides and the process
    /// environment, then validates it.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_from(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration against an arbitrary environment snapshot.
    ///
    /// `env` is consulted only for keys not covered by `overrides`; every
    /// field falls back to its documented default when both are absent.
    pub fn resolve_from(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_dir = overrides
            .base_dir
            .or_else(|| env("CALCLOG_BASE_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let max_history_size = match overrides.max_history_size {
            Some(v) => v,
            None => parse_env(&env, "CALCLOG_MAX_HISTORY_SIZE")?.unwrap_or(1000),
        };

        let auto_save = match overrides.auto_save {
            Some(v) => v,
            None => env("CALCLOG_AUTO_SAVE")
                .map(|raw| raw.eq_ignore_ascii_case("true") || raw == "1")
                .unwrap_or(true),
        };

        let precision = match overrides.precision {
            Some(v) => v,
            None => parse_env(&env, "CALCLOG_PRECISION")?.unwrap_or(10),
        };

        let max_input_value = match overrides.max_input_value {
            Some(v) => v,
            None => match env("CALCLOG_MAX_INPUT_VALUE") {
                Some(raw) => Decimal::from_str(raw.trim())
                    .or_else(|_| Decimal::from_scientific(raw.trim()))
                    .map_err(|_| {
                        ConfigError::new(format!("invalid CALCLOG_MAX_INPUT_VALUE: {raw}"))
                    })?,
                None => Decimal::MAX,
            },
        };

        let default_encoding = overrides
            .default_encoding
            .or_else(|| env("CALCLOG_DEFAULT_ENCODING"))
            .unwrap_or_else(|| "utf-8".to_string());

        let log_dir = env("CALCLOG_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("logs"));
        let log_file = env("CALCLOG_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| log_dir.join("calclog.log"));
        let history_dir = env("CALCLOG_HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("history"));
        let history_file = env("CALCLOG_HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| history_dir.join("calclog_history.csv"));

        let config = Self {
            base_dir,
            max_history_size,
            auto_save,
            precision,
            max_input_value,
            default_encoding,
            log_dir,
            log_file,
            history_dir,
            history_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks value bounds, failing with [`ConfigError`] on the first
    /// violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_size == 0 {
            return Err(ConfigError::new("max_history_size must be positive"));
        }
        if self.precision == 0 {
            return Err(ConfigError::new("precision must be positive"));
        }
        if self.max_input_value <= Decimal::ZERO {
            return Err(ConfigError::new("max_input_value must be positive"));
        }
        if self.default_encoding.is_empty() {
            return Err(ConfigError::new("default_encoding must be specified"));
        }
        Ok(())
    }

    /// Root directory for derived paths.
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Maximum number of history entries kept in memory.
    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Whether observers persist history after each calculation.
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Display rounding precision in decimal places.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Largest absolute operand value accepted by the validator.
    pub fn max_input_value(&self) -> Decimal {
        self.max_input_value
    }

    /// Encoding name recorded for persisted files.
    pub fn default_encoding(&self) -> &str {
        &self.default_encoding
    }

    /// Directory holding the log file.
    pub fn log_dir(&self) -> &PathBuf {
        &self.log_dir
    }

    /// Log file path.
    pub fn log_file(&self) -> &PathBuf {
        &self.log_file
    }

    /// Directory holding the history file.
    pub fn history_dir(&self) -> &PathBuf {
        &self.history_dir
    }

    /// History file path.
    pub fn history_file(&self) -> &PathBuf {
        &self.history_file
    }
}

fn parse_env<T: FromStr>(
    env: impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::new(format!("invalid {key}: {raw}"))),
        None => Ok(None),
    }
}
