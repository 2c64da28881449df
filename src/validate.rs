//! Operand sanitization into the normalized decimal domain.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::config::CalculatorConfig;
use crate::error::ValidationError;

/// Parses `raw` as a decimal number and bounds-checks it against
/// `config.max_input_value()`.
///
/// Leading and trailing whitespace is trimmed. Plain and scientific notation
/// are both accepted. The returned value is normalized, collapsing trailing
/// zeros.
pub fn validate_number(raw: &str, config: &CalculatorConfig) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let number = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::new(format!("Invalid number format: {raw}")))?;
    if number.abs() > config.max_input_value() {
        return Err(ValidationError::new(format!(
            "Value exceeds maximum allowed: {}",
            config.max_input_value()
        )));
    }
    Ok(number.normalize())
}
