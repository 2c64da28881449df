//! Operation strategies and the keyword registry.

use std::fmt;

use hashbrown::HashMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::error::{OperationError, ValidationError};

/// A pluggable, stateless arithmetic strategy.
///
/// `execute` is deterministic and side-effect free. Implementations validate
/// their preconditions and fail with a descriptive [`ValidationError`] rather
/// than letting an arithmetic fault propagate raw.
pub trait Operation {
    /// Canonical display name, e.g. `"Addition"`. Used for display and for
    /// matching persisted calculation records.
    fn name(&self) -> &'static str;

    /// Computes the result for two validated operands.
    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError>;
}

impl<'a> fmt::Display for dyn Operation + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> fmt::Debug for dyn Operation + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Adds two operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Addition;

impl Operation for Addition {
    fn name(&self) -> &'static str {
        "Addition"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        a.checked_add(b)
            .ok_or_else(|| ValidationError::new("Result exceeds the representable range"))
    }
}

/// Subtracts the second operand from the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtraction;

impl Operation for Subtraction {
    fn name(&self) -> &'static str {
        "Subtraction"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        a.checked_sub(b)
            .ok_or_else(|| ValidationError::new("Result exceeds the representable range"))
    }
}

/// Multiplies two operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplication;

impl Operation for Multiplication {
    fn name(&self) -> &'static str {
        "Multiplication"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        a.checked_mul(b)
            .ok_or_else(|| ValidationError::new("Result exceeds the representable range"))
    }
}

/// Divides the first operand by the second. Fails on a zero divisor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Division;

impl Operation for Division {
    fn name(&self) -> &'static str {
        "Division"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        if b.is_zero() {
            return Err(ValidationError::new("Division by zero is not allowed"));
        }
        a.checked_div(b)
            .ok_or_else(|| ValidationError::new("Result exceeds the representable range"))
    }
}

/// Raises the first operand to the power of the second. Negative exponents
/// are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Power;

impl Operation for Power {
    fn name(&self) -> &'static str {
        "Power"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        if b < Decimal::ZERO {
            return Err(ValidationError::new("Negative exponents are not allowed"));
        }
        if b.fract().is_zero() {
            let exp = b
                .to_u64()
                .ok_or_else(|| ValidationError::new("Exponent is too large"))?;
            return pow_integer(a, exp);
        }
        // Fractional exponent goes through a float intermediate, same
        // approximation caveat as Root.
        pow_via_float(a, b)
    }
}

/// Takes the `b`-th root of `a` as `a^(1/b)`.
///
/// Computed through an `f64` intermediate and converted back to the decimal
/// domain; this is not an exact decimal root.
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl Operation for Root {
    fn name(&self) -> &'static str {
        "Root"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
        if b.is_zero() {
            return Err(ValidationError::new("Zero root is not defined"));
        }
        if a < Decimal::ZERO {
            return Err(ValidationError::new(
                "Cannot calculate root of a negative number",
            ));
        }
        if b < Decimal::ZERO {
            return Err(ValidationError::new("Invalid root operation"));
        }
        let x = a
            .to_f64()
            .ok_or_else(|| ValidationError::new("Operand is out of float range"))?;
        let y = b
            .to_f64()
            .ok_or_else(|| ValidationError::new("Operand is out of float range"))?;
        decimal_from_float(x.powf(1.0 / y))
    }
}

fn pow_integer(base: Decimal, mut exp: u64) -> Result<Decimal, ValidationError> {
    let mut acc = Decimal::ONE;
    let mut base = base;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc
                .checked_mul(base)
                .ok_or_else(|| ValidationError::new("Power result is out of range"))?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base
                .checked_mul(base)
                .ok_or_else(|| ValidationError::new("Power result is out of range"))?;
        }
    }
    Ok(acc)
}

fn pow_via_float(a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
    let x = a
        .to_f64()
        .ok_or_else(|| ValidationError::new("Operand is out of float range"))?;
    let y = b
        .to_f64()
        .ok_or_else(|| ValidationError::new("Operand is out of float range"))?;
    decimal_from_float(x.powf(y))
}

fn decimal_from_float(value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new("Result is not a finite number"));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| ValidationError::new("Result exceeds the representable range"))
}

/// Constructor for a registered operation.
pub type OperationCtor = fn() -> Box<dyn Operation>;

/// Case-insensitive keyword registry mapping e.g. `"add"` or `"ADD"` to the
/// [`Addition`] strategy.
///
/// Extension point: [`OperationRegistry::register`] adds a new keyword;
/// conformance is enforced by the [`Operation`] bound on the constructor.
pub struct OperationRegistry {
    entries: HashMap<String, OperationCtor>,
}

impl OperationRegistry {
    /// Builds an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a registry with the six built-in operations registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("add", || Box::new(Addition));
        registry.register("subtract", || Box::new(Subtraction));
        registry.register("multiply", || Box::new(Multiplication));
        registry.register("divide", || Box::new(Division));
        registry.register("power", || Box::new(Power));
        registry.register("root", || Box::new(Root));
        registry
    }

    /// Registers `ctor` under `keyword`, replacing any previous entry.
    pub fn register(&mut self, keyword: &str, ctor: OperationCtor) {
        self.entries.insert(keyword.to_ascii_lowercase(), ctor);
    }

    /// Instantiates the operation registered under `keyword`, matched
    /// case-insensitively.
    pub fn create(&self, keyword: &str) -> Result<Box<dyn Operation>, OperationError> {
        self.entries
            .get(&keyword.to_ascii_lowercase())
            .map(|ctor| ctor())
            .ok_or_else(|| OperationError::new(format!("Unknown operation: {keyword}")))
    }

    /// Registered keywords, unordered.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Fixed dispatch table from canonical display name to strategy, used when
/// recomputing persisted calculation records.
pub fn by_display_name(name: &str) -> Option<Box<dyn Operation>> {
    match name {
        "Addition" => Some(Box::new(Addition)),
        "Subtraction" => Some(Box::new(Subtraction)),
        "Multiplication" => Some(Box::new(Multiplication)),
        "Division" => Some(Box::new(Division)),
        "Power" => Some(Box::new(Power)),
        "Root" => Some(Box::new(Root)),
        _ => None,
    }
}
