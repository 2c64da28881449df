//! Interactive decimal calculator with persistent, undoable history.
//!
//! # Examples
//!
//! Operation strategies via the keyword registry:
//! ```
//! use calclog::ops::OperationRegistry;
//! use rust_decimal::Decimal;
//!
//! let registry = OperationRegistry::with_builtins();
//! let add = registry.create("ADD").expect("known keyword");
//! assert_eq!(
//!     add.execute(Decimal::from(2), Decimal::from(3)).expect("add"),
//!     Decimal::from(5)
//! );
//! ```
//!
//! Engine usage with persistence and observers:
//! ```no_run
//! use calclog::{
//!     config::{CalculatorConfig, ConfigOverrides},
//!     core::engine::Calculator,
//!     observe::{AutoSaveObserver, LoggingObserver},
//!     ops::OperationRegistry,
//! };
//!
//! let config = CalculatorConfig::resolve(ConfigOverrides::default()).expect("config");
//! let mut calc = Calculator::new(config.clone()).expect("engine");
//! calc.add_observer(Box::new(LoggingObserver));
//! calc.add_observer(Box::new(AutoSaveObserver::new(&config)));
//!
//! let registry = OperationRegistry::with_builtins();
//! calc.set_operation(registry.create("add").expect("keyword"));
//! let result = calc.perform_operation("1", "2").expect("perform");
//! assert_eq!(result.to_string(), "3");
//! assert!(calc.undo());
//! ```

/// Calculation record and its persisted row form.
pub mod calc;
/// Configuration resolution and validation.
pub mod config;
/// Calculator engine and history snapshots.
pub mod core;
/// Error taxonomy.
pub mod error;
/// History observers.
pub mod observe;
/// Operation strategies and the keyword registry.
pub mod ops;
/// Persistence abstraction and CSV implementation.
pub mod persist;
/// Interactive command loop.
pub mod repl;
/// Operand validation.
pub mod validate;
