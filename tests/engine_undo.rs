use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use rust_decimal_macros::dec;
use tempfile::TempDir;

use calclog::{
    calc::Calculation,
    config::{CalculatorConfig, ConfigOverrides},
    core::engine::Calculator,
    error::OperationError,
    observe::{HistoryEvent, HistoryObserver},
    ops::OperationRegistry,
};

fn config_in(dir: &Path, max_history_size: usize) -> CalculatorConfig {
    CalculatorConfig::resolve_from(
        ConfigOverrides {
            base_dir: Some(dir.to_path_buf()),
            max_history_size: Some(max_history_size),
            auto_save: Some(false),
            ..ConfigOverrides::default()
        },
        |_| None,
    )
    .expect("config")
}

fn engine_in(dir: &Path, max_history_size: usize) -> Calculator {
    Calculator::new(config_in(dir, max_history_size)).expect("engine")
}

fn set_op(calc: &mut Calculator, keyword: &str) {
    let registry = OperationRegistry::with_builtins();
    calc.set_operation(registry.create(keyword).expect("keyword"));
}

struct CountingObserver {
    seen: Rc<RefCell<Vec<Calculation>>>,
}

impl HistoryObserver for CountingObserver {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn update(&mut self, event: &HistoryEvent<'_>) -> Result<(), OperationError> {
        self.seen.borrow_mut().push(event.calculation.clone());
        Ok(())
    }
}

#[test]
fn perform_appends_one_record_and_one_undo_entry() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    let result = calc.perform_operation("2", "3").expect("perform");
    assert_eq!(result, dec!(5));
    assert_eq!(calc.history().len(), 1);
    assert_eq!(calc.undo_len(), 1);
    assert_eq!(calc.redo_len(), 0);
}

#[test]
fn undo_on_empty_stack_is_a_noop() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);

    assert!(!calc.undo());
    assert!(!calc.redo());
    assert!(calc.history().is_empty());
}

#[test]
fn undo_then_redo_restores_exact_state() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    calc.perform_operation("1", "1").expect("first");
    let before = calc.history().to_vec();
    calc.perform_operation("2", "2").expect("second");
    let after = calc.history().to_vec();

    assert!(calc.undo());
    assert_eq!(calc.history(), &before[..]);
    assert_eq!(calc.redo_len(), 1);

    assert!(calc.redo());
    assert_eq!(calc.history(), &after[..]);
}

#[test]
fn new_operation_clears_redo_stack() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    calc.perform_operation("1", "1").expect("first");
    assert!(calc.undo());
    assert_eq!(calc.redo_len(), 1);

    calc.perform_operation("2", "2").expect("second");
    assert_eq!(calc.redo_len(), 0);
}

#[test]
fn fifo_eviction_drops_oldest_entry() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 1);
    set_op(&mut calc, "add");

    calc.perform_operation("1", "1").expect("first");
    calc.perform_operation("2", "2").expect("second");

    let expected = Calculation::new("Addition", dec!(2), dec!(2)).expect("record");
    assert_eq!(calc.history().len(), 1);
    assert_eq!(*calc.history()[0], expected);
}

#[test]
fn clear_history_empties_all_stacks() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "multiply");

    calc.perform_operation("2", "4").expect("perform");
    assert!(calc.undo());
    calc.clear_history();

    assert!(calc.history().is_empty());
    assert_eq!(calc.undo_len(), 0);
    assert_eq!(calc.redo_len(), 0);
    assert!(!calc.undo());
    assert!(!calc.redo());
}

#[test]
fn missing_strategy_fails_with_operation_error() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);

    let err = calc.perform_operation("1", "2").expect_err("no strategy");
    assert!(err.message.contains("No operation strategy set"));
}

#[test]
fn validation_failure_is_wrapped_and_does_not_mutate() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    let err = calc.perform_operation("abc", "2").expect_err("bad operand");
    assert!(err.message.contains("Input validation error"));
    assert!(err.message.contains("Invalid number format"));
    assert!(calc.history().is_empty());
    assert_eq!(calc.undo_len(), 0);
}

#[test]
fn strategy_fault_is_wrapped_and_does_not_mutate() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "divide");

    let err = calc.perform_operation("5", "0").expect_err("zero divisor");
    assert!(err.message.contains("Division by zero"));
    assert!(calc.history().is_empty());
    assert_eq!(calc.undo_len(), 0);
}

#[test]
fn observers_run_once_per_perform_in_registration_order() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    let seen = Rc::new(RefCell::new(Vec::new()));
    calc.add_observer(Box::new(CountingObserver { seen: Rc::clone(&seen) }));

    calc.perform_operation("1", "2").expect("first");
    calc.perform_operation("3", "4").expect("second");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].result(), dec!(3));
    assert_eq!(seen[1].result(), dec!(7));
}

#[test]
fn remove_observer_is_idempotent() {
    let tmp = TempDir::new().expect("tmp");
    let mut calc = engine_in(tmp.path(), 100);
    set_op(&mut calc, "add");

    let seen = Rc::new(RefCell::new(Vec::new()));
    calc.add_observer(Box::new(CountingObserver { seen: Rc::clone(&seen) }));
    calc.remove_observer("counting");
    calc.remove_observer("counting");

    calc.perform_operation("1", "2").expect("perform");
    assert!(seen.borrow().is_empty());
}
