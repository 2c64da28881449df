//! Line-oriented command loop, generic over its I/O for testability.

use std::io::{self, BufRead, Write};

use crate::core::engine::Calculator;
use crate::ops::OperationRegistry;

/// Runs the calculator command loop until `exit` or end of input.
///
/// Commands: `help`, `exit`, `history`, `clear`, `undo`, `redo`, `save`,
/// `load`, `cancel`, plus every keyword registered in `registry`. Operand
/// prompts accept `cancel` to abort the pending operation without touching
/// the engine. Errors are printed and the session continues.
pub fn run_repl<R: BufRead, W: Write>(
    calc: &mut Calculator,
    registry: &OperationRegistry,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "Welcome to the calculator. Type 'help' for commands.")?;

    loop {
        write!(out, "Enter command: ")?;
        out.flush()?;
        let Some(command) = read_line(&mut input)? else {
            writeln!(out, "Goodbye!")?;
            break;
        };
        let command = command.to_lowercase();

        match command.as_str() {
            "" => continue,
            "help" => print_help(&mut out)?,
            "exit" => {
                match calc.save_history() {
                    Ok(()) => writeln!(out, "History saved successfully.")?,
                    Err(err) => writeln!(out, "Failed to save history: {err}")?,
                }
                writeln!(out, "Goodbye!")?;
                break;
            }
            "history" => {
                let lines = calc.show_history();
                if lines.is_empty() {
                    writeln!(out, "No calculations performed yet.")?;
                } else {
                    writeln!(out, "Calculation history:")?;
                    for (index, line) in lines.iter().enumerate() {
                        writeln!(out, "{}. {line}", index + 1)?;
                    }
                }
            }
            "clear" => {
                calc.clear_history();
                writeln!(out, "Calculation history cleared.")?;
            }
            "undo" => {
                if calc.undo() {
                    writeln!(out, "Last calculation undone.")?;
                } else {
                    writeln!(out, "Nothing to undo.")?;
                }
            }
            "redo" => {
                if calc.redo() {
                    writeln!(out, "Last undone calculation redone.")?;
                } else {
                    writeln!(out, "Nothing to redo.")?;
                }
            }
            "save" => match calc.save_history() {
                Ok(()) => writeln!(out, "History saved successfully.")?,
                Err(err) => writeln!(out, "Failed to save history: {err}")?,
            },
            "load" => match calc.load_history() {
                Ok(()) => writeln!(out, "History loaded successfully.")?,
                Err(err) => writeln!(out, "Failed to load history: {err}")?,
            },
            "cancel" => writeln!(out, "No operation in progress.")?,
            keyword => match registry.create(keyword) {
                Ok(strategy) => {
                    let done = run_operation(calc, strategy, &mut input, &mut out)?;
                    if !done {
                        writeln!(out, "Goodbye!")?;
                        break;
                    }
                }
                Err(_) => {
                    writeln!(out, "Unknown command. Type 'help' for a list of commands.")?;
                }
            },
        }
    }

    Ok(())
}

/// Prompts for both operands and performs the selected operation. Returns
/// false when input ended.
fn run_operation<R: BufRead, W: Write>(
    calc: &mut Calculator,
    strategy: Box<dyn crate::ops::Operation>,
    input: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    writeln!(out, "Enter operands for the operation (or 'cancel' to abort):")?;

    write!(out, "Operand 1: ")?;
    out.flush()?;
    let Some(operand1) = read_line(input)? else {
        return Ok(false);
    };
    if operand1.eq_ignore_ascii_case("cancel") {
        writeln!(out, "Operation cancelled.")?;
        return Ok(true);
    }

    write!(out, "Operand 2: ")?;
    out.flush()?;
    let Some(operand2) = read_line(input)? else {
        return Ok(false);
    };
    if operand2.eq_ignore_ascii_case("cancel") {
        writeln!(out, "Operation cancelled.")?;
        return Ok(true);
    }

    calc.set_operation(strategy);
    let precision = calc.config().precision();
    match calc.perform_operation(&operand1, &operand2) {
        Ok(result) => writeln!(out, "Result: {}", result.round_dp(precision).normalize())?,
        Err(err) => writeln!(out, "Operation failed: {err}")?,
    }
    Ok(true)
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(
        out,
        "  add, subtract, multiply, divide, power, root - perform a calculation"
    )?;
    writeln!(out, "  history - show calculation history")?;
    writeln!(out, "  clear - clear calculation history")?;
    writeln!(out, "  undo - undo the last calculation")?;
    writeln!(out, "  redo - redo the last undone calculation")?;
    writeln!(out, "  save - save calculation history to file")?;
    writeln!(out, "  load - load calculation history from file")?;
    writeln!(out, "  exit - save and exit")?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}
