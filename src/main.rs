use std::io;
use std::process::ExitCode;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use calclog::config::{CalculatorConfig, ConfigOverrides};
use calclog::core::engine::Calculator;
use calclog::observe::{AutoSaveObserver, LoggingObserver};
use calclog::ops::OperationRegistry;
use calclog::repl::run_repl;

fn main() -> ExitCode {
    let config = match CalculatorConfig::resolve(ConfigOverrides::default()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config) {
        eprintln!("failed to set up logging: {err}");
        return ExitCode::FAILURE;
    }

    let mut calc = match Calculator::new(config.clone()) {
        Ok(calc) => calc,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    calc.add_observer(Box::new(LoggingObserver));
    calc.add_observer(Box::new(AutoSaveObserver::new(&config)));

    let registry = OperationRegistry::with_builtins();
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = run_repl(&mut calc, &registry, stdin.lock(), stdout.lock()) {
        eprintln!("i/o error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(config: &CalculatorConfig) -> io::Result<()> {
    std::fs::create_dir_all(config.log_dir())?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
