use std::path::PathBuf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use calclog::config::{CalculatorConfig, ConfigOverrides};

fn no_env(_key: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_when_overrides_and_env_are_absent() {
    let config = CalculatorConfig::resolve_from(ConfigOverrides::default(), no_env).expect("config");

    assert_eq!(config.max_history_size(), 1000);
    assert!(config.auto_save());
    assert_eq!(config.precision(), 10);
    assert_eq!(config.max_input_value(), Decimal::MAX);
    assert_eq!(config.default_encoding(), "utf-8");
    assert_eq!(config.base_dir(), &PathBuf::from("."));
    assert_eq!(config.log_dir(), &PathBuf::from("./logs"));
    assert_eq!(config.log_file(), &PathBuf::from("./logs/calclog.log"));
    assert_eq!(config.history_dir(), &PathBuf::from("./history"));
    assert_eq!(
        config.history_file(),
        &PathBuf::from("./history/calclog_history.csv")
    );
}

#[test]
fn env_values_apply_when_overrides_are_absent() {
    let env = |key: &str| -> Option<String> {
        match key {
            "CALCLOG_BASE_DIR" => Some("/tmp/calc".to_string()),
            "CALCLOG_MAX_HISTORY_SIZE" => Some("25".to_string()),
            "CALCLOG_AUTO_SAVE" => Some("False".to_string()),
            "CALCLOG_PRECISION" => Some("4".to_string()),
            "CALCLOG_MAX_INPUT_VALUE" => Some("1e6".to_string()),
            "CALCLOG_DEFAULT_ENCODING" => Some("latin-1".to_string()),
            _ => None,
        }
    };

    let config = CalculatorConfig::resolve_from(ConfigOverrides::default(), env).expect("config");
    assert_eq!(config.max_history_size(), 25);
    assert!(!config.auto_save());
    assert_eq!(config.precision(), 4);
    assert_eq!(config.max_input_value(), dec!(1000000));
    assert_eq!(config.default_encoding(), "latin-1");
    assert_eq!(config.history_dir(), &PathBuf::from("/tmp/calc/history"));
}

#[test]
fn explicit_overrides_beat_env_values() {
    let env = |key: &str| -> Option<String> {
        match key {
            "CALCLOG_MAX_HISTORY_SIZE" => Some("25".to_string()),
            "CALCLOG_AUTO_SAVE" => Some("false".to_string()),
            _ => None,
        }
    };

    let overrides = ConfigOverrides {
        max_history_size: Some(7),
        auto_save: Some(true),
        ..ConfigOverrides::default()
    };
    let config = CalculatorConfig::resolve_from(overrides, env).expect("config");
    assert_eq!(config.max_history_size(), 7);
    assert!(config.auto_save());
}

#[test]
fn derived_paths_are_independently_overridable() {
    let env = |key: &str| -> Option<String> {
        match key {
            "CALCLOG_HISTORY_FILE" => Some("/var/data/other.csv".to_string()),
            "CALCLOG_LOG_DIR" => Some("/var/log/calc".to_string()),
            _ => None,
        }
    };

    let config = CalculatorConfig::resolve_from(ConfigOverrides::default(), env).expect("config");
    assert_eq!(config.history_file(), &PathBuf::from("/var/data/other.csv"));
    assert_eq!(config.history_dir(), &PathBuf::from("./history"));
    assert_eq!(config.log_dir(), &PathBuf::from("/var/log/calc"));
    assert_eq!(config.log_file(), &PathBuf::from("/var/log/calc/calclog.log"));
}

#[test]
fn unparseable_env_values_fail_resolution() {
    let env = |key: &str| -> Option<String> {
        (key == "CALCLOG_MAX_HISTORY_SIZE").then(|| "lots".to_string())
    };

    let err = CalculatorConfig::resolve_from(ConfigOverrides::default(), env)
        .expect_err("bad integer");
    assert!(err.message.contains("CALCLOG_MAX_HISTORY_SIZE"));
}

#[test]
fn bound_violations_fail_validation() {
    let cases: [(ConfigOverrides, &str); 4] = [
        (
            ConfigOverrides {
                max_history_size: Some(0),
                ..ConfigOverrides::default()
            },
            "max_history_size",
        ),
        (
            ConfigOverrides {
                precision: Some(0),
                ..ConfigOverrides::default()
            },
            "precision",
        ),
        (
            ConfigOverrides {
                max_input_value: Some(dec!(-1)),
                ..ConfigOverrides::default()
            },
            "max_input_value",
        ),
        (
            ConfigOverrides {
                default_encoding: Some(String::new()),
                ..ConfigOverrides::default()
            },
            "default_encoding",
        ),
    ];

    for (overrides, field) in cases {
        let err = CalculatorConfig::resolve_from(overrides, no_env).expect_err(field);
        assert!(err.message.contains(field), "{field}: {err}");
    }
}
