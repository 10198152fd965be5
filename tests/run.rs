//! Integration tests for the `run` command.
use evtco::commands::handle_run_command;
use evtco::log::{LOG_ERROR_FILE_NAME, LOG_INFO_FILE_NAME, is_logger_initialised};
use evtco::scenario::ScenarioMode;
use evtco::settings::SETTINGS_FILE_NAME;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("tests/data/model")
}

/// An integration test for the `run` command.
///
/// We also check that the logger is initialised after it is run and that log files are written
/// when the settings ask for them.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("EVTCO_LOG_LEVEL", "off") };

    // Copy the model so log files don't end up in the source tree
    let tempdir = tempdir().unwrap();
    let model_dir = tempdir.path();
    fs::copy(
        get_model_dir().join("parameters.toml"),
        model_dir.join("parameters.toml"),
    )
    .unwrap();
    fs::write(
        model_dir.join(SETTINGS_FILE_NAME),
        "write_log_files = true\n",
    )
    .unwrap();

    assert!(!is_logger_initialised());
    let result = handle_run_command(model_dir, ScenarioMode::Purchase).unwrap();
    assert!(is_logger_initialised());
    assert_eq!(result.records().len(), 9);
    assert!(model_dir.join(LOG_INFO_FILE_NAME).is_file());
    assert!(model_dir.join(LOG_ERROR_FILE_NAME).is_file());

    // The logger is only initialised once
    let result = handle_run_command(model_dir, ScenarioMode::Finance).unwrap();
    assert_eq!(result.records().len(), 9);

    // Errors are reported with context
    assert_eq!(
        handle_run_command(model_dir, ScenarioMode::ChargingAsAService)
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to run scenario."
    );
}
