//! Entry points which set up the program environment before running a scenario.
use crate::log;
use crate::scenario::{ScenarioMode, TcoResult, run_from_path};
use crate::settings::Settings;
use ::log::info;
use anyhow::{Context, Result};
use std::path::Path;

/// Run a scenario from a model directory.
///
/// Settings are read from the model directory (if present) and used to initialise the logger,
/// unless it has already been initialised. Log files are written to the model directory if the
/// settings ask for them.
pub fn handle_run_command(model_dir: &Path, mode: ScenarioMode) -> Result<TcoResult> {
    let settings = Settings::from_dir(model_dir)?;
    if !log::is_logger_initialised() {
        let log_file_path = settings.write_log_files.then_some(model_dir);
        log::init(Some(&settings.log_level), log_file_path)
            .context("Failed to initialise logging.")?;
    }

    let result = run_from_path(model_dir, mode).context("Failed to run scenario.")?;
    info!("Scenario run completed successfully");

    Ok(result)
}
