//! IVTC Workbench - command line entry point
//!
//! Handles:
//! - Configuration loading
//! - Logging initialization
//! - Dispatch of one project command per run

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ivtc_core::config::{ConfigManager, ConfigSection};
use ivtc_core::logging::init_tracing_with_file;

mod args;
mod commands;

use args::Cli;

/// Default config path: .config/settings.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (needed for logs directory path)
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config_manager = ConfigManager::new(&config_path);
    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let settings = config_manager.settings().clone();
    let logs_dir = config_manager.logs_folder();
    let _log_guard = init_tracing_with_file(
        settings.logging.level,
        settings.logging.compact,
        settings.logging.log_to_file.then_some(logs_dir.as_path()),
    );

    tracing::debug!("Config: {}", config_path.display());
    tracing::debug!("Core version: {}", ivtc_core::version());

    // Ensure all configured directories exist
    if let Err(e) = config_manager.ensure_dirs_exist() {
        tracing::warn!("Failed to create directories: {}", e);
    }

    match commands::run(&cli.command, &settings) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            remember_project(&mut config_manager, cli.command.project());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Record the last project used in the `[paths]` section.
fn remember_project(config_manager: &mut ConfigManager, project: &Path) {
    let path = project.display().to_string();
    if config_manager.settings().paths.last_project_path == path {
        return;
    }
    config_manager.settings_mut().paths.last_project_path = path;
    if let Err(e) = config_manager.update_section(ConfigSection::Paths) {
        tracing::warn!("Failed to save last project path: {}", e);
    }
}
