mod args;
mod commands;
mod error;
mod paths;

use std::fs::{self, File};
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::warn;
use simplelog::{Config, LevelFilter, WriteLogger};
use soundcms_lib::config::AdminConfig;

use args::Cli;
use error::CliError;

fn load_config(cli: &Cli) -> Result<AdminConfig, CliError> {
    let path = cli.config.clone().or_else(paths::config_file);
    let mut config = match path {
        Some(path) => AdminConfig::load_or_default(path)?,
        None => AdminConfig::default(),
    }
    .apply_env();

    if let Some(url) = &cli.url {
        config = config.with_base_url(url.clone());
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level.clone());
    }
    Ok(config)
}

/// Install the file logger; the terminal stays reserved for command output.
fn init_logging(level: &str) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    match File::create(&path) {
        Ok(file) => {
            if WriteLogger::init(level, Config::default(), file).is_err() {
                eprintln!("warning: logger already initialised");
            }
        }
        Err(e) => eprintln!("warning: cannot create {}: {}", path.display(), e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    match commands::run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("command failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
