//! Field mapping editor CLI.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use fieldmap_cli::config::{FileConfig, Overrides, ResolvedConfig};
use fieldmap_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_edit, run_fields, run_settings, run_show};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = resolve_config(&cli).and_then(|config| match &cli.command {
        Command::Fields => run_fields(&config),
        Command::Show => run_show(&config),
        Command::Edit(args) => run_edit(&config, args),
        Command::Settings(args) => run_settings(&config, args),
    });
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn resolve_config(cli: &Cli) -> Result<ResolvedConfig> {
    let file = match &cli.connection.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let (minimum_rows, source_mode) = match &cli.command {
        Command::Edit(args) => (args.min_rows, args.source_mode.map(Into::into)),
        _ => (None, None),
    };
    let overrides = Overrides {
        base_url: cli.connection.base_url.clone(),
        scope: cli.connection.scope.clone(),
        timeout_secs: cli.connection.timeout_secs,
        minimum_rows,
        source_mode,
    };
    ResolvedConfig::resolve(file, overrides)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
