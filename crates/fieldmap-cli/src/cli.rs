//! CLI argument definitions for the field mapping editor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fieldmap_editor::SourceFieldMode;
use fieldmap_model::{MappingRow, SyncSettings};

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map legacy export columns to CRM fields",
    long_about = "Edit the mapping between columns of the legacy database export and\n\
                  fields of CRM organizations, persons and deals.\n\n\
                  Mappings are stored per company scope on the sync backend and are\n\
                  always written back as a complete list."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConnectionArgs {
    /// JSON file with base_url, scope, timeout_secs, minimum_rows, source_mode.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Root URL of the sync backend.
    #[arg(long = "base-url", env = "FIELDMAP_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Company scope whose fields and mappings are edited.
    #[arg(long = "scope", env = "FIELDMAP_SCOPE", global = true)]
    pub scope: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the CRM fields available per entity type.
    Fields,

    /// Show the stored mappings, grouped by entity type.
    Show,

    /// Remove and add mappings, then save the complete list.
    Edit(EditArgs),

    /// Store the sync settings, replacing all three of them.
    ///
    /// The backend keeps no readable copy of the settings, so every call
    /// writes the full set: a flag left out is stored as `true`.
    Settings(SettingsArgs),
}

#[derive(Parser)]
pub struct EditArgs {
    /// Mapping to append, as SOURCE=ENTITY:TARGET (repeatable).
    #[arg(long = "add", value_name = "SOURCE=ENTITY:TARGET")]
    pub add: Vec<MappingRow>,

    /// Row position to remove, as listed by `show` (repeatable).
    #[arg(long = "remove", value_name = "N")]
    pub remove: Vec<usize>,

    /// Never remove rows below this count.
    #[arg(long = "min-rows", value_name = "N")]
    pub min_rows: Option<usize>,

    /// Where source field names come from.
    #[arg(long = "source-mode", value_enum)]
    pub source_mode: Option<SourceModeArg>,

    /// Print the resulting rows without saving.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SettingsArgs {
    /// Look up existing organizations before creating new ones.
    #[arg(long = "check-organizations", value_name = "BOOL")]
    pub check_organizations: Option<bool>,

    /// Look up existing persons before creating new ones.
    #[arg(long = "check-persons", value_name = "BOOL")]
    pub check_persons: Option<bool>,

    /// Advance deal stages one at a time.
    #[arg(long = "sequential-status", value_name = "BOOL")]
    pub sequential_status: Option<bool>,
}

impl SettingsArgs {
    /// The full settings to store. Omitted flags take their default.
    pub fn settings(&self) -> SyncSettings {
        let defaults = SyncSettings::default();
        SyncSettings {
            check_organizations: self
                .check_organizations
                .unwrap_or(defaults.check_organizations),
            check_persons: self.check_persons.unwrap_or(defaults.check_persons),
            sequential_status: self
                .sequential_status
                .unwrap_or(defaults.sequential_status),
        }
    }
}

/// CLI source field choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SourceModeArg {
    /// Fixed column list of the legacy export.
    Legacy,
    /// All fields of the CRM catalog.
    Catalog,
}

impl From<SourceModeArg> for SourceFieldMode {
    fn from(arg: SourceModeArg) -> Self {
        match arg {
            SourceModeArg::Legacy => Self::Legacy,
            SourceModeArg::Catalog => Self::Catalog,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn settings_from(args: &[&str]) -> SyncSettings {
        let cli = Cli::try_parse_from(args).expect("parse args");
        match cli.command {
            Command::Settings(args) => args.settings(),
            _ => panic!("expected settings command"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn omitted_settings_are_written_as_defaults() {
        let settings = settings_from(&["fieldmap", "settings", "--check-persons", "false"]);
        assert_eq!(
            settings,
            SyncSettings {
                check_persons: false,
                ..SyncSettings::default()
            }
        );
    }

    #[test]
    fn settings_help_states_full_overwrite() {
        let mut command = Cli::command();
        let help = command
            .find_subcommand_mut("settings")
            .expect("settings subcommand")
            .render_long_help()
            .to_string();
        assert!(help.contains("writes the full set"));
    }
}
