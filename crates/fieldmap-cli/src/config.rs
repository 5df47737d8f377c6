//! Resolution of connection and editor settings.
//!
//! Settings come from an optional JSON file and from command-line flags (or
//! their environment variables). Flags win over the file; the file wins over
//! built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use fieldmap_client::ClientConfig;
use fieldmap_editor::{EditorOptions, SourceFieldMode};

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub scope: Option<String>,
    pub timeout_secs: Option<u64>,
    pub minimum_rows: Option<usize>,
    pub source_mode: Option<SourceFieldMode>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config file {}", path.display()))
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub scope: Option<String>,
    pub timeout_secs: Option<u64>,
    pub minimum_rows: Option<usize>,
    pub source_mode: Option<SourceFieldMode>,
}

/// Fully resolved settings for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub client: ClientConfig,
    pub scope: String,
    pub editor: EditorOptions,
}

impl ResolvedConfig {
    /// Merges flags over the file over defaults.
    ///
    /// # Errors
    ///
    /// Fails when no scope was given anywhere.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let defaults = ClientConfig::default();
        let client = ClientConfig {
            base_url: overrides
                .base_url
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            timeout_secs: overrides
                .timeout_secs
                .or(file.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
        };

        let Some(scope) = overrides
            .scope
            .or(file.scope)
            .map(|scope| scope.trim().to_string())
            .filter(|scope| !scope.is_empty())
        else {
            bail!("no scope given; pass --scope, set FIELDMAP_SCOPE or add \"scope\" to the config file");
        };

        let editor = EditorOptions {
            minimum_rows: overrides
                .minimum_rows
                .or(file.minimum_rows)
                .unwrap_or_default(),
            source_mode: overrides
                .source_mode
                .or(file.source_mode)
                .unwrap_or_default(),
        };

        Ok(Self {
            client,
            scope,
            editor,
        })
    }
}
