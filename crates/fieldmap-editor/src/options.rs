//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Where the source selector takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFieldMode {
    /// The fixed column list of the legacy export.
    Legacy,
    /// Every field of the loaded catalog, all entity types flattened.
    #[default]
    Catalog,
}

/// Behaviour switches of a [`MappingEditor`](crate::MappingEditor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Removing a row is refused when it would leave fewer rows than this.
    pub minimum_rows: usize,
    pub source_mode: SourceFieldMode,
}

impl EditorOptions {
    #[must_use]
    pub fn with_minimum_rows(mut self, minimum_rows: usize) -> Self {
        self.minimum_rows = minimum_rows;
        self
    }

    #[must_use]
    pub fn with_source_mode(mut self, source_mode: SourceFieldMode) -> Self {
        self.source_mode = source_mode;
        self
    }
}
