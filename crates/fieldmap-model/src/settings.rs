//! Synchronization settings stored alongside the mapping set.

use serde::{Deserialize, Serialize};

/// Controls how the CRM sync treats existing records.
///
/// Unknown or missing keys fall back to the defaults (all checks enabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Look up existing organizations before creating new ones.
    pub check_organizations: bool,
    /// Look up existing persons before creating new ones.
    pub check_persons: bool,
    /// Advance deal stages one at a time instead of jumping.
    pub sequential_status: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            check_organizations: true,
            check_persons: true,
            sequential_status: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_uses_defaults() {
        let settings: SyncSettings =
            serde_json::from_str(r#"{"check_persons": false}"#).unwrap();
        assert!(settings.check_organizations);
        assert!(!settings.check_persons);
        assert!(settings.sequential_status);
    }
}
