//! Source-to-target mapping rows.
//!
//! A mapping row associates one column of the legacy export with one field
//! of a CRM entity. The persisted mapping set is an ordered list of rows;
//! duplicates are allowed and order is insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::entity::EntityType;
use crate::error::ModelError;

/// Column names of the legacy address/contact/project export.
pub const LEGACY_SOURCE_FIELDS: &[&str] = &[
    "ADR_NAME",
    "STREET",
    "HOUSE_NUMBER",
    "PLZ",
    "ORT",
    "LAND",
    "AKP_VORNAME",
    "AKP_NAME",
    "AKP_MAIL",
    "AKP_TEL",
    "NPO_ProjName",
    "NPO_KDatum",
    "NPO_KSumme",
    "NPO_ADatum",
];

/// One persisted source-to-target association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingRow {
    /// Legacy source column.
    pub source: String,
    /// Target field key, scoped to `entity`.
    pub target: String,
    pub entity: EntityType,
}

impl MappingRow {
    pub fn new(source: impl Into<String>, entity: EntityType, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            entity,
        }
    }

    /// True when both source and target are filled in.
    pub fn is_complete(&self) -> bool {
        !self.source.trim().is_empty() && !self.target.trim().is_empty()
    }
}

impl fmt::Display for MappingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}:{}", self.source, self.entity, self.target)
    }
}

/// Parses the `SOURCE=ENTITY:TARGET` shorthand.
impl FromStr for MappingRow {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidMappingSpec(s.to_string());
        let (source, rest) = s.split_once('=').ok_or_else(invalid)?;
        let (entity, target) = rest.split_once(':').ok_or_else(invalid)?;
        let row = MappingRow::new(source.trim(), entity.parse()?, target.trim());
        if row.is_complete() {
            Ok(row)
        } else {
            Err(invalid())
        }
    }
}

/// Partitions mappings by entity type, preserving order within each entity.
pub fn group_by_entity(rows: &[MappingRow]) -> BTreeMap<EntityType, Vec<&MappingRow>> {
    let mut grouped: BTreeMap<EntityType, Vec<&MappingRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.entity).or_default().push(row);
    }
    grouped
}
