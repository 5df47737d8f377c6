//! CRM entity types.
//!
//! Every target field belongs to exactly one entity type, and a target key is
//! only meaningful relative to the entity it was drawn from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A CRM record category with its own field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Companies and other organizations.
    Organization,
    /// Contact persons.
    Person,
    /// Sales deals.
    Deal,
}

impl EntityType {
    /// All entity types in catalog order.
    pub const ALL: [EntityType; 3] = [Self::Organization, Self::Person, Self::Deal];

    /// Returns the wire tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Person => "person",
            Self::Deal => "deal",
        }
    }

    /// Returns a human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Person => "Person",
            Self::Deal => "Deal",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownEntity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Person".parse::<EntityType>().unwrap(), EntityType::Person);
        assert_eq!(" DEAL ".parse::<EntityType>().unwrap(), EntityType::Deal);
        assert!("contact".parse::<EntityType>().is_err());
        assert!("".parse::<EntityType>().is_err());
    }

    #[test]
    fn display_matches_wire_tag() {
        for entity in EntityType::ALL {
            let json = serde_json::to_string(&entity).unwrap();
            assert_eq!(json, format!("\"{entity}\""));
        }
    }
}
