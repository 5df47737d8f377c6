//! Target field definitions and the per-entity field catalog.

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;

/// An addressable attribute of a CRM entity.
///
/// `key` is unique within its entity type; `name` is shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub name: String,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Field definitions for every entity type, as served by the catalog endpoint.
///
/// Entity lists keep the server's order. A missing entity key deserializes
/// as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    #[serde(default)]
    pub organization: Vec<FieldDefinition>,
    #[serde(default)]
    pub person: Vec<FieldDefinition>,
    #[serde(default)]
    pub deal: Vec<FieldDefinition>,
}

impl FieldCatalog {
    /// Field definitions for one entity type.
    pub fn fields(&self, entity: EntityType) -> &[FieldDefinition] {
        match entity {
            EntityType::Organization => &self.organization,
            EntityType::Person => &self.person,
            EntityType::Deal => &self.deal,
        }
    }

    /// Mutable access to one entity's field list.
    pub fn fields_mut(&mut self, entity: EntityType) -> &mut Vec<FieldDefinition> {
        match entity {
            EntityType::Organization => &mut self.organization,
            EntityType::Person => &mut self.person,
            EntityType::Deal => &mut self.deal,
        }
    }

    /// Looks up a field by key within an entity type.
    pub fn find(&self, entity: EntityType, key: &str) -> Option<&FieldDefinition> {
        self.fields(entity).iter().find(|field| field.key == key)
    }

    /// All fields of all entity types, in entity order.
    pub fn iter_all(&self) -> impl Iterator<Item = (EntityType, &FieldDefinition)> {
        EntityType::ALL
            .into_iter()
            .flat_map(move |entity| self.fields(entity).iter().map(move |field| (entity, field)))
    }

    /// Total number of field definitions.
    pub fn len(&self) -> usize {
        self.organization.len() + self.person.len() + self.deal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_default_to_empty() {
        let catalog: FieldCatalog =
            serde_json::from_str(r#"{"organization":[{"key":"name","name":"Org Name"}]}"#)
                .unwrap();
        assert_eq!(catalog.organization.len(), 1);
        assert!(catalog.person.is_empty());
        assert!(catalog.deal.is_empty());
    }

    #[test]
    fn extra_field_attributes_are_ignored() {
        let catalog: FieldCatalog = serde_json::from_str(
            r#"{"deal":[{"key":"value","name":"Value","field_type":"monetary","id":12}]}"#,
        )
        .unwrap();
        assert_eq!(
            catalog.find(EntityType::Deal, "value"),
            Some(&FieldDefinition::new("value", "Value"))
        );
    }

    #[test]
    fn iter_all_follows_entity_order() {
        let catalog = FieldCatalog {
            organization: vec![FieldDefinition::new("name", "Org Name")],
            person: vec![FieldDefinition::new("email", "Email")],
            deal: vec![FieldDefinition::new("title", "Title")],
        };
        let keys: Vec<_> = catalog
            .iter_all()
            .map(|(entity, field)| (entity, field.key.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (EntityType::Organization, "name"),
                (EntityType::Person, "email"),
                (EntityType::Deal, "title"),
            ]
        );
        assert_eq!(catalog.len(), 3);
    }
}
