//! Editable mapping rows.
//!
//! A row holds three selections (source, entity, target) and the option list
//! of its target selector. The target selector is enabled exactly when an
//! entity is selected, and its options are always derived from the entity and
//! the current [`FieldCache`] snapshot, never from the previous target.

use std::fmt;

use fieldmap_model::{EntityType, MappingRow};
use tracing::{debug, warn};

use crate::cache::FieldCache;
use crate::error::{EditorError, Result};

/// Label of the empty leading option of every target selector.
pub const TARGET_PLACEHOLDER: &str = "Select Pipedrive Field";

/// Label of the empty leading option of every source selector.
pub const SOURCE_PLACEHOLDER: &str = "Select Source Field";

/// Stable identifier of a rendered row.
///
/// Ids are assigned by the editor in increasing order and never reused, so an
/// event naming a removed row cannot hit a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// An option with an empty value, meaning "nothing selected".
    pub fn placeholder(label: &str) -> Self {
        Self::new("", label)
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// Progress of a single row towards a complete mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// No entity type chosen; the target selector is disabled.
    Unset,
    /// Entity chosen, no target yet.
    EntitySelected,
    /// Entity and target chosen.
    Complete,
}

impl RowState {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::EntitySelected => "entity selected",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single editable mapping row.
#[derive(Debug, Clone)]
pub struct MappingRowEditor {
    id: RowId,
    source: Option<String>,
    entity: Option<EntityType>,
    target: Option<String>,
    target_options: Vec<SelectOption>,
    /// Persisted target waiting for the field catalog to arrive.
    pending_target: Option<String>,
}

impl MappingRowEditor {
    /// Creates an empty row with a disabled target selector.
    pub(crate) fn empty(id: RowId) -> Self {
        Self {
            id,
            source: None,
            entity: None,
            target: None,
            target_options: vec![SelectOption::placeholder(TARGET_PLACEHOLDER)],
            pending_target: None,
        }
    }

    /// Creates a row pre-populated from a persisted mapping.
    ///
    /// Source and entity are applied directly. The target options are then
    /// populated from `cache`, and only afterwards is the persisted target
    /// selected. Without a loaded cache the target is parked until
    /// [`refresh_targets`](Self::refresh_targets) runs after the next load.
    pub(crate) fn hydrated(id: RowId, existing: &MappingRow, cache: &FieldCache) -> Self {
        let mut row = Self::empty(id);
        row.source = non_empty(&existing.source);
        row.entity = Some(existing.entity);
        row.populate_targets(cache);

        if let Some(target) = non_empty(&existing.target) {
            if cache.is_loaded() {
                row.apply_target(target);
            } else {
                debug!(row = %id, target = %target, "field cache not loaded, deferring target");
                row.pending_target = Some(target);
            }
        }
        row
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn entity(&self) -> Option<EntityType> {
        self.entity
    }

    /// The selected target, or a persisted target still waiting for the catalog.
    ///
    /// For display only. A waiting target is never saved; see
    /// [`to_mapping`](Self::to_mapping).
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().or(self.pending_target.as_deref())
    }

    /// The target selected among the current options.
    pub fn selected_target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending_target.as_deref()
    }

    /// Options of the target selector, placeholder first.
    pub fn target_options(&self) -> &[SelectOption] {
        &self.target_options
    }

    pub fn is_target_enabled(&self) -> bool {
        self.entity.is_some()
    }

    pub fn state(&self) -> RowState {
        match (self.entity, self.selected_target()) {
            (None, _) => RowState::Unset,
            (Some(_), None) => RowState::EntitySelected,
            (Some(_), Some(_)) => RowState::Complete,
        }
    }

    /// The persisted form of this row, if source, entity and a target chosen
    /// among the loaded fields are all set.
    pub fn to_mapping(&self) -> Option<MappingRow> {
        let source = self.source.as_deref()?;
        let entity = self.entity?;
        let target = self.selected_target()?;
        Some(MappingRow::new(source, entity, target))
    }

    /// Selects a source field. The empty value clears the selection.
    pub(crate) fn select_source(&mut self, value: &str, options: &[SelectOption]) -> Result<()> {
        if value.is_empty() {
            self.source = None;
            return Ok(());
        }
        if !options.iter().any(|option| option.value == value) {
            return Err(EditorError::UnknownOption {
                row: self.id,
                value: value.to_string(),
            });
        }
        self.source = Some(value.to_string());
        Ok(())
    }

    /// Changes the entity type.
    ///
    /// Always drops the current target, including a parked one: a target key
    /// only means something for the entity it was drawn from.
    pub(crate) fn select_entity(&mut self, entity: Option<EntityType>, cache: &FieldCache) {
        self.entity = entity;
        self.target = None;
        self.pending_target = None;
        self.populate_targets(cache);
        debug!(row = %self.id, entity = ?entity, "entity changed, target reset");
    }

    /// Selects a target field. The empty value clears the selection.
    pub(crate) fn select_target(&mut self, value: &str) -> Result<()> {
        if self.entity.is_none() {
            return Err(EditorError::TargetDisabled(self.id));
        }
        self.pending_target = None;
        if value.is_empty() {
            self.target = None;
            return Ok(());
        }
        if !self.has_target_option(value) {
            return Err(EditorError::UnknownOption {
                row: self.id,
                value: value.to_string(),
            });
        }
        self.target = Some(value.to_string());
        Ok(())
    }

    /// Rebuilds the target options after the cache was replaced.
    ///
    /// A selected target survives when its key still exists for the row's
    /// entity. A parked target is applied now.
    pub(crate) fn refresh_targets(&mut self, cache: &FieldCache) {
        let previous = self.target.take().or_else(|| self.pending_target.take());
        self.populate_targets(cache);
        if let Some(target) = previous {
            self.apply_target(target);
        }
    }

    fn populate_targets(&mut self, cache: &FieldCache) {
        self.target_options.clear();
        self.target_options
            .push(SelectOption::placeholder(TARGET_PLACEHOLDER));
        if let Some(entity) = self.entity {
            self.target_options.extend(
                cache
                    .fields(entity)
                    .iter()
                    .map(|field| SelectOption::new(field.key.clone(), field.name.clone())),
            );
        }
    }

    fn apply_target(&mut self, target: String) {
        if self.has_target_option(&target) {
            self.target = Some(target);
        } else {
            warn!(
                row = %self.id,
                entity = ?self.entity,
                target = %target,
                "target field not in catalog, selection cleared"
            );
            self.target = None;
        }
    }

    fn has_target_option(&self, value: &str) -> bool {
        self.target_options
            .iter()
            .any(|option| !option.is_placeholder() && option.value == value)
    }
}

/// Persisted values are kept byte for byte; only blank ones count as unset.
fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use fieldmap_model::{FieldCatalog, FieldDefinition};

    use super::*;

    fn cache() -> FieldCache {
        let mut cache = FieldCache::new();
        cache.replace(FieldCatalog {
            organization: vec![FieldDefinition::new("name", "Org Name")],
            person: vec![
                FieldDefinition::new("email", "Email"),
                FieldDefinition::new("phone", "Phone"),
            ],
            deal: vec![],
        });
        cache
    }

    fn values(row: &MappingRowEditor) -> Vec<&str> {
        row.target_options()
            .iter()
            .map(|option| option.value.as_str())
            .collect()
    }

    #[test]
    fn empty_row_has_disabled_target() {
        let row = MappingRowEditor::empty(RowId::new(1));
        assert!(!row.is_target_enabled());
        assert_eq!(values(&row), vec![""]);
        assert_eq!(row.state(), RowState::Unset);
        assert!(row.to_mapping().is_none());
    }

    #[test]
    fn entity_change_resets_target() {
        let cache = cache();
        let mut row = MappingRowEditor::empty(RowId::new(1));
        row.select_entity(Some(EntityType::Person), &cache);
        row.select_target("email").unwrap();
        assert_eq!(row.state(), RowState::Complete);

        row.select_entity(Some(EntityType::Organization), &cache);
        assert_eq!(row.target(), None);
        assert_eq!(row.state(), RowState::EntitySelected);
        assert_eq!(values(&row), vec!["", "name"]);

        row.select_entity(None, &cache);
        assert!(!row.is_target_enabled());
        assert_eq!(values(&row), vec![""]);
    }

    #[test]
    fn target_requires_entity() {
        let mut row = MappingRowEditor::empty(RowId::new(3));
        assert_eq!(
            row.select_target("email"),
            Err(EditorError::TargetDisabled(RowId::new(3)))
        );
    }

    #[test]
    fn target_must_be_an_option() {
        let cache = cache();
        let mut row = MappingRowEditor::empty(RowId::new(1));
        row.select_entity(Some(EntityType::Organization), &cache);
        assert!(matches!(
            row.select_target("email"),
            Err(EditorError::UnknownOption { .. })
        ));
        row.select_target("name").unwrap();
        row.select_target("").unwrap();
        assert_eq!(row.state(), RowState::EntitySelected);
    }

    #[test]
    fn hydration_selects_target_after_population() {
        let cache = cache();
        let existing = MappingRow::new("EMAIL", EntityType::Person, "email");
        let row = MappingRowEditor::hydrated(RowId::new(1), &existing, &cache);
        assert_eq!(row.source(), Some("EMAIL"));
        assert_eq!(row.entity(), Some(EntityType::Person));
        assert_eq!(row.selected_target(), Some("email"));
        assert_eq!(values(&row), vec!["", "email", "phone"]);
        assert_eq!(row.to_mapping(), Some(existing));
    }

    #[test]
    fn hydration_parks_target_until_cache_loads() {
        let empty = FieldCache::new();
        let existing = MappingRow::new("EMAIL", EntityType::Person, "email");
        let mut row = MappingRowEditor::hydrated(RowId::new(1), &existing, &empty);
        assert_eq!(row.selected_target(), None);
        assert_eq!(row.pending_target(), Some("email"));
        assert_eq!(row.target(), Some("email"));
        assert_eq!(row.state(), RowState::EntitySelected);
        assert_eq!(row.to_mapping(), None);

        row.refresh_targets(&cache());
        assert_eq!(row.selected_target(), Some("email"));
        assert_eq!(row.pending_target(), None);
        assert_eq!(row.state(), RowState::Complete);
        assert_eq!(row.to_mapping(), Some(existing));
    }

    #[test]
    fn hydration_keeps_persisted_values_verbatim() {
        let persisted = MappingRow::new(" AKP_MAIL", EntityType::Person, "email");
        let row = MappingRowEditor::hydrated(RowId::new(1), &persisted, &cache());
        assert_eq!(row.source(), Some(" AKP_MAIL"));
        assert_eq!(row.to_mapping(), Some(persisted));

        let blank = MappingRow::new("  ", EntityType::Person, " ");
        let row = MappingRowEditor::hydrated(RowId::new(2), &blank, &cache());
        assert_eq!(row.source(), None);
        assert_eq!(row.target(), None);
    }

    #[test]
    fn hydration_drops_target_missing_from_catalog() {
        let existing = MappingRow::new("FAX", EntityType::Person, "fax");
        let row = MappingRowEditor::hydrated(RowId::new(1), &existing, &cache());
        assert_eq!(row.target(), None);
        assert_eq!(row.state(), RowState::EntitySelected);
    }

    #[test]
    fn refresh_keeps_target_still_in_catalog() {
        let mut cache = cache();
        let mut row = MappingRowEditor::empty(RowId::new(1));
        row.select_entity(Some(EntityType::Person), &cache);
        row.select_target("phone").unwrap();

        cache.replace(FieldCatalog {
            person: vec![FieldDefinition::new("phone", "Telephone")],
            ..FieldCatalog::default()
        });
        row.refresh_targets(&cache);
        assert_eq!(row.selected_target(), Some("phone"));
        assert_eq!(row.target_options()[1].label, "Telephone");

        cache.replace(FieldCatalog::default());
        row.refresh_targets(&cache);
        assert_eq!(row.selected_target(), None);
        assert_eq!(values(&row), vec![""]);
    }

    #[test]
    fn source_must_be_an_option() {
        let options = vec![
            SelectOption::placeholder(SOURCE_PLACEHOLDER),
            SelectOption::new("ADR_NAME", "ADR_NAME"),
        ];
        let mut row = MappingRowEditor::empty(RowId::new(1));
        row.select_source("ADR_NAME", &options).unwrap();
        assert_eq!(row.source(), Some("ADR_NAME"));
        assert!(row.select_source("PLZ", &options).is_err());
        assert_eq!(row.source(), Some("ADR_NAME"));
        row.select_source("", &options).unwrap();
        assert_eq!(row.source(), None);
    }
}
