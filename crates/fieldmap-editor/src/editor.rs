//! Mapping list controller.
//!
//! Owns the ordered list of rendered rows and the field cache, turns UI
//! events into row transitions, and orchestrates the load and save calls.

use fieldmap_model::{EntityType, FieldCatalog, MappingRow};
use tracing::{debug, info, warn};

use crate::api::MappingApi;
use crate::cache::FieldCache;
use crate::error::{EditorError, Result};
use crate::options::EditorOptions;
use crate::row::{MappingRowEditor, RowId, SelectOption};

/// User interactions with the mapping form.
///
/// Per-row events carry the row's [`RowId`] rather than a position, so they
/// stay valid while other rows are added or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The "add row" control was pressed.
    AddRow,
    /// The remove control of a row was pressed.
    RemoveRow(RowId),
    /// A source selector changed. The empty value clears it.
    SourceChanged { row: RowId, value: String },
    /// An entity selector changed.
    EntityChanged {
        row: RowId,
        entity: Option<EntityType>,
    },
    /// A target selector changed. The empty value clears it.
    TargetChanged { row: RowId, value: String },
}

/// What handling an [`EditorEvent`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    RowAdded(RowId),
    RowRemoved(RowId),
    /// Removal refused by the minimum-rows policy.
    RemovalBlocked(RowId),
    RowUpdated(RowId),
}

/// Row counts of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSummary {
    pub rows: usize,
    /// Rows that would be part of the save payload.
    pub complete: usize,
    /// Rows that would be dropped on save.
    pub incomplete: usize,
}

/// Editor for an ordered list of (source, entity, target) rows.
#[derive(Debug, Clone)]
pub struct MappingEditor {
    options: EditorOptions,
    cache: FieldCache,
    rows: Vec<MappingRowEditor>,
    next_id: u64,
}

impl Default for MappingEditor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl MappingEditor {
    /// Creates an editor with no rows and an unloaded field cache.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            options,
            cache: FieldCache::new(),
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[MappingRowEditor] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&MappingRowEditor> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Display position of a row.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Options shared by every source selector.
    pub fn source_options(&self) -> Vec<SelectOption> {
        self.cache.source_options(self.options.source_mode)
    }

    /// Appends an empty row.
    pub fn add_row(&mut self) -> RowId {
        let id = self.allocate_id();
        self.rows.push(MappingRowEditor::empty(id));
        debug!(row = %id, "row added");
        id
    }

    /// Appends a row pre-populated from a persisted mapping.
    pub fn add_existing(&mut self, mapping: &MappingRow) -> RowId {
        let id = self.allocate_id();
        self.rows
            .push(MappingRowEditor::hydrated(id, mapping, &self.cache));
        id
    }

    /// Removes a row unless that would go below `minimum_rows`.
    ///
    /// Returns `Ok(false)` when the policy refused the removal.
    pub fn remove_row(&mut self, id: RowId) -> Result<bool> {
        let index = self.position(id).ok_or(EditorError::UnknownRow(id))?;
        if self.rows.len() <= self.options.minimum_rows {
            debug!(
                row = %id,
                minimum_rows = self.options.minimum_rows,
                "row removal blocked"
            );
            return Ok(false);
        }
        self.rows.remove(index);
        debug!(row = %id, "row removed");
        Ok(true)
    }

    pub fn select_source(&mut self, id: RowId, value: &str) -> Result<()> {
        let options = self.source_options();
        find_mut(&mut self.rows, id)?.select_source(value, &options)
    }

    /// Selects an entity type, resetting the row's target and repopulating
    /// its target options.
    pub fn select_entity(&mut self, id: RowId, entity: Option<EntityType>) -> Result<()> {
        let row = find_mut(&mut self.rows, id)?;
        row.select_entity(entity, &self.cache);
        Ok(())
    }

    pub fn select_target(&mut self, id: RowId, value: &str) -> Result<()> {
        find_mut(&mut self.rows, id)?.select_target(value)
    }

    /// Applies one UI event.
    pub fn handle(&mut self, event: EditorEvent) -> Result<EventOutcome> {
        match event {
            EditorEvent::AddRow => Ok(EventOutcome::RowAdded(self.add_row())),
            EditorEvent::RemoveRow(id) => {
                if self.remove_row(id)? {
                    Ok(EventOutcome::RowRemoved(id))
                } else {
                    Ok(EventOutcome::RemovalBlocked(id))
                }
            }
            EditorEvent::SourceChanged { row, value } => {
                self.select_source(row, &value)?;
                Ok(EventOutcome::RowUpdated(row))
            }
            EditorEvent::EntityChanged { row, entity } => {
                self.select_entity(row, entity)?;
                Ok(EventOutcome::RowUpdated(row))
            }
            EditorEvent::TargetChanged { row, value } => {
                self.select_target(row, &value)?;
                Ok(EventOutcome::RowUpdated(row))
            }
        }
    }

    /// Replaces the field cache and rebuilds every row's target options.
    pub fn replace_catalog(&mut self, catalog: FieldCatalog) {
        self.cache.replace(catalog);
        self.refresh_rows();
    }

    /// Fetches the field catalog for `scope`.
    ///
    /// On success the cache is replaced and all rows are repopulated; returns
    /// the number of field definitions. On failure nothing changes.
    pub fn load_fields<A: MappingApi + ?Sized>(&mut self, api: &A, scope: &str) -> Result<usize> {
        let count = self.cache.load(api, scope)?.len();
        self.refresh_rows();
        Ok(count)
    }

    /// Replaces all rows with the persisted mappings of `scope`.
    ///
    /// An empty mapping set renders a single empty row. On failure the
    /// current rows are kept.
    pub fn load_existing<A: MappingApi + ?Sized>(
        &mut self,
        api: &A,
        scope: &str,
    ) -> Result<usize> {
        let mappings = api.load_mappings(scope).map_err(|error| {
            warn!(scope, %error, "loading field mappings failed");
            EditorError::Load(error)
        })?;

        self.rows.clear();
        for mapping in &mappings {
            self.add_existing(mapping);
        }
        if mappings.is_empty() {
            self.add_row();
        }
        info!(scope, mappings = mappings.len(), "field mappings loaded");
        Ok(mappings.len())
    }

    /// The save payload: every row with source, entity and target set, in
    /// display order. Incomplete rows are left out.
    pub fn payload(&self) -> Vec<MappingRow> {
        let payload: Vec<MappingRow> = self
            .rows
            .iter()
            .filter_map(MappingRowEditor::to_mapping)
            .collect();
        let dropped = self.rows.len() - payload.len();
        if dropped > 0 {
            debug!(dropped, "incomplete rows left out of payload");
        }
        payload
    }

    /// Rows whose persisted target still waits for the field catalog.
    pub fn pending_targets(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.pending_target().is_some())
            .count()
    }

    /// Writes the payload as the complete mapping set of `scope`.
    ///
    /// Returns the number of rows written. Rows are kept either way.
    ///
    /// Refused with [`EditorError::CatalogNotLoaded`] while any persisted
    /// target waits for the catalog: those rows would drop out of the full
    /// replacement and erase their stored mapping.
    pub fn save<A: MappingApi + ?Sized>(&self, api: &A, scope: &str) -> Result<usize> {
        let pending = self.pending_targets();
        if pending > 0 {
            warn!(scope, pending, "save refused, field catalog not loaded");
            return Err(EditorError::CatalogNotLoaded { pending });
        }
        let payload = self.payload();
        api.save_mappings(scope, &payload).map_err(|error| {
            warn!(scope, %error, "saving field mappings failed");
            EditorError::Save(error)
        })?;
        info!(scope, mappings = payload.len(), "field mappings saved");
        Ok(payload.len())
    }

    pub fn summary(&self) -> EditorSummary {
        let complete = self
            .rows
            .iter()
            .filter(|row| row.to_mapping().is_some())
            .count();
        EditorSummary {
            rows: self.rows.len(),
            complete,
            incomplete: self.rows.len() - complete,
        }
    }

    fn refresh_rows(&mut self) {
        for row in &mut self.rows {
            row.refresh_targets(&self.cache);
        }
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

fn find_mut(rows: &mut [MappingRowEditor], id: RowId) -> Result<&mut MappingRowEditor> {
    rows.iter_mut()
        .find(|row| row.id() == id)
        .ok_or(EditorError::UnknownRow(id))
}
