//! Client-side cache of the CRM field catalog.
//!
//! The cache has a single writer: a successful catalog fetch replaces it as a
//! whole. Rows only ever read from it. A failed fetch leaves the previous
//! contents in place.

use std::collections::HashSet;

use fieldmap_model::{EntityType, FieldCatalog, FieldDefinition, LEGACY_SOURCE_FIELDS};
use tracing::{debug, info, warn};

use crate::api::MappingApi;
use crate::error::{EditorError, Result};
use crate::options::SourceFieldMode;
use crate::row::{SOURCE_PLACEHOLDER, SelectOption};

/// Entity-type to field-definition lists, as last fetched from the server.
#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    catalog: Option<FieldCatalog>,
}

impl FieldCache {
    /// Creates an empty, not yet loaded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a catalog fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Option<&FieldCatalog> {
        self.catalog.as_ref()
    }

    /// Field definitions for `entity`, empty until loaded.
    pub fn fields(&self, entity: EntityType) -> &[FieldDefinition] {
        match &self.catalog {
            Some(catalog) => catalog.fields(entity),
            None => &[],
        }
    }

    /// Replaces the whole cache.
    pub fn replace(&mut self, catalog: FieldCatalog) {
        debug!(fields = catalog.len(), "field cache replaced");
        self.catalog = Some(catalog);
    }

    /// Drops the cached catalog.
    pub fn clear(&mut self) {
        self.catalog = None;
    }

    /// Fetches the catalog for `scope` and replaces the cache with it.
    ///
    /// Issues exactly one request. On failure the previous contents stay
    /// visible and [`EditorError::Fetch`] is returned.
    pub fn load<A: MappingApi + ?Sized>(&mut self, api: &A, scope: &str) -> Result<&FieldCatalog> {
        match api.fetch_fields(scope) {
            Ok(catalog) => {
                info!(
                    scope,
                    organization = catalog.organization.len(),
                    person = catalog.person.len(),
                    deal = catalog.deal.len(),
                    "field catalog loaded"
                );
                Ok(&*self.catalog.insert(catalog))
            }
            Err(error) => {
                warn!(scope, %error, "field catalog fetch failed, keeping previous cache");
                Err(EditorError::Fetch(error))
            }
        }
    }

    /// Options for the source selector, placeholder first.
    ///
    /// In catalog mode every field of every entity is offered once, keyed by
    /// field key; the first occurrence in entity order wins.
    pub fn source_options(&self, mode: SourceFieldMode) -> Vec<SelectOption> {
        let mut options = vec![SelectOption::placeholder(SOURCE_PLACEHOLDER)];
        match mode {
            SourceFieldMode::Legacy => {
                options.extend(
                    LEGACY_SOURCE_FIELDS
                        .iter()
                        .map(|name| SelectOption::new(*name, *name)),
                );
            }
            SourceFieldMode::Catalog => {
                if let Some(catalog) = &self.catalog {
                    let mut seen = HashSet::new();
                    for (_, field) in catalog.iter_all() {
                        if seen.insert(field.key.as_str()) {
                            options.push(SelectOption::new(field.key.clone(), field.name.clone()));
                        }
                    }
                }
            }
        }
        options
    }
}
