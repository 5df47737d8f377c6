//! Contract of the mapping backend.

use fieldmap_model::{FieldCatalog, MappingRow};

use crate::error::ApiError;

/// Remote collaborator serving field catalogs and persisted mapping sets.
///
/// Every call is a single attempt. Implementations must not retry.
pub trait MappingApi {
    /// Retrieves the complete field catalog for `scope`.
    fn fetch_fields(&self, scope: &str) -> Result<FieldCatalog, ApiError>;

    /// Retrieves the persisted mapping set for `scope`, empty if none.
    fn load_mappings(&self, scope: &str) -> Result<Vec<MappingRow>, ApiError>;

    /// Overwrites the persisted mapping set for `scope` with `rows`.
    fn save_mappings(&self, scope: &str, rows: &[MappingRow]) -> Result<(), ApiError>;
}

impl<T: MappingApi + ?Sized> MappingApi for &T {
    fn fetch_fields(&self, scope: &str) -> Result<FieldCatalog, ApiError> {
        (**self).fetch_fields(scope)
    }

    fn load_mappings(&self, scope: &str) -> Result<Vec<MappingRow>, ApiError> {
        (**self).load_mappings(scope)
    }

    fn save_mappings(&self, scope: &str, rows: &[MappingRow]) -> Result<(), ApiError> {
        (**self).save_mappings(scope, rows)
    }
}
