//! Data model for mapping legacy export columns onto CRM entity fields.

pub mod entity;
pub mod error;
pub mod field;
pub mod mapping;
pub mod settings;

pub use entity::EntityType;
pub use error::{ModelError, Result};
pub use field::{FieldCatalog, FieldDefinition};
pub use mapping::{LEGACY_SOURCE_FIELDS, MappingRow, group_by_entity};
pub use settings::SyncSettings;
