//! Headless editor for CRM field mappings.
//!
//! The editor models a form of mapping rows. Each row picks a legacy source
//! field, a CRM entity type and one of that entity's target fields. It is
//! built from three parts:
//!
//! - [`FieldCache`] holds the field catalog fetched from the server and is
//!   replaced wholesale on every successful fetch.
//! - [`MappingRowEditor`] is one row. Its target options are always derived
//!   from its entity and the cache.
//! - [`MappingEditor`] owns the rows, routes [`EditorEvent`]s to them by
//!   [`RowId`], and runs the load and save round trips through a
//!   [`MappingApi`].
//!
//! Everything runs on the caller's thread. The only suspension points are
//! the [`MappingApi`] calls, and no call is retried.
//!
//! # Example
//!
//! ```no_run
//! use fieldmap_editor::{EditorOptions, MappingApi, MappingEditor};
//!
//! fn sync(api: &dyn MappingApi) -> fieldmap_editor::Result<()> {
//!     let mut editor = MappingEditor::new(EditorOptions::default().with_minimum_rows(1));
//!     editor.load_fields(api, "uniska")?;
//!     editor.load_existing(api, "uniska")?;
//!     editor.save(api, "uniska")?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod editor;
pub mod error;
pub mod options;
pub mod row;

pub use api::MappingApi;
pub use cache::FieldCache;
pub use editor::{EditorEvent, EditorSummary, EventOutcome, MappingEditor};
pub use error::{ApiError, EditorError, Result};
pub use options::{EditorOptions, SourceFieldMode};
pub use row::{
    MappingRowEditor, RowId, RowState, SOURCE_PLACEHOLDER, SelectOption, TARGET_PLACEHOLDER,
};
