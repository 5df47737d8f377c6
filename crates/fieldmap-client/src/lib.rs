//! HTTP access to the field catalog and field mapping endpoints.
//!
//! [`MappingClient`] implements [`fieldmap_editor::MappingApi`] with blocking
//! requests, so an editor can be driven straight from a command-line tool.
//!
//! # Example
//!
//! ```no_run
//! use fieldmap_client::{ClientConfig, MappingClient};
//! use fieldmap_editor::MappingEditor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MappingClient::new(&ClientConfig::default())?;
//! let mut editor = MappingEditor::default();
//! editor.load_fields(&client, "uniska")?;
//! editor.load_existing(&client, "uniska")?;
//! println!("{} rows", editor.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;

pub use client::MappingClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, Result};
