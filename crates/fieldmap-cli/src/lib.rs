//! Library components of the `fieldmap` command-line tool.

pub mod config;
pub mod edit;
pub mod logging;
