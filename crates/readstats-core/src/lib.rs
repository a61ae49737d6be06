//! Core domain types for readstats.
//!
//! Holds everything the analytics engine and its callers share: the
//! tabular input model, normalized records, chart value types, the error
//! taxonomy, analysis options, label locales and the CLI settings. No
//! I/O happens in this crate.

pub mod error;
pub mod locale;
pub mod models;
pub mod options;
pub mod settings;

pub use error::{AnalyticsError, Result};
