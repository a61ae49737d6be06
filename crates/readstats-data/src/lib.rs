//! Data pipeline for readstats.
//!
//! Responsible for ingesting reading-log CSV exports, normalizing rows into
//! analyzable records, aggregating them by period, building chart specs and
//! running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod charts;
pub mod ingest;
pub mod normalizer;

pub use readstats_core as core;
