//! Codebase ingestion for the review pipeline.
//!
//! Turns an uploaded zip archive or a local directory tree into a flat list
//! of [`types::FileRecord`]s: ignore rules applied, oversized and binary
//! entries dropped, unsupported languages filtered, bytes decoded as lossy
//! UTF-8. Also hosts the line-aligned chunker used to fit large files into
//! the analysis capability's input window.
//!
//! Per-entry problems (corrupt zip member, unreadable file) are skipped and
//! logged; they never fail a whole ingestion run.

pub mod chunk;
pub mod errors;
pub mod ingest;
pub mod lang;
pub mod types;

pub use errors::{Error, Result};
pub use ingest::SourceIngestor;
pub use types::FileRecord;
